//! Transfer identity: source node and transfer type

use std::fmt;

use crate::error::{MosaicError, Result};

/// Node identifier on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u8);

impl NodeId {
    /// Highest valid node id
    pub const MAX: u8 = 127;

    /// Broadcast / anonymous source
    pub const BROADCAST: NodeId = NodeId(0);

    /// Create a node id, rejecting values above [`NodeId::MAX`]
    pub const fn new(value: u8) -> Result<Self> {
        if value > Self::MAX {
            return Err(MosaicError::InvalidParameter {
                parameter: "node_id",
                message: "Node id must be in 0..=127",
            });
        }
        Ok(Self(value))
    }

    /// Raw value
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Check if this is the broadcast id
    pub const fn is_broadcast(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<u8> for NodeId {
    type Error = MosaicError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of transfer being reassembled
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum TransferType {
    MessageUnicast = 0,
    MessageBroadcast = 1,
    ServiceRequest = 2,
    ServiceResponse = 3,
}

impl TransferType {
    /// Every transfer type
    pub const ALL: [TransferType; 4] = [
        TransferType::MessageUnicast,
        TransferType::MessageBroadcast,
        TransferType::ServiceRequest,
        TransferType::ServiceResponse,
    ];

    /// Get a human-readable name for the transfer type
    pub fn name(&self) -> &'static str {
        match self {
            TransferType::MessageUnicast => "message_unicast",
            TransferType::MessageBroadcast => "message_broadcast",
            TransferType::ServiceRequest => "service_request",
            TransferType::ServiceResponse => "service_response",
        }
    }

    /// Check if this is a service transfer
    pub fn is_service(&self) -> bool {
        matches!(self, TransferType::ServiceRequest | TransferType::ServiceResponse)
    }
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Key of one in-flight transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransferBufferKey {
    /// Node the transfer comes from
    pub node_id: NodeId,
    /// Kind of transfer
    pub transfer_type: TransferType,
}

impl TransferBufferKey {
    /// Create a key
    pub const fn new(node_id: NodeId, transfer_type: TransferType) -> Self {
        Self {
            node_id,
            transfer_type,
        }
    }
}

impl fmt::Display for TransferBufferKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node {}/{}", self.node_id, self.transfer_type)
    }
}
