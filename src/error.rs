//! Error types and handling for Mosaic

use crate::transfer_manager::TransferBufferKey;

/// Result type alias for Mosaic operations
pub type Result<T> = std::result::Result<T, MosaicError>;

/// Error taxonomy for the pool allocator and the transfer buffer manager
///
/// Running out of blocks is not represented here: `allocate` reports it as
/// `None` and buffer writes report it as a short byte count.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MosaicError {
    /// A buffer is already bound to this key
    #[error("Transfer buffer already exists: {key}")]
    KeyExists { key: TransferBufferKey },

    /// Every static slot and every dynamic slot is bound
    #[error("No capacity: {static_slots} static and {dynamic_slots} dynamic slots in use")]
    NoCapacity {
        static_slots: usize,
        dynamic_slots: usize,
    },

    /// The pool manager cannot register another pool
    #[error("Too many pools: at most {max} can be registered")]
    TooManyPools { max: usize },

    /// The same pool was registered twice
    #[error("Pool already registered")]
    PoolAlreadyRegistered,

    /// A block was released to an allocator that did not hand it out
    #[error("Foreign block: address {address:#x} is not owned by this allocator")]
    ForeignBlock { address: usize },

    /// Invalid parameters or configuration
    #[error("Invalid parameter: {parameter} - {message}")]
    InvalidParameter {
        parameter: &'static str,
        message: &'static str,
    },
}

impl MosaicError {
    /// Create a key exists error
    pub fn key_exists(key: TransferBufferKey) -> Self {
        Self::KeyExists { key }
    }

    /// Create a no capacity error
    pub fn no_capacity(static_slots: usize, dynamic_slots: usize) -> Self {
        Self::NoCapacity {
            static_slots,
            dynamic_slots,
        }
    }

    /// Create a too many pools error
    pub fn too_many_pools(max: usize) -> Self {
        Self::TooManyPools { max }
    }

    /// Create a foreign block error
    pub fn foreign_block(address: usize) -> Self {
        Self::ForeignBlock { address }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: &'static str, message: &'static str) -> Self {
        Self::InvalidParameter { parameter, message }
    }

    /// Capacity errors are backpressure: the frame should be dropped, not the node
    pub fn is_backpressure(&self) -> bool {
        matches!(self, Self::NoCapacity { .. })
    }
}
