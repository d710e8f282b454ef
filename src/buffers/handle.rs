//! Tagged reference to either buffer kind

use crate::allocators::BlockAllocator;

use super::{dynamic::DynamicTransferBuffer, static_buffer::StaticTransferBuffer, traits::TransferBuffer};

/// Borrowed access to a transfer's buffer, whichever storage backs it
///
/// Returned by the transfer buffer manager. Both arms expose the same
/// [`TransferBuffer`] capability; the tag only matters to callers that want
/// to know whether the transfer is costing pool blocks.
pub enum BufferHandle<'b, 'a, A: BlockAllocator + ?Sized, const C: usize> {
    /// Backed by a static slot
    Static(&'b mut StaticTransferBuffer<C>),
    /// Backed by a pool block chain
    Dynamic(&'b mut DynamicTransferBuffer<'a, A>),
}

impl<A: BlockAllocator + ?Sized, const C: usize> BufferHandle<'_, '_, A, C> {
    /// Check if the transfer sits in a static slot
    pub fn is_static(&self) -> bool {
        matches!(self, Self::Static(_))
    }

    /// Check if the transfer draws on the pool
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }
}

impl<A: BlockAllocator + ?Sized, const C: usize> TransferBuffer for BufferHandle<'_, '_, A, C> {
    fn read(&self, offset: usize, dst: &mut [u8]) -> usize {
        match self {
            Self::Static(buf) => buf.read(offset, dst),
            Self::Dynamic(buf) => buf.read(offset, dst),
        }
    }

    fn write(&mut self, offset: usize, src: &[u8]) -> usize {
        match self {
            Self::Static(buf) => buf.write(offset, src),
            Self::Dynamic(buf) => buf.write(offset, src),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Static(buf) => buf.reset(),
            Self::Dynamic(buf) => buf.reset(),
        }
    }

    fn max_write_pos(&self) -> usize {
        match self {
            Self::Static(buf) => buf.max_write_pos(),
            Self::Dynamic(buf) => buf.max_write_pos(),
        }
    }

    fn capacity(&self) -> usize {
        match self {
            Self::Static(buf) => buf.capacity(),
            Self::Dynamic(buf) => buf.capacity(),
        }
    }
}

impl<A: BlockAllocator + ?Sized, const C: usize> std::fmt::Debug for BufferHandle<'_, '_, A, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(buf) => f.debug_tuple("Static").field(buf).finish(),
            Self::Dynamic(buf) => f.debug_tuple("Dynamic").field(buf).finish(),
        }
    }
}
