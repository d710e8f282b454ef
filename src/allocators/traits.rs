//! Block allocator trait definition

use crate::error::Result;

use super::{block::Block, stats::PoolStats};

/// Source of fixed-size blocks
///
/// Implemented by a single [`BlockPool`](super::BlockPool) and by the
/// [`PoolManager`](super::PoolManager) that aggregates several of them, so a
/// dynamic buffer can draw from either. Implementations are single-threaded
/// and take `&self`; bookkeeping lives behind interior mutability.
pub trait BlockAllocator {
    /// Take one block, or `None` when exhausted. Never blocks.
    fn allocate(&self) -> Option<Block<'_>>;

    /// Give a block back to the allocator that handed it out
    ///
    /// Fails with [`MosaicError::ForeignBlock`](crate::MosaicError::ForeignBlock)
    /// if this allocator does not own the block; accounting is left untouched.
    fn release(&self, block: Block<'_>) -> Result<()>;

    /// Check if a block was handed out by this allocator
    fn owns(&self, block: &Block<'_>) -> bool;

    /// Total number of blocks
    fn total_blocks(&self) -> usize;

    /// Number of blocks currently handed out
    fn used_blocks(&self) -> usize;

    /// Number of blocks available
    fn free_blocks(&self) -> usize {
        self.total_blocks() - self.used_blocks()
    }

    /// Current statistics snapshot
    fn stats(&self) -> PoolStats;
}

/// Common allocator queries
pub trait BlockAllocatorExt: BlockAllocator {
    /// Check if at least `count` blocks could be allocated right now
    fn can_allocate(&self, count: usize) -> bool {
        self.free_blocks() >= count
    }

    /// Get utilization (0.0 to 1.0)
    fn utilization(&self) -> f64 {
        if self.total_blocks() == 0 {
            return 0.0;
        }
        self.used_blocks() as f64 / self.total_blocks() as f64
    }
}

impl<T: BlockAllocator + ?Sized> BlockAllocatorExt for T {}
