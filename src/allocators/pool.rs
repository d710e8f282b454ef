//! Block pool implementation - fixed-size block allocation

use std::{
    cell::{RefCell, UnsafeCell},
    fmt,
};

use heapless::Vec;

use crate::{
    config::BLOCK_SIZE,
    error::{MosaicError, Result},
};

use super::{
    block::Block,
    stats::{PoolCounters, PoolStats},
    traits::BlockAllocator,
};

/// Pool of `N` blocks of [`BLOCK_SIZE`] bytes
///
/// The pool owns its storage inline, so it can live in a `static` or on the
/// stack of the task that sets up the transport. Free blocks are tracked by an
/// index stack; allocation pops, release pushes. The pool is `!Sync`.
pub struct BlockPool<const N: usize> {
    /// Block storage
    storage: UnsafeCell<[[u8; BLOCK_SIZE]; N]>,
    /// Indices of the free blocks; the top of the stack is handed out next
    free: RefCell<Vec<usize, N>>,
    /// Usage counters
    counters: PoolCounters,
}

impl<const N: usize> BlockPool<N> {
    /// Create a pool with every block free
    pub fn new() -> Self {
        let mut free = Vec::new();
        // Reversed so that block 0 is handed out first
        free.extend((0..N).rev());

        Self {
            storage: UnsafeCell::new([[0; BLOCK_SIZE]; N]),
            free: RefCell::new(free),
            counters: PoolCounters::new(),
        }
    }

    /// Get block size
    pub fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    /// Check if every block is handed out
    pub fn is_full(&self) -> bool {
        self.counters.used() >= N
    }

    /// Check if no block is handed out
    pub fn is_empty(&self) -> bool {
        self.counters.used() == 0
    }

    fn base_address(&self) -> usize {
        self.storage.get() as usize
    }

    /// Map a block back to its index, if it lies inside this pool
    fn index_of(&self, block: &Block<'_>) -> Option<usize> {
        let base = self.base_address();
        let address = block.address();
        if address < base || address >= base + N * BLOCK_SIZE {
            return None;
        }

        let offset = address - base;
        (offset % BLOCK_SIZE == 0).then_some(offset / BLOCK_SIZE)
    }
}

impl<const N: usize> BlockAllocator for BlockPool<N> {
    fn allocate(&self) -> Option<Block<'_>> {
        let Some(index) = self.free.borrow_mut().pop() else {
            self.counters.record_failure();
            log::trace!("block pool ({} blocks) exhausted", N);
            return None;
        };

        self.counters.record_allocation();

        // SAFETY: `index < N` and it was just popped off the free stack, so no
        // other live `Block` refers to this slot. The slot reference is derived
        // from the raw pointer without creating a reference to the whole array.
        let data = unsafe { &mut *self.storage.get().cast::<[u8; BLOCK_SIZE]>().add(index) };
        Some(Block::new(data))
    }

    fn release(&self, block: Block<'_>) -> Result<()> {
        let Some(index) = self.index_of(&block) else {
            let address = block.address();
            log::error!("rejected release of foreign block at {:#x}", address);
            return Err(MosaicError::foreign_block(address));
        };
        drop(block);

        let mut free = self.free.borrow_mut();
        debug_assert!(!free.contains(&index), "block {} released twice", index);
        if free.push(index).is_err() {
            // Only reachable if more blocks came back than were handed out
            return Err(MosaicError::foreign_block(self.base_address() + index * BLOCK_SIZE));
        }

        self.counters.record_release();
        Ok(())
    }

    fn owns(&self, block: &Block<'_>) -> bool {
        self.index_of(block).is_some()
    }

    fn total_blocks(&self) -> usize {
        N
    }

    fn used_blocks(&self) -> usize {
        self.counters.used()
    }

    fn stats(&self) -> PoolStats {
        self.counters.snapshot(N)
    }
}

impl<const N: usize> Default for BlockPool<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for BlockPool<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockPool")
            .field("block_size", &BLOCK_SIZE)
            .field("total_blocks", &N)
            .field("used_blocks", &self.counters.used())
            .finish()
    }
}
