//! Transfer buffer backed by a chain of pool blocks

use std::fmt;

use heapless::Vec;

use crate::{
    allocators::{Block, BlockAllocator},
    config::{BLOCK_SIZE, MAX_CHAIN_BLOCKS, MAX_DYNAMIC_CAPACITY},
};

use super::traits::TransferBuffer;

/// Transfer buffer that grows block by block as writes advance
///
/// Chain entry `i` covers bytes `[i * BLOCK_SIZE, (i + 1) * BLOCK_SIZE)`.
/// Blocks are only acquired when a write reaches their range, and the chain
/// never has gaps: a write far past the end first acquires every block in
/// between. Acquired blocks are zero-filled. All blocks go back to the
/// allocator on [`reset`](TransferBuffer::reset) and on drop.
pub struct DynamicTransferBuffer<'a, A: BlockAllocator + ?Sized> {
    /// Where blocks come from and go back to
    allocator: &'a A,
    /// Owned blocks, in offset order
    chain: Vec<Block<'a>, MAX_CHAIN_BLOCKS>,
    /// Declared upper bound on content length
    capacity: usize,
    /// Highest offset written since the last reset
    max_write_pos: usize,
}

impl<'a, A: BlockAllocator + ?Sized> DynamicTransferBuffer<'a, A> {
    /// Create an empty buffer; no block is acquired yet
    ///
    /// `capacity` is clamped to [`MAX_DYNAMIC_CAPACITY`].
    pub fn new(allocator: &'a A, capacity: usize) -> Self {
        if capacity > MAX_DYNAMIC_CAPACITY {
            log::warn!(
                "dynamic buffer capacity {} clamped to {}",
                capacity,
                MAX_DYNAMIC_CAPACITY
            );
        }

        Self {
            allocator,
            chain: Vec::new(),
            capacity: capacity.min(MAX_DYNAMIC_CAPACITY),
            max_write_pos: 0,
        }
    }

    /// Number of blocks currently owned
    pub fn num_blocks(&self) -> usize {
        self.chain.len()
    }

    /// Grow the chain to `count` blocks, stopping at the first failed
    /// allocation. Returns the resulting chain length.
    fn grow_to(&mut self, count: usize) -> usize {
        while self.chain.len() < count {
            let Some(mut block) = self.allocator.allocate() else {
                log::debug!(
                    "out of blocks at chain index {} of {}",
                    self.chain.len(),
                    count
                );
                break;
            };

            block.as_mut_slice().fill(0);
            if let Err(block) = self.chain.push(block) {
                self.release_block(block);
                break;
            }
        }

        self.chain.len()
    }

    fn release_block(&self, block: Block<'a>) {
        if let Err(e) = self.allocator.release(block) {
            log::error!("failed to release chain block: {}", e);
        }
    }
}

impl<A: BlockAllocator + ?Sized> TransferBuffer for DynamicTransferBuffer<'_, A> {
    fn read(&self, offset: usize, dst: &mut [u8]) -> usize {
        if offset >= self.max_write_pos {
            return 0;
        }

        let end = self.max_write_pos.min(offset + dst.len());
        let mut pos = offset;
        while pos < end {
            let in_block = pos % BLOCK_SIZE;
            let len = (BLOCK_SIZE - in_block).min(end - pos);
            let block = &self.chain[pos / BLOCK_SIZE];
            dst[pos - offset..pos - offset + len]
                .copy_from_slice(&block.as_slice()[in_block..in_block + len]);
            pos += len;
        }

        end - offset
    }

    fn write(&mut self, offset: usize, src: &[u8]) -> usize {
        if offset >= self.capacity || src.is_empty() {
            return 0;
        }

        let wanted_end = offset + src.len().min(self.capacity - offset);
        let available = self.grow_to(wanted_end.div_ceil(BLOCK_SIZE)) * BLOCK_SIZE;
        if available <= offset {
            return 0;
        }

        let end = wanted_end.min(available);
        let mut pos = offset;
        while pos < end {
            let in_block = pos % BLOCK_SIZE;
            let len = (BLOCK_SIZE - in_block).min(end - pos);
            let block = &mut self.chain[pos / BLOCK_SIZE];
            block.as_mut_slice()[in_block..in_block + len]
                .copy_from_slice(&src[pos - offset..pos - offset + len]);
            pos += len;
        }

        self.max_write_pos = self.max_write_pos.max(end);
        end - offset
    }

    fn reset(&mut self) {
        while let Some(block) = self.chain.pop() {
            self.release_block(block);
        }
        self.max_write_pos = 0;
    }

    fn max_write_pos(&self) -> usize {
        self.max_write_pos
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<A: BlockAllocator + ?Sized> Drop for DynamicTransferBuffer<'_, A> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<A: BlockAllocator + ?Sized> fmt::Debug for DynamicTransferBuffer<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicTransferBuffer")
            .field("capacity", &self.capacity)
            .field("max_write_pos", &self.max_write_pos)
            .field("blocks", &self.chain.len())
            .finish()
    }
}
