//! Move-only block handle

use std::fmt;

use crate::config::BLOCK_SIZE;

/// Exclusive handle to one block of a pool
///
/// A `Block` can only be obtained from [`BlockAllocator::allocate`] and only
/// given back through [`BlockAllocator::release`], which consumes it. It is
/// neither `Clone` nor `Copy`, so a block cannot be released twice. The
/// lifetime ties the handle to the pool it came from.
///
/// Dropping a `Block` without releasing it leaks the slot: the pool keeps
/// counting it as used and never hands it out again for the rest of its
/// lifetime. Buffers in this crate always release their blocks.
///
/// [`BlockAllocator::allocate`]: super::BlockAllocator::allocate
/// [`BlockAllocator::release`]: super::BlockAllocator::release
#[must_use = "a dropped block stays allocated until its pool is dropped; release it instead"]
pub struct Block<'a> {
    data: &'a mut [u8; BLOCK_SIZE],
}

impl<'a> Block<'a> {
    pub(crate) fn new(data: &'a mut [u8; BLOCK_SIZE]) -> Self {
        Self { data }
    }

    /// Block contents
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..]
    }

    /// Mutable block contents
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data[..]
    }

    /// Size of the block in bytes
    pub fn len(&self) -> usize {
        BLOCK_SIZE
    }

    /// Blocks are never zero-sized
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Address of the first byte, used to map the block back to its pool
    pub(crate) fn address(&self) -> usize {
        self.data.as_ptr() as usize
    }
}

impl fmt::Debug for Block<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("address", &format_args!("{:#x}", self.address()))
            .field("len", &BLOCK_SIZE)
            .finish()
    }
}
