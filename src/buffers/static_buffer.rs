//! Transfer buffer backed by one contiguous array

use std::fmt;

use super::traits::TransferBuffer;

/// Transfer buffer with `C` bytes of inline storage
///
/// Never touches a pool, so writes below capacity cannot fail.
#[derive(Clone)]
pub struct StaticTransferBuffer<const C: usize> {
    /// Buffer contents
    data: [u8; C],
    /// Highest offset written since the last reset
    max_write_pos: usize,
}

impl<const C: usize> StaticTransferBuffer<C> {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self {
            data: [0; C],
            max_write_pos: 0,
        }
    }

    /// Readable content
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.max_write_pos]
    }

    /// Check if nothing has been written since the last reset
    pub fn is_empty(&self) -> bool {
        self.max_write_pos == 0
    }
}

impl<const C: usize> TransferBuffer for StaticTransferBuffer<C> {
    fn read(&self, offset: usize, dst: &mut [u8]) -> usize {
        if offset >= self.max_write_pos {
            return 0;
        }

        let len = dst.len().min(self.max_write_pos - offset);
        dst[..len].copy_from_slice(&self.data[offset..offset + len]);
        len
    }

    fn write(&mut self, offset: usize, src: &[u8]) -> usize {
        if offset >= C {
            return 0;
        }

        let len = src.len().min(C - offset);
        self.data[offset..offset + len].copy_from_slice(&src[..len]);
        self.max_write_pos = self.max_write_pos.max(offset + len);
        len
    }

    fn reset(&mut self) {
        // Stale bytes stay in place; reads are bounded by `max_write_pos`
        self.max_write_pos = 0;
    }

    fn max_write_pos(&self) -> usize {
        self.max_write_pos
    }

    fn capacity(&self) -> usize {
        C
    }
}

impl<const C: usize> Default for StaticTransferBuffer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const C: usize> fmt::Debug for StaticTransferBuffer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTransferBuffer")
            .field("capacity", &C)
            .field("max_write_pos", &self.max_write_pos)
            .finish()
    }
}
