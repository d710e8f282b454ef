//! Transfer buffer capability

use crate::config::BLOCK_SIZE;

/// Offset-addressed read/write access to a transfer's bytes
///
/// Content length is the max-written-extent: the highest offset ever
/// written. Never-written gaps below it are readable; nothing above it is.
pub trait TransferBuffer {
    /// Copy bytes starting at `offset` into `dst`
    ///
    /// Returns `min(dst.len(), max_write_pos() - offset)`, or `0` when
    /// `offset >= max_write_pos()` or `dst` is empty.
    fn read(&self, offset: usize, dst: &mut [u8]) -> usize;

    /// Copy `src` into the buffer starting at `offset`
    ///
    /// Writes past [`capacity`](Self::capacity) are truncated. Returns the
    /// number of bytes accepted, which is `0` when `offset >= capacity()`.
    fn write(&mut self, offset: usize, src: &[u8]) -> usize;

    /// Forget all content
    fn reset(&mut self);

    /// Highest offset ever written, i.e. the readable content length
    fn max_write_pos(&self) -> usize;

    /// Upper bound on the content length
    fn capacity(&self) -> usize;
}

/// Copy the whole content of `src` into `dst` at the same offsets
///
/// Returns the number of bytes `dst` accepted.
pub fn copy_content(src: &dyn TransferBuffer, dst: &mut dyn TransferBuffer) -> usize {
    let mut chunk = [0u8; BLOCK_SIZE];
    let mut offset = 0;

    loop {
        let read = src.read(offset, &mut chunk);
        if read == 0 {
            break;
        }

        let written = dst.write(offset, &chunk[..read]);
        offset += written;
        if written < read {
            break;
        }
    }

    offset
}
