//! Transfer buffers
//!
//! Offset-addressed byte storage for transfers under reassembly. Frames may
//! arrive out of order, so writes land at arbitrary offsets; reads see
//! everything up to the highest byte ever written.

pub mod dynamic;
pub mod handle;
pub mod static_buffer;
pub mod traits;

pub use dynamic::DynamicTransferBuffer;
pub use handle::BufferHandle;
pub use static_buffer::StaticTransferBuffer;
pub use traits::{copy_content, TransferBuffer};
