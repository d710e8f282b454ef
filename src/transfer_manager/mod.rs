//! Keyed buffer management for concurrently reassembling transfers
//!
//! A fixed bank of static slots is preferred; once it is full, transfers
//! spill into pool-backed dynamic buffers. Freeing a static slot pulls the
//! oldest dynamic transfer back into it.

pub mod key;
pub mod manager;
pub mod stats;

pub use key::{NodeId, TransferBufferKey, TransferType};
pub use manager::TransferBufferManager;
pub use stats::TransferBufferManagerStats;
