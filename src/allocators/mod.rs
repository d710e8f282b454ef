//! Fixed-block allocation: blocks, pools and the pool manager

pub mod block;
pub mod manager;
pub mod pool;
pub mod stats;
pub mod traits;

pub use block::Block;
pub use manager::PoolManager;
pub use pool::BlockPool;
pub use stats::{PoolCounters, PoolStats};
pub use traits::{BlockAllocator, BlockAllocatorExt};
