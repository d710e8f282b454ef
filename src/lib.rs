//! # Mosaic - Transfer Reassembly Memory Manager
//!
//! Mosaic buffers incoming multi-frame transfers on nodes that may not use
//! a general-purpose heap. All storage is carved out up front: a handful of
//! statically reserved buffer slots plus fixed-size block pools that back
//! overflow buffers on demand.
//!
//! ## Features
//!
//! - **Fixed-block pools**: `BlockPool` hands out move-only `Block` handles
//! - **Pool aggregation**: `PoolManager` serves first-fit across registered pools
//! - **Offset-addressed buffers**: out-of-order writes, reads up to the write frontier
//! - **Static and dynamic storage**: contiguous slots or lazily grown block chains
//! - **Keyed manager**: per-transfer binding with migration back into static slots
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │            TransferBufferManager                 │
//! ├──────────────────────────────────────────────────┤
//! │  Static slots [S]          │  Dynamic table [D]  │
//! │  - contiguous arrays       │  - block chains     │
//! │  - no pool usage           │  - grown on write   │
//! └──────────────────────────────────────────────────┘
//!           ▲   migration on remove      │
//!           └────────────────────────────┤
//!                                        ▼
//!                    ┌──────────────────────────────┐
//!                    │  PoolManager  (first-fit)    │
//!                    ├──────────────────────────────┤
//!                    │  BlockPool  │  BlockPool ... │
//!                    └──────────────────────────────┘
//! ```
//!
//! Everything is single-threaded and non-reentrant. Callers that share a
//! manager between threads must wrap the whole manager in their own lock.

pub mod error;
pub mod allocators;
pub mod buffers;
pub mod transfer_manager;

// Main API re-exports
pub use error::{MosaicError, Result};
pub use allocators::{Block, BlockAllocator, BlockAllocatorExt, BlockPool, PoolManager, PoolStats};
pub use buffers::{BufferHandle, DynamicTransferBuffer, StaticTransferBuffer, TransferBuffer};
pub use transfer_manager::{
    NodeId, TransferBufferKey, TransferBufferManager, TransferBufferManagerStats, TransferType,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compile-time configuration constants
pub mod config {
    /// Size of one pool block in bytes; shared by every pool
    pub const BLOCK_SIZE: usize = 32;

    /// Largest payload a single multi-frame transfer can carry
    pub const MAX_TRANSFER_PAYLOAD_LEN: usize = 439;

    /// Capacity of a dynamic buffer's block chain
    pub const MAX_CHAIN_BLOCKS: usize = MAX_TRANSFER_PAYLOAD_LEN.div_ceil(BLOCK_SIZE);

    /// Largest capacity a dynamic buffer can be constructed with
    pub const MAX_DYNAMIC_CAPACITY: usize = MAX_CHAIN_BLOCKS * BLOCK_SIZE;

    /// Default number of pools a `PoolManager` can aggregate
    pub const DEFAULT_MAX_POOLS: usize = 4;
}
