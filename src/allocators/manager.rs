//! Pool manager aggregating several block pools

use std::fmt;

use heapless::Vec;

use crate::{
    config::DEFAULT_MAX_POOLS,
    error::{MosaicError, Result},
};

use super::{block::Block, stats::PoolStats, traits::BlockAllocator};

/// First-fit allocator over up to `M` registered pools
///
/// The manager borrows its pools; pools must outlive it and every block
/// drawn through it. Pools are registered during setup with
/// [`add_pool`](Self::add_pool) and are never removed.
pub struct PoolManager<'p, const M: usize = DEFAULT_MAX_POOLS> {
    /// Registered pools, in registration order
    pools: Vec<&'p dyn BlockAllocator, M>,
}

impl<'p, const M: usize> PoolManager<'p, M> {
    /// Create a manager with no pools
    pub const fn new() -> Self {
        Self { pools: Vec::new() }
    }

    /// Register a pool
    pub fn add_pool(&mut self, pool: &'p dyn BlockAllocator) -> Result<()> {
        if self.pools.iter().any(|p| std::ptr::addr_eq(*p, pool)) {
            return Err(MosaicError::PoolAlreadyRegistered);
        }

        self.pools
            .push(pool)
            .map_err(|_| MosaicError::too_many_pools(M))?;

        log::debug!(
            "registered pool {} of {} ({} blocks)",
            self.pools.len(),
            M,
            pool.total_blocks()
        );
        Ok(())
    }

    /// Number of registered pools
    pub fn num_pools(&self) -> usize {
        self.pools.len()
    }
}

impl<const M: usize> BlockAllocator for PoolManager<'_, M> {
    fn allocate(&self) -> Option<Block<'_>> {
        // Registration order, not best fit
        self.pools.iter().find_map(|pool| pool.allocate())
    }

    fn release(&self, block: Block<'_>) -> Result<()> {
        match self.pools.iter().find(|pool| pool.owns(&block)) {
            Some(pool) => pool.release(block),
            None => {
                let address = block.address();
                log::error!("no registered pool owns block at {:#x}", address);
                Err(MosaicError::foreign_block(address))
            }
        }
    }

    fn owns(&self, block: &Block<'_>) -> bool {
        self.pools.iter().any(|pool| pool.owns(block))
    }

    fn total_blocks(&self) -> usize {
        self.pools.iter().map(|pool| pool.total_blocks()).sum()
    }

    fn used_blocks(&self) -> usize {
        self.pools.iter().map(|pool| pool.used_blocks()).sum()
    }

    fn stats(&self) -> PoolStats {
        self.pools.iter().fold(PoolStats::new(), |mut total, pool| {
            total.merge(&pool.stats());
            total
        })
    }
}

impl<const M: usize> Default for PoolManager<'_, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const M: usize> fmt::Debug for PoolManager<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolManager")
            .field("pools", &self.pools.len())
            .field("max_pools", &M)
            .field("used_blocks", &self.used_blocks())
            .field("total_blocks", &self.total_blocks())
            .finish()
    }
}
