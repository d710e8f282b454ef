//! Block pool statistics tracking

use std::cell::Cell;

/// Statistics snapshot for a pool or a group of pools
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Number of blocks in the pool
    pub total_blocks: usize,
    /// Number of blocks currently handed out
    pub used_blocks: usize,
    /// Highest `used_blocks` seen
    pub peak_used_blocks: usize,
    /// Successful allocations
    pub total_allocations: u64,
    /// Blocks given back
    pub total_releases: u64,
    /// Allocations refused because the pool was exhausted
    pub allocation_failures: u64,
}

impl PoolStats {
    /// Create new statistics instance
    pub fn new() -> Self {
        Default::default()
    }

    /// Number of blocks available
    pub fn free_blocks(&self) -> usize {
        self.total_blocks - self.used_blocks
    }

    /// Calculate allocation success rate (0.0 to 1.0)
    pub fn success_rate(&self) -> f64 {
        let requests = self.total_allocations + self.allocation_failures;
        if requests == 0 {
            return 1.0;
        }
        self.total_allocations as f64 / requests as f64
    }

    /// Get allocation failure rate (0.0 to 1.0)
    pub fn failure_rate(&self) -> f64 {
        1.0 - self.success_rate()
    }

    /// Calculate pool utilization (0.0 to 1.0)
    pub fn utilization(&self) -> f64 {
        if self.total_blocks == 0 {
            return 0.0;
        }
        self.used_blocks as f64 / self.total_blocks as f64
    }

    /// Check if no block is available
    pub fn is_exhausted(&self) -> bool {
        self.used_blocks >= self.total_blocks
    }

    /// Fold another snapshot into this one
    ///
    /// Peaks are summed, which bounds the true combined peak from above.
    pub fn merge(&mut self, other: &PoolStats) {
        self.total_blocks += other.total_blocks;
        self.used_blocks += other.used_blocks;
        self.peak_used_blocks += other.peak_used_blocks;
        self.total_allocations += other.total_allocations;
        self.total_releases += other.total_releases;
        self.allocation_failures += other.allocation_failures;
    }

    /// Get a summary string of the statistics
    pub fn summary(&self) -> String {
        format!(
            "PoolStats {{ blocks: {}, used: {}, peak: {}, allocations: {}, \
             releases: {}, failures: {}, utilization: {:.2}% }}",
            self.total_blocks,
            self.used_blocks,
            self.peak_used_blocks,
            self.total_allocations,
            self.total_releases,
            self.allocation_failures,
            self.utilization() * 100.0
        )
    }
}

/// Live counters kept by a single pool
#[derive(Debug, Default)]
pub struct PoolCounters {
    used: Cell<usize>,
    peak_used: Cell<usize>,
    allocations: Cell<u64>,
    releases: Cell<u64>,
    failures: Cell<u64>,
}

impl PoolCounters {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blocks currently handed out
    pub fn used(&self) -> usize {
        self.used.get()
    }

    /// Record a successful allocation
    pub fn record_allocation(&self) {
        let used = self.used.get() + 1;
        self.used.set(used);
        if used > self.peak_used.get() {
            self.peak_used.set(used);
        }
        self.allocations.set(self.allocations.get() + 1);
    }

    /// Record a block coming back
    pub fn record_release(&self) {
        self.used.set(self.used.get() - 1);
        self.releases.set(self.releases.get() + 1);
    }

    /// Record an allocation failure
    pub fn record_failure(&self) {
        self.failures.set(self.failures.get() + 1);
    }

    /// Get current statistics snapshot
    pub fn snapshot(&self, total_blocks: usize) -> PoolStats {
        PoolStats {
            total_blocks,
            used_blocks: self.used.get(),
            peak_used_blocks: self.peak_used.get(),
            total_allocations: self.allocations.get(),
            total_releases: self.releases.get(),
            allocation_failures: self.failures.get(),
        }
    }
}
