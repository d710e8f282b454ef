//! Statistics for the transfer buffer manager

/// Slot occupancy snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferBufferManagerStats {
    /// Static slots bound to a key
    pub static_in_use: usize,
    /// Number of static slots
    pub static_capacity: usize,
    /// Dynamic buffers bound to a key
    pub dynamic_in_use: usize,
    /// Number of dynamic buffers the manager can hold
    pub dynamic_capacity: usize,
}

impl TransferBufferManagerStats {
    /// Get the number of transfers being buffered
    pub fn total_in_use(&self) -> usize {
        self.static_in_use + self.dynamic_in_use
    }

    /// Get the number of concurrent transfers supported
    pub fn total_capacity(&self) -> usize {
        self.static_capacity + self.dynamic_capacity
    }

    /// Check if another `create` would fail for lack of slots
    pub fn is_saturated(&self) -> bool {
        self.total_in_use() >= self.total_capacity()
    }

    /// Get a summary string of the statistics
    pub fn summary(&self) -> String {
        format!(
            "TransferBufferManagerStats {{ static: {}/{}, dynamic: {}/{} }}",
            self.static_in_use, self.static_capacity, self.dynamic_in_use, self.dynamic_capacity
        )
    }
}
