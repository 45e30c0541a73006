//! Replication catch-up configuration.

/// Limits for WAL catch-up batches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchupConfig {
    /// Maximum number of entries per batch.
    pub max_batch_entries: usize,

    /// Maximum total payload bytes per batch.
    ///
    /// A batch always carries at least one entry, even if that entry alone
    /// exceeds this limit.
    pub max_batch_bytes: usize,
}

impl Default for CatchupConfig {
    fn default() -> Self {
        Self {
            max_batch_entries: 1024,
            max_batch_bytes: 4 * 1024 * 1024, // 4 MB
        }
    }
}

impl CatchupConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of entries per batch.
    #[must_use]
    pub const fn max_batch_entries(mut self, value: usize) -> Self {
        self.max_batch_entries = value;
        self
    }

    /// Sets the maximum payload bytes per batch.
    #[must_use]
    pub const fn max_batch_bytes(mut self, value: usize) -> Self {
        self.max_batch_bytes = value;
        self
    }
}
