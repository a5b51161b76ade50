//! Pool statistics

/// Statistics snapshot for a pool
///
/// Counters are best-effort when blocks are seeded from external storage:
/// a release without a matching allocation makes `in_use` saturate at zero
/// rather than underflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Total blocks handed out
    pub total_allocs: u64,
    /// Total blocks returned
    pub total_releases: u64,
    /// Blocks currently checked out
    pub in_use: u64,
    /// Peak number of blocks checked out at once
    pub peak_in_use: u64,
    /// Size of each block in bytes
    pub block_size: usize,
    /// Untouched reservoir blocks still available
    pub fresh_remaining: usize,
}
