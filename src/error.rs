//! Error types for pool operations
//!
//! Exhaustion of a bare pool is *not* an error: `FixedPool::allocate` and
//! `BoundedPool::allocate` signal it with `None`, because running dry is an
//! expected outcome for a bounded pool. `PoolError` exists for the layers
//! where a failure must propagate: growing-pool region acquisition, and the
//! node-allocator adapter whose caller cannot proceed without storage.

use thiserror::Error;

/// Result type for pool operations
pub type PoolResult<T> = std::result::Result<T, PoolError>;

/// Pool operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// No free block, no fresh reservoir space, and no way to grow
    #[error("pool exhausted (block size {block_size})")]
    Exhausted {
        /// Block size of the exhausted pool in bytes
        block_size: usize,
    },

    /// The adapter was asked for an array; pools hand out single blocks only
    #[error("pool allocators serve single blocks only, {requested} requested")]
    NotSingleBlock {
        /// Number of contiguous elements the caller asked for
        requested: usize,
    },

    /// The system allocator refused a new region
    #[error("system allocator refused a {bytes} byte region")]
    RegionAllocFailed {
        /// Size of the rejected region in bytes
        bytes: usize,
    },

    /// Invalid construction parameters
    #[error("invalid pool configuration: {reason}")]
    InvalidConfig {
        /// What was wrong with the configuration
        reason: &'static str,
    },
}

impl PoolError {
    /// Create an exhaustion error
    pub fn exhausted(block_size: usize) -> Self {
        Self::Exhausted { block_size }
    }

    /// Create a multi-block rejection error
    pub fn not_single_block(requested: usize) -> Self {
        Self::NotSingleBlock { requested }
    }

    /// Create a region acquisition failure
    pub fn region_alloc_failed(bytes: usize) -> Self {
        Self::RegionAllocFailed { bytes }
    }

    /// Create a configuration error
    pub fn invalid_config(reason: &'static str) -> Self {
        Self::InvalidConfig { reason }
    }

    /// Checks whether this error means "no storage available", either pool
    /// exhaustion or a refused region
    pub fn is_out_of_memory(&self) -> bool {
        matches!(
            self,
            Self::Exhausted { .. } | Self::RegionAllocFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_context() {
        let err = PoolError::not_single_block(4);
        assert_eq!(
            err.to_string(),
            "pool allocators serve single blocks only, 4 requested"
        );
    }

    #[test]
    fn out_of_memory_classification() {
        assert!(PoolError::exhausted(64).is_out_of_memory());
        assert!(PoolError::region_alloc_failed(4096).is_out_of_memory());
        assert!(!PoolError::not_single_block(2).is_out_of_memory());
        assert!(!PoolError::invalid_config("zero increment").is_out_of_memory());
    }
}
