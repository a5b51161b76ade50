//! Pool configuration

/// Configuration shared by the pool variants
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Enable allocation/release counters
    pub track_stats: bool,

    /// Fill pattern written over a fresh region when it is acquired
    pub alloc_pattern: Option<u8>,

    /// Fill pattern written over a block when it is released
    pub dealloc_pattern: Option<u8>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            track_stats: cfg!(debug_assertions),
            alloc_pattern: if cfg!(debug_assertions) { Some(0xBB) } else { None },
            dealloc_pattern: if cfg!(debug_assertions) { Some(0xDD) } else { None },
        }
    }
}

impl PoolConfig {
    /// Production configuration, no counters or fill patterns
    pub fn production() -> Self {
        Self {
            track_stats: false,
            alloc_pattern: None,
            dealloc_pattern: None,
        }
    }

    /// Debug configuration, counters on and stale memory poisoned
    pub fn debug() -> Self {
        Self {
            track_stats: true,
            alloc_pattern: Some(0xBB),
            dealloc_pattern: Some(0xDD),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        assert!(!PoolConfig::production().track_stats);
        assert_eq!(PoolConfig::production().dealloc_pattern, None);
        assert!(PoolConfig::debug().track_stats);
        assert_eq!(PoolConfig::debug().alloc_pattern, Some(0xBB));
    }
}
