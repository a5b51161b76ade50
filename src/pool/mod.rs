//! Fixed-block pool implementations
//!
//! Three variants over one core algorithm:
//! - [`FixedPool`]: the core, one reservoir, a bump cursor for fresh
//!   blocks, and an intrusive free list for reclaimed ones
//! - [`GrowingPool`]: acquires additional regions on demand, frees them
//!   all on drop
//! - [`BoundedPool`]: typed facade over a caller-owned buffer that
//!   exhausts permanently

pub mod bounded;
pub mod config;
pub mod fixed;
pub mod growing;
pub mod stats;

pub use bounded::BoundedPool;
pub use config::PoolConfig;
pub use fixed::{FixedPool, MIN_BLOCK_SIZE};
pub use growing::GrowingPool;
pub use stats::PoolStats;
