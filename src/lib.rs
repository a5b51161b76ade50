//! Fixed-block-size memory pools for node-heavy workloads
//!
//! This crate provides fixed-size block allocation primitives built around
//! an intrusive free list, including:
//!
//! - [`FixedPool`]: bump-plus-free-list allocation over a caller-owned reservoir
//! - [`GrowingPool`]: a region chain that acquires more storage on exhaustion
//! - [`BoundedPool`]: a typed facade over a fixed caller-owned buffer
//! - [`NodeAllocator`] and [`PoolBox`]: the container-facing adapter layer
//!
//! All pools are single-threaded by design; none of the types are `Sync`.
//!
//! # Example
//!
//! ```
//! use fixpool::{NodeAllocator, PoolBox};
//!
//! fn main() -> fixpool::PoolResult<()> {
//!     // A growing pool sized for u64 nodes, 64 blocks per region
//!     let nodes = NodeAllocator::<u64>::new(64)?;
//!
//!     let value = PoolBox::new_in(42u64, &nodes)?;
//!     assert_eq!(*value, 42);
//!
//!     // Dropped values hand their block back for reuse
//!     drop(value);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod adapter;
pub mod error;
pub mod pool;
pub mod utils;

pub use adapter::{BlockSource, NodeAllocator, PoolBox};
pub use error::{PoolError, PoolResult};
pub use pool::{BoundedPool, FixedPool, GrowingPool, PoolConfig, PoolStats, MIN_BLOCK_SIZE};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
