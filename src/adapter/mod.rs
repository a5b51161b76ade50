//! Allocator adapter for node-based containers
//!
//! Exposes the minimal contract a generic sequence/container type expects
//! from a pluggable storage strategy: single-node allocate/deallocate plus
//! placement construct/destroy, delegating raw storage to a pool.

pub mod node_alloc;
pub mod pool_box;

pub use node_alloc::{BlockSource, NodeAllocator};
pub use pool_box::PoolBox;
