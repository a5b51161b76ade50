//! Single-node allocator over a block pool

use core::marker::PhantomData;
use core::mem::size_of;
use core::ptr::{self, NonNull};

use crate::error::{PoolError, PoolResult};
use crate::pool::{FixedPool, GrowingPool};

/// Raw block supplier consumed by [`NodeAllocator`]
///
/// The seam between the adapter and the pool variants. Exhaustion handling
/// differs per implementor: a [`FixedPool`] that runs dry reports
/// [`PoolError::Exhausted`], a [`GrowingPool`] grows first and fails only
/// if the system allocator refuses a region.
pub trait BlockSource {
    /// Hands out one raw block, or an error when no storage is available
    fn acquire(&self) -> PoolResult<NonNull<u8>>;

    /// Returns a block to the source
    ///
    /// # Safety
    /// `block` must have been returned by this source's
    /// [`acquire`](Self::acquire) and not already restored.
    unsafe fn restore(&self, block: NonNull<u8>);

    /// Returns the size of the blocks this source hands out
    fn block_size(&self) -> usize;
}

impl BlockSource for FixedPool {
    fn acquire(&self) -> PoolResult<NonNull<u8>> {
        self.allocate()
            .ok_or(PoolError::Exhausted {
                block_size: self.block_size(),
            })
    }

    unsafe fn restore(&self, block: NonNull<u8>) {
        // SAFETY: forwarded caller contract.
        unsafe { self.release(block) }
    }

    fn block_size(&self) -> usize {
        FixedPool::block_size(self)
    }
}

impl BlockSource for GrowingPool {
    fn acquire(&self) -> PoolResult<NonNull<u8>> {
        self.allocate()
    }

    unsafe fn restore(&self, block: NonNull<u8>) {
        // SAFETY: forwarded caller contract.
        unsafe { self.release(block) }
    }

    fn block_size(&self) -> usize {
        GrowingPool::block_size(self)
    }
}

/// Node storage strategy for generic containers
///
/// Satisfies the contract node-based containers expect from a pluggable
/// allocator: `allocate(count)` / `deallocate(ptr, count)` for storage,
/// `construct` / `destroy` for the value lifecycle inside that storage.
/// This pool family only ever hands out single fixed-size blocks, so
/// `allocate` rejects any `count` other than one.
///
/// This is the one layer where exhaustion becomes an error instead of a
/// `None`: a container that asked for a node cannot proceed without it.
pub struct NodeAllocator<T, P: BlockSource = GrowingPool> {
    pool: P,
    _marker: PhantomData<fn(T) -> T>,
}

impl<T> NodeAllocator<T, GrowingPool> {
    /// Creates a node allocator backed by a growing pool sized for `T`
    ///
    /// `region_blocks` is the growth increment of the underlying pool.
    pub fn new(region_blocks: usize) -> PoolResult<Self> {
        Ok(Self {
            pool: GrowingPool::for_type::<T>(region_blocks)?,
            _marker: PhantomData,
        })
    }
}

impl<T, P: BlockSource> NodeAllocator<T, P> {
    /// Wraps an arbitrary block source
    ///
    /// Rejects sources whose blocks are too small for `T`.
    ///
    /// # Safety
    /// The source's blocks must be aligned for `T`. Block size is checked
    /// here, alignment cannot be: a [`FixedPool`] only knows the reservoir
    /// its caller bound, so alignment is part of the caller's contract.
    pub unsafe fn with_pool<Q: BlockSource>(pool: Q) -> PoolResult<NodeAllocator<T, Q>> {
        if pool.block_size() < size_of::<T>() {
            return Err(PoolError::invalid_config(
                "pool blocks are smaller than the node type",
            ));
        }
        Ok(NodeAllocator {
            pool,
            _marker: PhantomData,
        })
    }

    /// Allocates storage for `count` nodes
    ///
    /// `count` must be exactly one; this allocator never hands out
    /// arrays. Returns uninitialized storage; pair with
    /// [`construct`](Self::construct) before use.
    pub fn allocate(&self, count: usize) -> PoolResult<NonNull<T>> {
        if count != 1 {
            return Err(PoolError::not_single_block(count));
        }
        self.pool.acquire().map(NonNull::cast)
    }

    /// Returns node storage to the pool
    ///
    /// Any value in the storage must already have been
    /// [`destroy`](Self::destroy)ed or moved out.
    ///
    /// # Safety
    /// `ptr` must have come from this allocator's
    /// [`allocate`](Self::allocate) with the same `count` (one), and must
    /// not already have been deallocated.
    pub unsafe fn deallocate(&self, ptr: NonNull<T>, count: usize) {
        debug_assert_eq!(count, 1, "pool nodes are deallocated one at a time");
        // SAFETY: forwarded caller contract.
        unsafe { self.pool.restore(ptr.cast()) }
    }

    /// Writes `value` into already-allocated storage
    ///
    /// # Safety
    /// `ptr` must point to storage from this allocator that does not
    /// currently hold a live value.
    pub unsafe fn construct(&self, ptr: NonNull<T>, value: T) {
        // SAFETY: ptr is valid for writes of T per the caller contract.
        unsafe { ptr.as_ptr().write(value) }
    }

    /// Runs the value's destructor without freeing its storage
    ///
    /// # Safety
    /// `ptr` must point to a live `T` constructed in storage from this
    /// allocator; the value must not be used afterwards.
    pub unsafe fn destroy(&self, ptr: NonNull<T>) {
        // SAFETY: ptr points to a live T per the caller contract.
        unsafe { ptr::drop_in_place(ptr.as_ptr()) }
    }

    /// Returns the underlying block source
    pub fn pool(&self) -> &P {
        &self.pool
    }
}

impl<T, P: BlockSource + core::fmt::Debug> core::fmt::Debug for NodeAllocator<T, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeAllocator")
            .field("pool", &self.pool)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_array_requests() {
        let nodes = NodeAllocator::<u64>::new(8).unwrap();

        assert_eq!(
            nodes.allocate(0).unwrap_err(),
            PoolError::NotSingleBlock { requested: 0 }
        );
        assert_eq!(
            nodes.allocate(2).unwrap_err(),
            PoolError::NotSingleBlock { requested: 2 }
        );
    }

    #[test]
    fn construct_and_destroy_roundtrip() {
        let nodes = NodeAllocator::<String>::new(4).unwrap();

        let ptr = nodes.allocate(1).unwrap();
        unsafe {
            nodes.construct(ptr, String::from("payload"));
            assert_eq!(ptr.as_ref(), "payload");
            nodes.destroy(ptr);
            nodes.deallocate(ptr, 1);
        }
    }

    #[test]
    fn with_pool_checks_block_size() {
        let small = GrowingPool::new(8, 4).unwrap();
        let err = unsafe { NodeAllocator::<[u64; 4]>::with_pool(small) }.unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfig { .. }));
    }
}
