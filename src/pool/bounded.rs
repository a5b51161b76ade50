//! Typed pool over a caller-owned buffer
//!
//! The bounded variant never manages storage: the caller hands in a slice
//! of `MaybeUninit<T>` and keeps ownership of it. The exclusive borrow does
//! what would otherwise need a runtime check: the buffer provably
//! outlives the pool, and no second pool can alias the same storage.

use core::marker::PhantomData;
use core::mem::{size_of, MaybeUninit};
use core::ptr::NonNull;

use super::fixed::FixedPool;
use super::{PoolConfig, PoolStats};

/// Fixed-capacity typed pool over a caller-supplied buffer
///
/// Hands out raw, uninitialized `T`-sized slots from the buffer; the pool
/// exhausts permanently once all slots are checked out and none are
/// released. Nothing is freed on drop; the buffer belongs to the caller.
///
/// If `size_of::<T>()` is smaller than
/// [`MIN_BLOCK_SIZE`](super::MIN_BLOCK_SIZE) the pool has zero usable
/// slots: such blocks cannot carry a free-list link, so the pool degrades
/// to "always exhausted" rather than misbehaving.
///
/// Moving the pool is fine: slot addresses live in the buffer, which stays
/// put behind the borrow. There is deliberately no `Clone`: two pools over
/// one buffer would corrupt each other's free lists.
pub struct BoundedPool<'buf, T> {
    pool: FixedPool,
    capacity: usize,
    _buffer: PhantomData<&'buf mut [MaybeUninit<T>]>,
}

impl<'buf, T> BoundedPool<'buf, T> {
    /// Creates a pool over the caller's buffer
    pub fn new(buffer: &'buf mut [MaybeUninit<T>]) -> Self {
        Self::with_config(buffer, PoolConfig::default())
    }

    /// Creates a pool over the caller's buffer with a custom configuration
    pub fn with_config(buffer: &'buf mut [MaybeUninit<T>], config: PoolConfig) -> Self {
        let block_count = buffer.len();
        let reservoir = NonNull::new(buffer.as_mut_ptr().cast::<u8>())
            .unwrap_or(NonNull::dangling());

        // SAFETY: the exclusive borrow guarantees block_count slots of
        // size_of::<T>() bytes, untouched by anyone else for 'buf.
        let pool = unsafe {
            FixedPool::with_reservoir_config(reservoir, block_count, size_of::<T>(), config)
        };
        let capacity = pool.fresh_remaining();

        Self {
            pool,
            capacity,
            _buffer: PhantomData,
        }
    }

    /// Hands out one uninitialized slot, or `None` when exhausted
    pub fn allocate(&self) -> Option<NonNull<T>> {
        self.pool.allocate().map(NonNull::cast)
    }

    /// Returns a slot to the pool
    ///
    /// Any value stored in the slot must already have been dropped or moved
    /// out; the pool reclaims storage only.
    ///
    /// # Safety
    /// `block` must have been returned by this pool's
    /// [`allocate`](Self::allocate), must not already have been released,
    /// and must not be reachable through any live reference.
    pub unsafe fn release(&self, block: NonNull<T>) {
        // SAFETY: forwarded caller contract.
        unsafe { self.pool.release(block.cast()) }
    }

    /// Returns the number of usable slots in the buffer
    ///
    /// Zero when `T` is too small to hold a free-list link.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns a statistics snapshot, if tracking is enabled
    pub fn stats(&self) -> Option<PoolStats> {
        self.pool.stats()
    }
}

impl<T> core::fmt::Debug for BoundedPool<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BoundedPool")
            .field("capacity", &self.capacity)
            .field("fresh_remaining", &self.pool.fresh_remaining())
            .finish()
    }
}
