//! Smart pointer for pool-allocated values

use core::mem;
use core::ops::{Deref, DerefMut};
use core::ptr::{self, NonNull};

use super::node_alloc::{BlockSource, NodeAllocator};
use crate::error::PoolResult;
use crate::pool::GrowingPool;

/// RAII smart pointer for a single pool-allocated value
///
/// Automatically destroys the value and returns its block when dropped.
/// Similar to `Box` but backed by a [`NodeAllocator`].
pub struct PoolBox<'a, T, P: BlockSource = GrowingPool> {
    ptr: NonNull<T>,
    nodes: &'a NodeAllocator<T, P>,
}

impl<'a, T, P: BlockSource> PoolBox<'a, T, P> {
    /// Allocates a node and moves `value` into it
    #[must_use = "allocated value must be used"]
    pub fn new_in(value: T, nodes: &'a NodeAllocator<T, P>) -> PoolResult<Self> {
        let ptr = nodes.allocate(1)?;
        // SAFETY: ptr is fresh storage from this allocator; write moves
        // value in without dropping the uninitialized destination.
        unsafe { nodes.construct(ptr, value) };
        Ok(Self { ptr, nodes })
    }

    /// Consumes the box and returns the contained value
    #[must_use]
    pub fn into_inner(self) -> T {
        // SAFETY: self.ptr points to an initialized T that this box owns.
        // ptr::read moves it out, the block goes back to the pool, and
        // forget skips Drop so nothing is destroyed twice.
        unsafe {
            let value = ptr::read(self.ptr.as_ptr());
            self.nodes.deallocate(self.ptr, 1);
            mem::forget(self);
            value
        }
    }
}

impl<T, P: BlockSource> Deref for PoolBox<'_, T, P> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: self.ptr points to an initialized T owned by this box.
        unsafe { self.ptr.as_ref() }
    }
}

impl<T, P: BlockSource> DerefMut for PoolBox<'_, T, P> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: &mut self gives exclusive access to the owned value.
        unsafe { self.ptr.as_mut() }
    }
}

impl<T, P: BlockSource> Drop for PoolBox<'_, T, P> {
    fn drop(&mut self) {
        // SAFETY: self.ptr holds a live T from this allocator; destroy
        // runs its destructor, then the block is restored exactly once.
        unsafe {
            self.nodes.destroy(self.ptr);
            self.nodes.deallocate(self.ptr, 1);
        }
    }
}

impl<T: core::fmt::Debug, P: BlockSource> core::fmt::Debug for PoolBox<'_, T, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(&**self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deref_and_drop() {
        let nodes = NodeAllocator::<Vec<u32>>::new(4).unwrap();

        let mut boxed = PoolBox::new_in(vec![1, 2], &nodes).unwrap();
        boxed.push(3);
        assert_eq!(&*boxed, &[1, 2, 3]);
        drop(boxed);

        // The freed node is recycled for the next allocation.
        let stats = nodes.pool().stats().unwrap();
        assert_eq!(stats.in_use, 0);
    }

    #[test]
    fn into_inner_moves_value_out() {
        let nodes = NodeAllocator::<String>::new(4).unwrap();

        let boxed = PoolBox::new_in(String::from("kept"), &nodes).unwrap();
        let value = boxed.into_inner();
        assert_eq!(value, "kept");
        assert_eq!(nodes.pool().stats().unwrap().in_use, 0);
    }
}
