//! Core fixed-block pool
//!
//! # Safety
//!
//! This module owns the only raw-memory bookkeeping in the crate:
//! - Fixed-size blocks are carved from a reservoir by a bump cursor
//! - Released blocks form an intrusive singly-linked free list: the first
//!   pointer-width bytes of a free block store the previous list head
//! - Links are read and written with unaligned pointer access, so block
//!   sizes that are not multiples of the pointer size (e.g. 23) work
//!
//! ## Invariants
//!
//! - Every address ever returned by `allocate` is in exactly one of three
//!   states: checked out to the caller, on the free list once, or still
//!   unallocated reservoir space
//! - The fresh cursor only advances; reclaimed space moves through the free
//!   list, never back into the fresh range
//! - While a block is on the free list, only the pool interprets its first
//!   bytes; once handed out, those bytes are caller payload again

use core::cell::Cell;
use core::mem::size_of;
use core::ptr::{self, NonNull};

use super::{PoolConfig, PoolStats};

/// Smallest block size that can carry a free-list link
pub const MIN_BLOCK_SIZE: usize = size_of::<*mut u8>();

/// Fixed-block pool over a single reservoir
///
/// Manages one contiguous byte buffer as equal-sized blocks with O(1)
/// handout and reclaim. The pool never owns the reservoir: callers bind it
/// at construction and guarantee it outlives the pool's use of it. Once
/// the reservoir's fresh space and the free list are both empty the pool is
/// exhausted; it never acquires more memory on its own (see
/// [`GrowingPool`](super::GrowingPool) for that).
///
/// # Memory Layout
/// ```text
/// reservoir: [Block0][Block1][Block2][Block3] ... [BlockN]
///                               ^fresh cursor
/// free list: head -> Block1 -> Block0 -> null   (threaded through blocks)
/// ```
///
/// State lives in `Cell`s: the pool mutates through `&self` but is
/// unsynchronized and deliberately `!Sync`. Sharing one pool across threads
/// requires external synchronization.
pub struct FixedPool {
    /// Size of each block in bytes
    block_size: usize,

    /// Next never-yet-handed-out block in the reservoir
    fresh_cursor: Cell<*mut u8>,

    /// Untouched blocks still reachable through the cursor
    fresh_remaining: Cell<usize>,

    /// Most recently released block, or null
    free_head: Cell<*mut u8>,

    config: PoolConfig,

    total_allocs: Cell<u64>,
    total_releases: Cell<u64>,
    peak_in_use: Cell<u64>,
}

/// Reads the free-list link stored in a block's first bytes.
///
/// # Safety
/// `block` must point to at least `MIN_BLOCK_SIZE` readable bytes that were
/// last written by `write_link`.
#[inline(always)]
unsafe fn read_link(block: *mut u8) -> *mut u8 {
    // Unaligned: odd block sizes put links at arbitrary addresses.
    unsafe { block.cast::<*mut u8>().read_unaligned() }
}

/// Writes the free-list link into a block's first bytes.
///
/// # Safety
/// `block` must point to at least `MIN_BLOCK_SIZE` writable bytes.
#[inline(always)]
unsafe fn write_link(block: *mut u8, next: *mut u8) {
    unsafe { block.cast::<*mut u8>().write_unaligned(next) }
}

impl FixedPool {
    /// Creates a pool with no reservoir
    ///
    /// The pool starts exhausted; it becomes usable once blocks are
    /// [`release`](Self::release)d into it. This is the seeding pattern: an
    /// allocator bootstrapped entirely from externally-owned storage.
    pub fn empty(block_size: usize) -> Self {
        Self::empty_with_config(block_size, PoolConfig::default())
    }

    /// Creates a pool with no reservoir and a custom configuration
    pub fn empty_with_config(block_size: usize, config: PoolConfig) -> Self {
        Self {
            block_size,
            fresh_cursor: Cell::new(ptr::null_mut()),
            fresh_remaining: Cell::new(0),
            free_head: Cell::new(ptr::null_mut()),
            config,
            total_allocs: Cell::new(0),
            total_releases: Cell::new(0),
            peak_in_use: Cell::new(0),
        }
    }

    /// Binds a pool to a caller-owned reservoir
    ///
    /// If `block_size` is smaller than [`MIN_BLOCK_SIZE`], the block count
    /// is forced to zero: blocks too small to hold a free-list link are
    /// treated as "no usable blocks", not as an error.
    ///
    /// # Safety
    /// `reservoir` must be valid for reads and writes of
    /// `block_count * block_size` bytes for as long as the pool (or any
    /// block it handed out) is in use, and must not be accessed through any
    /// other path during that time.
    pub unsafe fn with_reservoir(
        reservoir: NonNull<u8>,
        block_count: usize,
        block_size: usize,
    ) -> Self {
        // SAFETY: forwarded caller contract.
        unsafe {
            Self::with_reservoir_config(reservoir, block_count, block_size, PoolConfig::default())
        }
    }

    /// Binds a pool to a caller-owned reservoir with a custom configuration
    ///
    /// # Safety
    /// Same contract as [`with_reservoir`](Self::with_reservoir).
    pub unsafe fn with_reservoir_config(
        reservoir: NonNull<u8>,
        block_count: usize,
        block_size: usize,
        config: PoolConfig,
    ) -> Self {
        let pool = Self::empty_with_config(block_size, config);
        // SAFETY: forwarded caller contract.
        unsafe { pool.rebind_reservoir(reservoir, block_count) };
        pool
    }

    /// Points the fresh-space cursor at a new reservoir
    ///
    /// Only the cursor and fresh count change; the free list is preserved,
    /// so blocks released from earlier reservoirs stay allocatable. This is
    /// the hook [`GrowingPool`](super::GrowingPool) uses when it acquires a
    /// region. A `block_size` below [`MIN_BLOCK_SIZE`] forces the count to
    /// zero, as in construction.
    ///
    /// # Safety
    /// Same contract as [`with_reservoir`](Self::with_reservoir): the new
    /// reservoir must stay valid and exclusively reachable through this
    /// pool for as long as it is in use.
    pub unsafe fn rebind_reservoir(&self, reservoir: NonNull<u8>, block_count: usize) {
        let usable = if self.block_size < MIN_BLOCK_SIZE {
            0
        } else {
            block_count
        };
        self.fresh_cursor.set(reservoir.as_ptr());
        self.fresh_remaining.set(usable);
    }

    /// Hands out one block, or `None` when exhausted
    ///
    /// Pops the free-list head if the list is non-empty, otherwise takes
    /// the next fresh reservoir slot. Both paths are O(1). Exhaustion is an
    /// expected outcome, not an error.
    pub fn allocate(&self) -> Option<NonNull<u8>> {
        let head = self.free_head.get();

        let block = if !head.is_null() {
            // SAFETY: head was linked by release(); its first bytes hold
            // the previous free-list head.
            let next = unsafe { read_link(head) };
            self.free_head.set(next);
            head
        } else if self.fresh_remaining.get() > 0 {
            let cursor = self.fresh_cursor.get();
            // SAFETY: fresh_remaining > 0, so cursor is inside the bound
            // reservoir and one more block of reservoir space follows it.
            self.fresh_cursor.set(unsafe { cursor.add(self.block_size) });
            self.fresh_remaining.set(self.fresh_remaining.get() - 1);
            cursor
        } else {
            return None;
        };

        if self.config.track_stats {
            self.total_allocs.set(self.total_allocs.get() + 1);
            let in_use = self
                .total_allocs
                .get()
                .saturating_sub(self.total_releases.get());
            if in_use > self.peak_in_use.get() {
                self.peak_in_use.set(in_use);
            }
        }

        NonNull::new(block)
    }

    /// Returns a block to the pool
    ///
    /// Unconditionally pushes `block` onto the free-list head in O(1). No
    /// membership check is performed, which is intentional in both
    /// directions:
    ///
    /// - Releasing an address this pool never handed out is a supported
    ///   escape hatch: any properly-sized external storage released into
    ///   the pool becomes allocatable, letting callers seed a pool that has
    ///   no reservoir of its own.
    /// - Releasing the same block twice, or an address smaller than the
    ///   pool's block size, corrupts the free list silently. That is
    ///   undefined behavior by design; the pool does not pay for runtime
    ///   detection.
    ///
    /// # Safety
    /// `block` must be valid for reads and writes of `block_size` bytes
    /// (at least [`MIN_BLOCK_SIZE`] bytes), must not be reachable through
    /// any live reference, and must not already be on the free list.
    /// Ownership of the block transfers to the pool when this returns.
    pub unsafe fn release(&self, block: NonNull<u8>) {
        if let Some(pattern) = self.config.dealloc_pattern {
            // SAFETY: caller guarantees block_size writable bytes.
            unsafe { ptr::write_bytes(block.as_ptr(), pattern, self.block_size) };
        }

        // SAFETY: caller guarantees at least MIN_BLOCK_SIZE writable bytes;
        // the link overwrites the first bytes of the (now stale) payload.
        unsafe { write_link(block.as_ptr(), self.free_head.get()) };
        self.free_head.set(block.as_ptr());

        if self.config.track_stats {
            self.total_releases.set(self.total_releases.get() + 1);
        }
    }

    /// Returns the size of each block in bytes
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Returns the number of untouched reservoir blocks left
    pub fn fresh_remaining(&self) -> usize {
        self.fresh_remaining.get()
    }

    /// Checks whether the free list currently holds at least one block
    pub fn has_free(&self) -> bool {
        !self.free_head.get().is_null()
    }

    /// Returns a statistics snapshot, if tracking is enabled
    pub fn stats(&self) -> Option<PoolStats> {
        if !self.config.track_stats {
            return None;
        }

        Some(PoolStats {
            total_allocs: self.total_allocs.get(),
            total_releases: self.total_releases.get(),
            in_use: self
                .total_allocs
                .get()
                .saturating_sub(self.total_releases.get()),
            peak_in_use: self.peak_in_use.get(),
            block_size: self.block_size,
            fresh_remaining: self.fresh_remaining.get(),
        })
    }

    pub(crate) fn config(&self) -> &PoolConfig {
        &self.config
    }
}

impl core::fmt::Debug for FixedPool {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FixedPool")
            .field("block_size", &self.block_size)
            .field("fresh_remaining", &self.fresh_remaining.get())
            .field("has_free", &self.has_free())
            .finish()
    }
}
