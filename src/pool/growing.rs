//! Growing pool over a chain of owned regions
//!
//! Wraps a [`FixedPool`] and transparently acquires a new reservoir
//! ("region") from the system allocator whenever the embedded pool is
//! exhausted. Regions are owned by the pool and only released back to the
//! system when the pool is dropped; there is no partial shrink.

use core::ptr::{self, NonNull};
use std::alloc::{self, Layout};
use std::cell::RefCell;

use tracing::{debug, trace};

use super::fixed::{FixedPool, MIN_BLOCK_SIZE};
use super::PoolConfig;
use crate::error::{PoolError, PoolResult};
use crate::pool::PoolStats;
use crate::utils::align_up;

/// One system-allocated reservoir owned by a growing pool
struct Region {
    ptr: NonNull<u8>,
    layout: Layout,
}

impl Region {
    /// Requests one region from the system allocator.
    ///
    /// Failure is surfaced as an error rather than an abort: for a pool,
    /// a refused region is a caller-visible out-of-memory condition.
    fn acquire(layout: Layout) -> PoolResult<Self> {
        debug_assert!(layout.size() > 0);
        // SAFETY: layout has non-zero size; construction rejects the
        // zero-block and zero-size configurations that could violate this.
        let raw = unsafe { alloc::alloc(layout) };
        NonNull::new(raw)
            .map(|ptr| Region { ptr, layout })
            .ok_or(PoolError::RegionAllocFailed {
                bytes: layout.size(),
            })
    }

    fn base(&self) -> NonNull<u8> {
        self.ptr
    }
}

impl Drop for Region {
    fn drop(&mut self) {
        // SAFETY: ptr came from alloc::alloc with this layout and is freed
        // exactly once, here.
        unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) };
    }
}

/// Fixed-block pool that grows by acquiring regions on demand
///
/// All free-list bookkeeping is delegated to one embedded [`FixedPool`];
/// growth swaps only that pool's fresh-space cursor to the newest region,
/// so blocks released from older regions remain allocatable. The region
/// chain exclusively owns every buffer it ever acquired and frees them all
/// on drop, and a block from any region may be released back at any time
/// during the pool's life.
///
/// The pool deals in raw storage only: constructing or dropping values
/// inside blocks is the job of [`NodeAllocator`](crate::adapter::NodeAllocator).
pub struct GrowingPool {
    pool: FixedPool,
    regions: RefCell<Vec<Region>>,
    /// Blocks per acquired region, fixed at construction
    region_blocks: usize,
    region_layout: Layout,
    block_size: usize,
}

impl GrowingPool {
    /// Creates a growing pool for raw blocks of `block_size` bytes
    ///
    /// `block_size` is clamped up to [`MIN_BLOCK_SIZE`] so every block can
    /// carry a free-list link; a pool that could never recycle its blocks
    /// would grow without bound. `region_blocks` is the growth increment
    /// and must be at least one.
    pub fn new(block_size: usize, region_blocks: usize) -> PoolResult<Self> {
        Self::with_layout(
            block_size,
            core::mem::align_of::<*mut u8>(),
            region_blocks,
            PoolConfig::default(),
        )
    }

    /// Creates a growing pool sized and aligned for values of type `T`
    pub fn for_type<T>(region_blocks: usize) -> PoolResult<Self> {
        let layout = Layout::new::<T>();
        Self::with_layout(
            layout.size(),
            layout.align(),
            region_blocks,
            PoolConfig::default(),
        )
    }

    /// Creates a growing pool with a custom configuration
    pub fn with_config(
        block_size: usize,
        region_blocks: usize,
        config: PoolConfig,
    ) -> PoolResult<Self> {
        Self::with_layout(
            block_size,
            core::mem::align_of::<*mut u8>(),
            region_blocks,
            config,
        )
    }

    fn with_layout(
        block_size: usize,
        block_align: usize,
        region_blocks: usize,
        config: PoolConfig,
    ) -> PoolResult<Self> {
        if region_blocks == 0 {
            return Err(PoolError::invalid_config(
                "growth increment must be at least one block",
            ));
        }

        // Round the block size up so every block can hold a link and
        // consecutive blocks stay aligned for the element type.
        let block_size = align_up(block_size.max(MIN_BLOCK_SIZE), block_align);

        let region_bytes = block_size
            .checked_mul(region_blocks)
            .ok_or(PoolError::InvalidConfig {
                reason: "region size overflows usize",
            })?;
        let region_layout = Layout::from_size_align(region_bytes, block_align)
            .map_err(|_| PoolError::invalid_config("region layout is invalid"))?;

        Ok(Self {
            pool: FixedPool::empty_with_config(block_size, config),
            regions: RefCell::new(Vec::new()),
            region_blocks,
            region_layout,
            block_size,
        })
    }

    /// Hands out one raw block, growing by one region if needed
    ///
    /// Delegates to the embedded fixed pool; on exhaustion, acquires one
    /// region of [`region_blocks`](Self::region_blocks) blocks and retries
    /// exactly once. The retry cannot fail (a fresh region always holds at
    /// least one block), so the only error path is the system allocator
    /// refusing the region, which is propagated unchanged.
    pub fn allocate(&self) -> PoolResult<NonNull<u8>> {
        if let Some(block) = self.pool.allocate() {
            return Ok(block);
        }

        trace!(
            block_size = self.block_size,
            "pool exhausted, acquiring region"
        );
        self.grow()?;

        self.pool
            .allocate()
            .ok_or(PoolError::Exhausted {
                block_size: self.block_size,
            })
    }

    /// Returns a block to the pool
    ///
    /// Valid for blocks from any region this pool ever acquired; the free
    /// list does not care which region a block came from.
    ///
    /// # Safety
    /// `block` must have been returned by this pool's
    /// [`allocate`](Self::allocate), must not already have been released,
    /// and must not be reachable through any live reference. Ownership
    /// transfers back to the pool when this returns.
    pub unsafe fn release(&self, block: NonNull<u8>) {
        // SAFETY: forwarded caller contract.
        unsafe { self.pool.release(block) }
    }

    fn grow(&self) -> PoolResult<()> {
        let region = Region::acquire(self.region_layout)?;

        if let Some(pattern) = self.pool.config().alloc_pattern {
            // SAFETY: the region was just allocated with region_layout.
            unsafe {
                ptr::write_bytes(region.base().as_ptr(), pattern, self.region_layout.size());
            }
        }

        // SAFETY: the region buffer is owned by self.regions until the pool
        // drops, and only the embedded pool ever touches it.
        unsafe {
            self.pool.rebind_reservoir(region.base(), self.region_blocks);
        }

        let mut regions = self.regions.borrow_mut();
        regions.push(region);
        debug!(
            regions = regions.len(),
            bytes = self.region_layout.size(),
            "acquired pool region"
        );
        Ok(())
    }

    /// Returns the size of each block in bytes (after clamping/rounding)
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Returns the number of blocks acquired per region
    pub fn region_blocks(&self) -> usize {
        self.region_blocks
    }

    /// Returns the number of regions acquired so far
    pub fn region_count(&self) -> usize {
        self.regions.borrow().len()
    }

    /// Returns a statistics snapshot, if tracking is enabled
    pub fn stats(&self) -> Option<PoolStats> {
        self.pool.stats()
    }
}

impl core::fmt::Debug for GrowingPool {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GrowingPool")
            .field("block_size", &self.block_size)
            .field("region_blocks", &self.region_blocks)
            .field("region_count", &self.region_count())
            .finish()
    }
}
