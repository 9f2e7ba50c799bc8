//! # Arena
//!
//! A multi-pool bump allocator: an ordered, growable collection of
//! [`Pool`]s, a cursor identifying the pool new allocations bump into,
//! and the size of the most recent allocation for in-place resize.
//!
//! Allocation never touches more than the current pool. When it is full,
//! the caller decides whether to [`Arena::grow`]; the arena never
//! silently attaches backing memory mid-request.

use tracing::{debug, trace};

use crate::error::ArenaError;
use crate::pool::Pool;

/// Capacity substituted when an owned pool is requested with capacity 0
/// and no [`ArenaConfig`] override is given (50 KiB).
pub const DEFAULT_CAPACITY: usize = 50 * 1024;

/// Construction-time configuration.
///
/// Passed explicitly instead of living in process-wide constants, so two
/// arenas in one program can disagree about their defaults.
#[derive(Clone, Copy, Debug)]
pub struct ArenaConfig {
    /// Capacity used when an owned pool is requested with capacity 0.
    pub default_capacity: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            default_capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Handle to one issued byte range.
///
/// Resolved back into bytes with [`Arena::bytes`] and
/// [`Arena::bytes_mut`]. The range starts at the aligned address; padding
/// bytes are skipped and never handed out. Handles are invalidated by
/// [`Arena::reset`]; resolving one afterwards is a caller error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Allocation {
    /// Index of the pool the range was issued from.
    pool: usize,
    /// Byte offset of the aligned start within that pool.
    offset: usize,
    /// Requested length in bytes (padding excluded).
    len: usize,
}

impl Allocation {
    /// Length of the issued range in bytes, padding excluded.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the range is empty. Never true for a range issued by
    /// [`Arena::alloc`], which rejects zero-size requests.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// The allocator: an ordered collection of pools plus a bump cursor.
///
/// # Growth
///
/// Appending a pool may relocate the pool *list*, never a pool's buffer:
/// buffers sit behind their own allocations (or caller-supplied slices),
/// so every previously issued range stays where it is.
///
/// # Thread safety
///
/// Not thread-safe by design; there is no internal synchronization.
/// Callers sharing one arena across threads must impose external mutual
/// exclusion around every operation, introspection included.
///
/// # Teardown
///
/// Dropping the arena releases the buffer of every pool that owns one.
/// Caller-supplied buffers are merely borrowed for the arena's lifetime
/// and are handed back untouched.
pub struct Arena<'buf> {
    /// Append-only, creation order; never reordered or shrunk.
    pools: Vec<Pool<'buf>>,
    /// Index of the pool new allocations bump into.
    current: usize,
    /// Padded size of the most recent allocation in the current pool;
    /// 0 when none has happened since the last reset, growth, or
    /// deletion-resize.
    last_alloc_size: usize,
    config: ArenaConfig,
}

impl<'buf> Arena<'buf> {
    /// Creates an arena with one owned pool of `capacity` bytes.
    ///
    /// A `capacity` of 0 substitutes the default from [`ArenaConfig`].
    ///
    /// # Errors
    ///
    /// [`ArenaError::ResourceExhaustion`] if the system allocator cannot
    /// supply the buffer or the pool collection; nothing is left live.
    pub fn with_capacity(capacity: usize) -> Result<Self, ArenaError> {
        Self::with_capacity_and_config(capacity, ArenaConfig::default())
    }

    /// Creates an arena with one owned pool, using an explicit config.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Arena::with_capacity`].
    pub fn with_capacity_and_config(
        capacity: usize,
        config: ArenaConfig,
    ) -> Result<Self, ArenaError> {
        let capacity = if capacity == 0 {
            config.default_capacity
        } else {
            capacity
        };
        let pool = Pool::owned(capacity)?;

        debug!(capacity, owned = true, "arena created");
        Self::from_first_pool(pool, config)
    }

    /// Creates an arena whose single pool wraps a caller-supplied buffer.
    ///
    /// The buffer's length is the pool capacity; it is never released by
    /// the arena.
    ///
    /// # Errors
    ///
    /// [`ArenaError::EmptyBuffer`] if the buffer is empty, or
    /// [`ArenaError::ResourceExhaustion`] if the pool collection cannot
    /// be allocated.
    pub fn with_buffer(buf: &'buf mut [u8]) -> Result<Self, ArenaError> {
        Self::with_buffer_and_config(buf, ArenaConfig::default())
    }

    /// Creates an arena around a caller-supplied buffer with an explicit
    /// config.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Arena::with_buffer`].
    pub fn with_buffer_and_config(
        buf: &'buf mut [u8],
        config: ArenaConfig,
    ) -> Result<Self, ArenaError> {
        let pool = Pool::borrowed(buf)?;

        debug!(capacity = pool.capacity(), owned = false, "arena created");
        Self::from_first_pool(pool, config)
    }

    fn from_first_pool(pool: Pool<'buf>, config: ArenaConfig) -> Result<Self, ArenaError> {
        let mut pools = Vec::new();
        pools
            .try_reserve(1)
            .map_err(|_| ArenaError::ResourceExhaustion)?;
        pools.push(pool);

        Ok(Self {
            pools,
            current: 0,
            last_alloc_size: 0,
            config,
        })
    }

    /// Allocates `size` bytes aligned to `alignment` from the current
    /// pool.
    ///
    /// The aligned range starts past any padding; padding bytes are
    /// consumed but never handed out. On success the padded size is
    /// recorded for [`Arena::resize_last`].
    ///
    /// # Errors
    ///
    /// - [`ArenaError::ZeroSize`] if `size` is 0.
    /// - [`ArenaError::BadAlignment`] if `alignment` is 0 or not a power
    ///   of two.
    /// - [`ArenaError::SizeNotMultipleOfAlignment`] if `size` is not an
    ///   exact multiple of `alignment`.
    /// - [`ArenaError::Overflow`] if the padding or padded-size
    ///   arithmetic would exceed `usize::MAX`.
    /// - [`ArenaError::ExhaustedCapacity`] if the padded size exceeds the
    ///   current pool's remaining bytes. The arena does not fall back to
    ///   another pool; growing is the caller's move.
    ///
    /// No failure mutates any pool's offset or the arena's bookkeeping.
    pub fn alloc(&mut self, alignment: usize, size: usize) -> Result<Allocation, ArenaError> {
        if size == 0 {
            return Err(ArenaError::ZeroSize);
        }
        if alignment == 0 || !alignment.is_power_of_two() {
            return Err(ArenaError::BadAlignment { alignment });
        }
        if size % alignment != 0 {
            return Err(ArenaError::SizeNotMultipleOfAlignment { size, alignment });
        }

        let index = self.current;
        let pool = &mut self.pools[index];

        // Padding is computed from the real raw address, not the offset,
        // so caller-supplied buffers of any base alignment behave.
        let raw = pool.cursor_addr();
        if raw.checked_add(alignment).is_none() {
            return Err(ArenaError::Overflow);
        }
        let padding = (alignment - raw % alignment) % alignment;
        let padded = size.checked_add(padding).ok_or(ArenaError::Overflow)?;

        if padded > pool.remaining() {
            return Err(ArenaError::ExhaustedCapacity {
                requested: padded,
                remaining: pool.remaining(),
            });
        }

        let start = pool.offset() + padding;

        #[cfg(feature = "poison")]
        {
            let pad_range = pool.offset()..start;
            pool.poison(pad_range);
        }

        pool.bump(padded);

        #[cfg(feature = "poison")]
        {
            let tail = pool.offset()..pool.capacity();
            pool.poison(tail);
        }

        self.last_alloc_size = padded;
        trace!(pool = index + 1, size, padding, "bump allocation");

        Ok(Allocation {
            pool: index,
            offset: start,
            len: size,
        })
    }

    /// Allocates `count` elements of `elem_size` bytes each.
    ///
    /// Equivalent to `alloc(alignment, count * elem_size)` except the
    /// multiplication is overflow-checked before the allocation path is
    /// entered at all.
    ///
    /// # Errors
    ///
    /// [`ArenaError::Overflow`] if `count * elem_size` overflows, plus
    /// everything [`Arena::alloc`] reports for the final size.
    pub fn alloc_array(
        &mut self,
        alignment: usize,
        count: usize,
        elem_size: usize,
    ) -> Result<Allocation, ArenaError> {
        let total = count.checked_mul(elem_size).ok_or(ArenaError::Overflow)?;
        self.alloc(alignment, total)
    }

    /// Resizes the most recent allocation in the current pool, in place.
    ///
    /// - equal size: no-op;
    /// - `new_size == 0`: deletes the allocation, rewinding the offset by
    ///   its padded size;
    /// - smaller: rewinds the offset by the difference;
    /// - larger: advances the offset by the difference.
    ///
    /// The allocation's address never moves. This models exactly one
    /// "most recent" allocation, not a free list: calling it after any
    /// other allocation, or after a reset, resizes the wrong thing and is
    /// a caller error the arena cannot detect.
    ///
    /// # Errors
    ///
    /// [`ArenaError::ExhaustedCapacity`] if an expansion needs more bytes
    /// than the current pool has left; the arena is left unmutated.
    pub fn resize_last(&mut self, new_size: usize) -> Result<(), ArenaError> {
        let last = self.last_alloc_size;
        if new_size == last {
            return Ok(());
        }

        let pool = &mut self.pools[self.current];
        if new_size < last {
            pool.rewind(last - new_size);

            #[cfg(feature = "poison")]
            {
                let tail = pool.offset()..pool.capacity();
                pool.poison(tail);
            }
        } else {
            let extra = new_size - last;
            if extra > pool.remaining() {
                return Err(ArenaError::ExhaustedCapacity {
                    requested: extra,
                    remaining: pool.remaining(),
                });
            }
            pool.bump(extra);
        }

        self.last_alloc_size = new_size;
        Ok(())
    }

    /// Attaches a new owned pool of `capacity` bytes and makes it the
    /// current one.
    ///
    /// A `capacity` of 0 substitutes the default from [`ArenaConfig`].
    /// The pool list may relocate its own storage while growing; no pool
    /// buffer, and therefore no issued range, ever moves.
    ///
    /// # Errors
    ///
    /// [`ArenaError::ResourceExhaustion`] if the buffer or the pool-list
    /// growth cannot be satisfied; the arena is left unmutated.
    pub fn grow(&mut self, capacity: usize) -> Result<(), ArenaError> {
        let capacity = if capacity == 0 {
            self.config.default_capacity
        } else {
            capacity
        };
        let pool = Pool::owned(capacity)?;
        self.attach(pool)
    }

    /// Attaches a new pool wrapping a caller-supplied buffer and makes it
    /// the current one.
    ///
    /// # Errors
    ///
    /// [`ArenaError::EmptyBuffer`] for an empty buffer, or
    /// [`ArenaError::ResourceExhaustion`] if the pool-list growth cannot
    /// be satisfied; the arena is left unmutated.
    pub fn grow_with_buffer(&mut self, buf: &'buf mut [u8]) -> Result<(), ArenaError> {
        let pool = Pool::borrowed(buf)?;
        self.attach(pool)
    }

    fn attach(&mut self, pool: Pool<'buf>) -> Result<(), ArenaError> {
        self.pools
            .try_reserve(1)
            .map_err(|_| ArenaError::ResourceExhaustion)?;
        self.pools.push(pool);
        self.current = self.pools.len() - 1;
        self.last_alloc_size = 0;

        debug!(
            pools = self.pools.len(),
            capacity = self.pools[self.current].capacity(),
            "arena grown"
        );
        Ok(())
    }

    /// Rewinds every pool's offset to zero and the cursor to the first
    /// pool. No buffer is released and the pool count is unchanged.
    ///
    /// Ranges issued before the reset become logically invalid; their
    /// bytes are only overwritten by future allocations (or the optional
    /// poison sentinel).
    pub fn reset(&mut self) {
        for pool in &mut self.pools {
            pool.reset();
        }
        self.current = 0;
        self.last_alloc_size = 0;

        trace!(pools = self.pools.len(), "arena reset");
    }

    /// Bytes left in the current pool only.
    #[inline]
    #[must_use]
    pub fn remaining_capacity(&self) -> usize {
        self.pools[self.current].remaining()
    }

    /// Total bytes reserved across all pools.
    ///
    /// Reserved, not in-use: pools are never shrunk, so this only grows.
    #[must_use]
    pub fn allocated_bytes(&self) -> usize {
        self.pools.iter().map(Pool::capacity).sum()
    }

    /// [`Arena::allocated_bytes`] plus the arena's own bookkeeping: the
    /// fixed header and the pool list's reserved storage.
    #[must_use]
    pub fn allocated_bytes_including_metadata(&self) -> usize {
        self.allocated_bytes()
            + core::mem::size_of::<Self>()
            + self.pools.capacity() * core::mem::size_of::<Pool<'_>>()
    }

    /// Number of pools attached so far.
    #[inline]
    #[must_use]
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// 1-based index of the pool new allocations bump into.
    #[inline]
    #[must_use]
    pub fn current_pool(&self) -> usize {
        self.current + 1
    }

    /// Resolves an allocation handle to its bytes.
    ///
    /// A handle invalidated by [`Arena::reset`] still resolves - to
    /// whatever bytes now occupy its range. That misuse is a caller
    /// error the arena cannot detect.
    ///
    /// # Panics
    ///
    /// Panics on the slice index if the handle's range lies outside its
    /// pool, which cannot happen for a handle issued by this arena.
    #[must_use]
    pub fn bytes(&self, allocation: &Allocation) -> &[u8] {
        &self.pools[allocation.pool].bytes()[allocation.offset..allocation.offset + allocation.len]
    }

    /// Resolves an allocation handle to its bytes, mutably.
    ///
    /// # Panics
    ///
    /// Same conditions as [`Arena::bytes`].
    pub fn bytes_mut(&mut self, allocation: &Allocation) -> &mut [u8] {
        &mut self.pools[allocation.pool].bytes_mut()
            [allocation.offset..allocation.offset + allocation.len]
    }
}
