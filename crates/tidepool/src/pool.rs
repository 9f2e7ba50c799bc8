//! # Pool
//!
//! One contiguous backing buffer with a bump offset - the unit of arena growth.

use crate::error::ArenaError;

/// Word type backing owned pool buffers.
///
/// `u128` words give the buffer base the same alignment guarantee a
/// `calloc`-style system allocation carries (16 bytes), so a fresh pool
/// needs no padding for any primitive alignment.
type Word = u128;

const WORD_BYTES: usize = core::mem::size_of::<Word>();

/// Sentinel written over padding bytes and freed regions when the
/// `poison` feature is enabled.
#[cfg(feature = "poison")]
pub(crate) const POISON_BYTE: u8 = 0xA5;

/// Backing storage for a pool.
///
/// The variant tag doubles as the ownership flag: only `Owned` buffers
/// were obtained from the system allocator on the pool's behalf, and only
/// those are released when the pool drops. `Borrowed` buffers belong to
/// the caller for the arena's whole lifetime.
enum PoolStorage<'buf> {
    /// Zero-initialized, max-align backed buffer released on drop.
    Owned(Box<[Word]>),
    /// Caller-supplied buffer; never released by the allocator.
    Borrowed(&'buf mut [u8]),
}

/// One contiguous backing buffer plus a bump offset into it.
///
/// Invariant: `0 <= offset <= capacity`, with `capacity` fixed at
/// creation. The offset is mutated only by allocation, in-place resize,
/// and reset.
pub(crate) struct Pool<'buf> {
    storage: PoolStorage<'buf>,
    /// Total byte capacity of the buffer.
    capacity: usize,
    /// Bytes already bumped out of the buffer.
    offset: usize,
}

impl<'buf> Pool<'buf> {
    /// Creates a pool backed by a buffer obtained from the system
    /// allocator.
    ///
    /// Allocation failure is reported as [`ArenaError::ResourceExhaustion`]
    /// instead of aborting, leaving nothing live.
    pub(crate) fn owned(capacity: usize) -> Result<Self, ArenaError> {
        let words = capacity.div_ceil(WORD_BYTES);
        let mut buf: Vec<Word> = Vec::new();
        buf.try_reserve_exact(words)
            .map_err(|_| ArenaError::ResourceExhaustion)?;
        buf.resize(words, 0);

        Ok(Self {
            storage: PoolStorage::Owned(buf.into_boxed_slice()),
            capacity,
            offset: 0,
        })
    }

    /// Creates a pool wrapping a caller-supplied buffer.
    ///
    /// The buffer's length is its capacity; an empty buffer is rejected
    /// because a zero-capacity pool can never satisfy a request.
    pub(crate) fn borrowed(buf: &'buf mut [u8]) -> Result<Self, ArenaError> {
        if buf.is_empty() {
            return Err(ArenaError::EmptyBuffer);
        }

        let capacity = buf.len();
        Ok(Self {
            storage: PoolStorage::Borrowed(buf),
            capacity,
            offset: 0,
        })
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes left between the bump offset and the end of the buffer.
    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.capacity - self.offset
    }

    #[cfg(test)]
    pub(crate) fn owns_buffer(&self) -> bool {
        matches!(self.storage, PoolStorage::Owned(_))
    }

    /// The whole buffer as bytes.
    pub(crate) fn bytes(&self) -> &[u8] {
        match &self.storage {
            PoolStorage::Owned(words) => &bytemuck::cast_slice(&words[..])[..self.capacity],
            PoolStorage::Borrowed(buf) => &buf[..],
        }
    }

    /// The whole buffer as mutable bytes.
    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        match &mut self.storage {
            PoolStorage::Owned(words) => &mut bytemuck::cast_slice_mut(&mut words[..])[..self.capacity],
            PoolStorage::Borrowed(buf) => &mut buf[..],
        }
    }

    /// Address of the first byte past the bumped region.
    #[inline]
    pub(crate) fn cursor_addr(&self) -> usize {
        self.bytes().as_ptr() as usize + self.offset
    }

    /// Advances the bump offset. Caller has already checked capacity.
    #[inline]
    pub(crate) fn bump(&mut self, padded_size: usize) {
        debug_assert!(padded_size <= self.remaining());
        self.offset += padded_size;
    }

    /// Rewinds the bump offset. Caller has already checked `delta <= offset`.
    #[inline]
    pub(crate) fn rewind(&mut self, delta: usize) {
        debug_assert!(delta <= self.offset);
        self.offset -= delta;
    }

    /// Rewinds the offset to zero without touching the buffer contents.
    #[inline]
    pub(crate) fn reset(&mut self) {
        self.offset = 0;
    }

    /// Fills a byte range with the sentinel.
    #[cfg(feature = "poison")]
    pub(crate) fn poison(&mut self, range: core::ops::Range<usize>) {
        for byte in &mut self.bytes_mut()[range] {
            *byte = POISON_BYTE;
        }
    }
}
