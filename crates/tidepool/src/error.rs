//! # Arena Error Types
//!
//! All errors that can occur while constructing, growing, or allocating
//! from an arena.

use thiserror::Error;

/// Errors produced by arena construction, allocation, resize, and growth.
///
/// Every failure is local and non-destructive: no offset, cursor, or pool
/// bookkeeping is mutated on an error path. Retrying (for example growing
/// the arena and re-attempting an allocation) is the caller's decision.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaError {
    /// An allocation of zero bytes was requested.
    #[error("zero-size allocation request")]
    ZeroSize,

    /// The alignment is zero or not a power of two.
    #[error("invalid alignment {alignment}: must be a nonzero power of two")]
    BadAlignment {
        /// The rejected alignment value.
        alignment: usize,
    },

    /// The requested size is not an exact multiple of the alignment.
    #[error("size {size} is not a multiple of alignment {alignment}")]
    SizeNotMultipleOfAlignment {
        /// The requested size in bytes.
        size: usize,
        /// The requested alignment in bytes.
        alignment: usize,
    },

    /// A caller-supplied backing buffer was empty, so its true capacity
    /// is unusable.
    #[error("caller-supplied buffer is empty")]
    EmptyBuffer,

    /// Alignment padding or size arithmetic would exceed `usize::MAX`.
    #[error("allocation size arithmetic overflowed")]
    Overflow,

    /// The padded request exceeds the current pool's remaining bytes.
    ///
    /// The arena never grows implicitly; attach a new pool and retry.
    #[error("pool exhausted: requested {requested} bytes with {remaining} remaining")]
    ExhaustedCapacity {
        /// Bytes needed to satisfy the request, padding included.
        requested: usize,
        /// Bytes left in the current pool.
        remaining: usize,
    },

    /// The system allocator could not supply backing memory for a pool,
    /// or for the arena's own pool collection.
    #[error("system allocator failed to supply backing memory")]
    ResourceExhaustion,
}
