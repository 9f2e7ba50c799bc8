//! # tidepool
//!
//! A multi-pool bump (arena) allocator. Callers request byte ranges of a
//! given size and alignment; the arena hands out non-overlapping ranges
//! by advancing an offset into a pre-reserved pool and releases
//! everything at once on reset or drop, with no per-object bookkeeping.
//!
//! ## Ground rules
//!
//! 1. **Allocation is O(1)** - bump an offset, nothing else
//! 2. **Growth is explicit** - a full pool never silently chains a new one;
//!    the caller attaches pools with [`Arena::grow`]
//! 3. **Pool buffers never move** - growing relocates only the pool list,
//!    so every issued range stays put until reset
//!
//! ## Example
//!
//! ```
//! use tidepool::Arena;
//!
//! let mut arena = Arena::with_capacity(1024)?;
//!
//! // Ten 4-byte elements, 4-byte aligned.
//! let nums = arena.alloc_array(4, 10, 4)?;
//! arena.bytes_mut(&nums).fill(7);
//! assert_eq!(arena.bytes(&nums).len(), 40);
//!
//! // One release point for everything allocated so far.
//! arena.reset();
//! assert_eq!(arena.remaining_capacity(), 1024);
//! # Ok::<(), tidepool::ArenaError>(())
//! ```
//!
//! ## Thread safety
//!
//! Not thread-safe by design: no internal synchronization exists. Use
//! one arena per thread, or wrap the whole arena in external mutual
//! exclusion - even introspection reads mutable cursor state.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

mod arena;
mod error;
mod pool;

pub use arena::{Allocation, Arena, ArenaConfig, DEFAULT_CAPACITY};
pub use error::ArenaError;
