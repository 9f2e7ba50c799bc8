//! Property tests for the allocator's alignment and overflow contracts.

use proptest::prelude::*;
use tidepool::{Arena, ArenaError};

proptest! {
    /// Every successful allocation with a power-of-two alignment and a
    /// size that is a multiple of it lands on an aligned address.
    #[test]
    fn aligned_requests_yield_aligned_addresses(
        align_exp in 0u32..8,
        multiplier in 1usize..=8,
    ) {
        let alignment = 1usize << align_exp;
        let size = alignment * multiplier;

        let mut arena = Arena::with_capacity(64 * 1024).expect("arena");
        let a = arena.alloc(alignment, size).expect("fits comfortably");

        prop_assert_eq!(arena.bytes(&a).as_ptr() as usize % alignment, 0);
        prop_assert_eq!(a.len(), size);
    }

    /// `alloc_array` rejects any `count * elem_size` that overflows,
    /// before touching the allocation path.
    #[test]
    fn array_multiplication_overflow_is_caught(count in 2usize..1024) {
        // Smallest elem_size whose product with `count` must overflow.
        let elem_size = usize::MAX / count + 1;

        let mut arena = Arena::with_capacity(128).expect("arena");
        let before = arena.remaining_capacity();

        prop_assert_eq!(
            arena.alloc_array(1, count, elem_size),
            Err(ArenaError::Overflow)
        );
        prop_assert_eq!(arena.remaining_capacity(), before);
    }

    /// With alignment 1 (no padding), remaining capacity walks down by
    /// exactly each allocation's size, and a failing request changes
    /// nothing.
    #[test]
    fn remaining_capacity_staircase(sizes in prop::collection::vec(1usize..=64, 1..32)) {
        let mut arena = Arena::with_capacity(256).expect("arena");
        let mut remaining = 256usize;

        for size in sizes {
            if size <= remaining {
                arena.alloc(1, size).expect("fits");
                remaining -= size;
            } else {
                prop_assert_eq!(
                    arena.alloc(1, size),
                    Err(ArenaError::ExhaustedCapacity {
                        requested: size,
                        remaining,
                    })
                );
            }
            prop_assert_eq!(arena.remaining_capacity(), remaining);
        }
    }

    /// Deleting the most recent allocation restores the capacity it
    /// consumed, for any size with alignment 1.
    #[test]
    fn delete_resize_restores_capacity(size in 1usize..=256) {
        let mut arena = Arena::with_capacity(256).expect("arena");
        let before = arena.remaining_capacity();

        arena.alloc(1, size).expect("fits");
        arena.resize_last(0).expect("delete");

        prop_assert_eq!(arena.remaining_capacity(), before);
    }
}
