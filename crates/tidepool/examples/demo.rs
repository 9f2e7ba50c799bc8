//! Print-formatted demonstration of the arena over owned and
//! caller-supplied backing buffers.
//!
//! Run with: `cargo run --package tidepool --example demo`

use tidepool::{Arena, ArenaError};

fn demonstrate(label: &str, arena: &mut Arena<'_>) -> Result<(), ArenaError> {
    println!("---- {label} ----");

    let c = arena.alloc(1, 1)?;
    let i = arena.alloc(4, 4)?;
    let d = arena.alloc(8, 8)?;

    arena.bytes_mut(&c)[0] = b'A';
    arena.bytes_mut(&i).copy_from_slice(&1i32.to_ne_bytes());
    arena.bytes_mut(&d).copy_from_slice(&20103.212f64.to_ne_bytes());

    println!("c (1-byte):  {:p}  '{}'", arena.bytes(&c).as_ptr(), arena.bytes(&c)[0] as char);
    println!("i (4-byte):  {:p}  {}", arena.bytes(&i).as_ptr(), i32::from_ne_bytes(arena.bytes(&i).try_into().unwrap()));
    println!("d (8-byte):  {:p}  {}", arena.bytes(&d).as_ptr(), f64::from_ne_bytes(arena.bytes(&d).try_into().unwrap()));
    println!(
        "pools: {}, remaining in current: {}, reserved total: {}\n",
        arena.pool_count(),
        arena.remaining_capacity(),
        arena.allocated_bytes()
    );
    Ok(())
}

fn main() -> Result<(), ArenaError> {
    let mut owned = Arena::with_capacity(100)?;
    demonstrate("library-owned pool", &mut owned)?;

    let mut heap_backing = vec![0u8; 100 * 1024];
    let mut heap_arena = Arena::with_buffer(&mut heap_backing)?;
    demonstrate("caller heap buffer", &mut heap_arena)?;

    let mut stack_backing = [0u8; 512];
    let mut stack_arena = Arena::with_buffer(&mut stack_backing)?;
    demonstrate("caller stack buffer", &mut stack_arena)?;

    // A full pool is the caller's cue to grow.
    let mut small = Arena::with_capacity(1000)?;
    assert!(small.alloc(1, 10000).is_err());
    small.grow(10000)?;
    let big = small.alloc(1, 10000)?;
    println!(
        "grew to {} pools; 10000-byte range at {:p}",
        small.pool_count(),
        small.bytes(&big).as_ptr()
    );

    Ok(())
}
