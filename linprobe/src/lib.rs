//! [ProbeMap] is a hash map that stores its entries directly in a slot array and resolves
//! collisions by linear probing.
//!
//! Each slot is [empty](Slot::Empty), a [tombstone](Slot::Tombstone) left behind by a removal, or
//! [occupied](Slot::Occupied) by an entry. A lookup starts at `hash(key) mod capacity` and walks
//! forward, wrapping around, until it finds the key or reaches an empty slot. Tombstones keep these
//! walks intact after removals. They are never reused by insertions and only disappear when the map
//! grows, which happens by doubling the capacity and reinserting every entry.
//!
//! All fallible operations return a [`MapError`]. In particular [`ProbeMap::put`] only inserts new
//! keys and reports [`MapError::DuplicateKey`] instead of replacing an existing value.
//!
//! Growth is logged through the [`log`] facade at `debug` level.
#![deny(unsafe_code)]

mod util;

pub mod error;
pub mod probe_map;
pub mod slot;

pub use error::MapError;
pub use probe_map::{DefaultBuildHasher, ProbeMap, DEFAULT_CAPACITY, GROWTH_THRESHOLD};
pub use slot::Slot;

#[cfg(test)]
mod test_map;
