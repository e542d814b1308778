//! Error type shared by all fallible [`ProbeMap`](crate::ProbeMap) operations.
use std::fmt;

/// Error cases for operations on a [`ProbeMap`](crate::ProbeMap).
///
/// A failed operation never leaves the map partially modified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapError {
    /// The key was absent (`None`).
    InvalidKey,
    /// [`put`](crate::ProbeMap::put) was given a key that is already present.
    DuplicateKey,
    /// No entry with the given key exists.
    NotFound,
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::InvalidKey => f.write_str("absent key"),
            MapError::DuplicateKey => f.write_str("key is already present"),
            MapError::NotFound => f.write_str("no entry for key"),
        }
    }
}

impl std::error::Error for MapError {}
