//! The element type of a [`ProbeMap`](crate::ProbeMap)'s slot array.

/// One position in the slot array.
///
/// A removed entry leaves a [`Slot::Tombstone`] behind instead of an [`Slot::Empty`] slot, so that
/// probe sequences passing through it keep reaching the keys stored further along.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Slot<K, V> {
    /// Never written since the last resize or clear. Terminates a probe.
    #[default]
    Empty,
    /// Previously occupied. Skipped by probes, only reclaimed by a resize.
    Tombstone,
    /// Holds an entry.
    Occupied(K, V),
}

impl<K, V> Slot<K, V> {
    /// Returns `true` for [`Slot::Empty`].
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    /// Returns `true` for [`Slot::Tombstone`].
    #[inline(always)]
    pub fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone)
    }

    /// Returns `true` for [`Slot::Occupied`].
    #[inline(always)]
    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(..))
    }

    /// Returns references to the key and value of an occupied slot.
    #[inline(always)]
    pub fn occupied(&self) -> Option<(&K, &V)> {
        match self {
            Slot::Occupied(key, value) => Some((key, value)),
            _ => None,
        }
    }

    #[inline(always)]
    pub(crate) fn occupied_mut(&mut self) -> Option<(&K, &mut V)> {
        match self {
            Slot::Occupied(key, value) => Some((key, value)),
            _ => None,
        }
    }

    /// Replaces an occupied slot with a tombstone, returning the entry it held.
    ///
    /// Other slots are left untouched.
    pub(crate) fn bury(&mut self) -> Option<(K, V)> {
        match std::mem::replace(self, Slot::Tombstone) {
            Slot::Occupied(key, value) => Some((key, value)),
            other => {
                *self = other;
                None
            }
        }
    }
}

pub(crate) fn empty_slots<K, V>(capacity: usize) -> Box<[Slot<K, V>]> {
    std::iter::repeat_with(|| Slot::Empty)
        .take(capacity)
        .collect()
}
