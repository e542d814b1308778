//! [ProbeMap] is an open-addressed hash map using linear probing and tombstones.
use crate::{
    error::MapError,
    slot::{empty_slots, Slot},
    util::impl_slot_iterator,
};
use core::hash::Hash;
use std::{
    borrow::Borrow,
    hash::{BuildHasher, BuildHasherDefault},
};
use zwohash::ZwoHasher;

/// Capacity used by [`ProbeMap::new`].
pub const DEFAULT_CAPACITY: usize = 8;

/// A [`put`](ProbeMap::put) grows the map first if the load factor after inserting would reach
/// this value.
pub const GROWTH_THRESHOLD: f64 = 0.7;

/// The [`BuildHasher`] used when none is specified.
pub type DefaultBuildHasher = BuildHasherDefault<ZwoHasher>;

/// A hash map storing its entries directly in a slot array, resolving collisions by linear
/// probing.
///
/// Removing an entry leaves a tombstone in its slot. Tombstones are skipped by lookups and never
/// reused for new entries; they are only dropped when the map grows. The map grows by doubling its
/// capacity, either when the load factor after an insertion would reach [`GROWTH_THRESHOLD`] or
/// when tombstones leave no empty slot on an insertion's probe sequence.
///
/// Keys are passed as anything convertible into an [`Option`], with `None` standing for an absent
/// key that is rejected with [`MapError::InvalidKey`]. Unlike most map APIs, [`put`](Self::put)
/// never replaces an existing entry.
#[derive(Clone)]
pub struct ProbeMap<K, V, S = DefaultBuildHasher> {
    slots: Box<[Slot<K, V>]>,
    len: usize,
    tombstones: usize,
    build_hasher: S,
}

/// Outcome of walking a probe sequence looking for a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Probe {
    /// The key is stored at this index.
    Found(usize),
    /// An empty slot ended the probe.
    Vacant,
    /// Every slot was visited without finding the key or an empty slot.
    Exhausted,
}

#[inline(always)]
fn probe_sequence(start: usize, capacity: usize) -> impl Iterator<Item = usize> {
    (0..capacity).map(move |step| (start + step) % capacity)
}

impl<K, V> ProbeMap<K, V> {
    /// Returns an empty map with [`DEFAULT_CAPACITY`] slots.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
    /// Returns an empty map with `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, Default::default())
    }
}

impl<K, V, S: Default> Default for ProbeMap<K, V, S> {
    fn default() -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, S::default())
    }
}

impl<K, V, S> ProbeMap<K, V, S> {
    /// Returns an empty map with [`DEFAULT_CAPACITY`] slots and the provided BuildHasher.
    pub fn with_hasher(build_hasher: S) -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, build_hasher)
    }
    /// Returns an empty map with `capacity` slots and the provided BuildHasher.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity_and_hasher(capacity: usize, build_hasher: S) -> Self {
        assert!(capacity > 0, "a probe map needs at least one slot");
        ProbeMap {
            slots: empty_slots(capacity),
            len: 0,
            tombstones: 0,
            build_hasher,
        }
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug, S> std::fmt::Debug for ProbeMap<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> ProbeMap<K, V, S> {
    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.len
    }
    /// Returns `true` if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
    /// Returns the number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
    /// Returns the number of tombstones left behind by removals since the last resize or clear.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }
    /// Returns the ratio of entries to slots.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }
    /// Returns the slot array.
    pub fn slots(&self) -> &[Slot<K, V>] {
        &self.slots
    }
    /// Resets every slot to empty. The capacity is unchanged.
    pub fn clear(&mut self) {
        self.slots.fill_with(|| Slot::Empty);
        self.len = 0;
        self.tombstones = 0;
    }
    /// Returns an iterator over all key-value pairs, in slot order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.slots.iter(),
            remaining: self.len,
        }
    }
    /// Returns an iterator over all keys, in slot order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.slots.iter(),
            remaining: self.len,
        }
    }
    /// Returns an iterator over all values, in slot order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values {
            inner: self.slots.iter(),
            remaining: self.len,
        }
    }
    /// Returns an iterator over all values, allowing mutation.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.slots.iter_mut(),
            remaining: self.len,
        }
    }
    /// Returns an iterator over all key-value pairs, allowing mutation of values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.slots.iter_mut(),
            remaining: self.len,
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> ProbeMap<K, V, S> {
    #[inline(always)]
    fn start_index<Q: Hash + ?Sized>(&self, key: &Q) -> usize {
        (self.build_hasher.hash_one(key) % self.slots.len() as u64) as usize
    }

    fn probe<Q>(&self, key: &Q) -> Probe
    where
        Q: Hash + Eq + ?Sized,
        K: Borrow<Q>,
    {
        for index in probe_sequence(self.start_index(key), self.slots.len()) {
            match &self.slots[index] {
                Slot::Empty => return Probe::Vacant,
                Slot::Occupied(found, _) if found.borrow() == key => return Probe::Found(index),
                Slot::Occupied(..) | Slot::Tombstone => (),
            }
        }
        Probe::Exhausted
    }

    fn first_empty(&self, key: &K) -> Option<usize> {
        probe_sequence(self.start_index(key), self.slots.len())
            .find(|&index| self.slots[index].is_empty())
    }

    fn find_index<Q>(&self, key: Option<&Q>) -> Result<usize, MapError>
    where
        Q: Hash + Eq + ?Sized,
        K: Borrow<Q>,
    {
        let key = key.ok_or(MapError::InvalidKey)?;
        match self.probe(key) {
            Probe::Found(index) => Ok(index),
            Probe::Vacant | Probe::Exhausted => Err(MapError::NotFound),
        }
    }

    /// Stores a key that is known to be absent in the first empty slot of its probe sequence.
    fn insert_unique(&mut self, key: K, value: V) {
        let index = loop {
            match self.first_empty(&key) {
                Some(index) => break index,
                None => {
                    log::trace!(
                        "no empty slot among {} ({} tombstones), growing",
                        self.capacity(),
                        self.tombstones
                    );
                    self.resize();
                }
            }
        };
        self.slots[index] = Slot::Occupied(key, value);
        self.len += 1;
    }

    /// Doubles the capacity and reinserts every entry, dropping all tombstones.
    #[inline(never)]
    #[cold]
    fn resize(&mut self) {
        let old_capacity = self.slots.len();
        let new_capacity = old_capacity
            .checked_mul(2)
            .expect("probe map capacity overflow");
        let old_slots = std::mem::replace(&mut self.slots, empty_slots(new_capacity));
        let purged = std::mem::take(&mut self.tombstones);
        let carried = std::mem::take(&mut self.len);

        for slot in old_slots.into_vec() {
            if let Slot::Occupied(key, value) = slot {
                self.insert_unique(key, value);
            }
        }
        debug_assert_eq!(self.len, carried);

        log::debug!(
            "resized probe map {old_capacity} -> {new_capacity} slots, \
             {carried} entries, {purged} tombstones purged"
        );
    }

    /// Inserts a new entry.
    ///
    /// Fails with [`MapError::DuplicateKey`] if the key is already present, leaving the existing
    /// entry unchanged, and with [`MapError::InvalidKey`] if the key is absent.
    pub fn put(&mut self, key: impl Into<Option<K>>, value: V) -> Result<(), MapError> {
        let key = key.into().ok_or(MapError::InvalidKey)?;
        if let Probe::Found(_) = self.probe(&key) {
            return Err(MapError::DuplicateKey);
        }
        if (self.len + 1) as f64 / self.capacity() as f64 >= GROWTH_THRESHOLD {
            self.resize();
        }
        self.insert_unique(key, value);
        Ok(())
    }

    /// Inserts every pair produced by `iter`, stopping at the first failing [`put`](Self::put).
    ///
    /// Pairs inserted before the failure remain in the map.
    pub fn try_extend(&mut self, iter: impl IntoIterator<Item = (K, V)>) -> Result<(), MapError> {
        for (key, value) in iter {
            self.put(key, value)?;
        }
        Ok(())
    }

    /// Returns whether an entry with the specified key exists.
    ///
    /// Fails only for an absent key.
    pub fn contains_key<'q, Q>(&self, key: impl Into<Option<&'q Q>>) -> Result<bool, MapError>
    where
        Q: Hash + Eq + ?Sized + 'q,
        K: Borrow<Q>,
    {
        match self.find_index(key.into()) {
            Ok(_) => Ok(true),
            Err(MapError::NotFound) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Returns references to the key and value of the entry with the specified key.
    pub fn get_key_value<'q, Q>(
        &self,
        key: impl Into<Option<&'q Q>>,
    ) -> Result<(&K, &V), MapError>
    where
        Q: Hash + Eq + ?Sized + 'q,
        K: Borrow<Q>,
    {
        let index = self.find_index(key.into())?;
        self.slots[index].occupied().ok_or(MapError::NotFound)
    }

    /// Returns a reference to the value corresponding to the specified key.
    pub fn get<'q, Q>(&self, key: impl Into<Option<&'q Q>>) -> Result<&V, MapError>
    where
        Q: Hash + Eq + ?Sized + 'q,
        K: Borrow<Q>,
    {
        self.get_key_value(key).map(|x| x.1)
    }

    /// Returns a mutable reference to the value corresponding to the specified key.
    pub fn get_mut<'q, Q>(&mut self, key: impl Into<Option<&'q Q>>) -> Result<&mut V, MapError>
    where
        Q: Hash + Eq + ?Sized + 'q,
        K: Borrow<Q>,
    {
        let index = self.find_index(key.into())?;
        self.slots[index]
            .occupied_mut()
            .map(|x| x.1)
            .ok_or(MapError::NotFound)
    }

    /// Removes the entry with the specified key and returns its value.
    ///
    /// The entry's slot becomes a tombstone.
    pub fn remove<'q, Q>(&mut self, key: impl Into<Option<&'q Q>>) -> Result<V, MapError>
    where
        Q: Hash + Eq + ?Sized + 'q,
        K: Borrow<Q>,
    {
        let index = self.find_index(key.into())?;
        let (_, value) = self.slots[index].bury().ok_or(MapError::NotFound)?;
        self.len -= 1;
        self.tombstones += 1;
        Ok(value)
    }

    #[cfg(test)]
    pub(crate) fn check(&self) {
        assert!(!self.slots.is_empty());
        assert_eq!(
            self.len,
            self.slots.iter().filter(|slot| slot.is_occupied()).count()
        );
        assert_eq!(
            self.tombstones,
            self.slots.iter().filter(|slot| slot.is_tombstone()).count()
        );
        for (index, slot) in self.slots.iter().enumerate() {
            if let Slot::Occupied(key, _) = slot {
                assert_eq!(self.probe(key), Probe::Found(index));
            }
        }
    }
}

/// An iterator over the entries of a [`ProbeMap`].
///
/// This struct is created by the [`iter`](`ProbeMap::iter`) method on [`ProbeMap`].
pub struct Iter<'a, K, V> {
    inner: std::slice::Iter<'a, Slot<K, V>>,
    remaining: usize,
}
impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    impl_slot_iterator!(Slot::Occupied(key, value) => (key, value));
}

/// An iterator over the keys of a [`ProbeMap`].
///
/// This struct is created by the [`keys`](`ProbeMap::keys`) method on [`ProbeMap`].
pub struct Keys<'a, K, V> {
    inner: std::slice::Iter<'a, Slot<K, V>>,
    remaining: usize,
}
impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    impl_slot_iterator!(Slot::Occupied(key, _) => key);
}

/// An iterator over the values of a [`ProbeMap`].
///
/// This struct is created by the [`values`](`ProbeMap::values`) method on [`ProbeMap`].
pub struct Values<'a, K, V> {
    inner: std::slice::Iter<'a, Slot<K, V>>,
    remaining: usize,
}
impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    impl_slot_iterator!(Slot::Occupied(_, value) => value);
}

/// An iterator over the values of a [`ProbeMap`], allowing mutation.
///
/// This struct is created by the [`values_mut`](`ProbeMap::values_mut`) method on [`ProbeMap`].
pub struct ValuesMut<'a, K, V> {
    inner: std::slice::IterMut<'a, Slot<K, V>>,
    remaining: usize,
}
impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;
    impl_slot_iterator!(Slot::Occupied(_, value) => value);
}

/// An iterator over the entries of a [`ProbeMap`], allowing mutation of values.
///
/// This struct is created by the [`iter_mut`](`ProbeMap::iter_mut`) method on [`ProbeMap`].
pub struct IterMut<'a, K, V> {
    inner: std::slice::IterMut<'a, Slot<K, V>>,
    remaining: usize,
}
impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    impl_slot_iterator!(Slot::Occupied(key, value) => (&*key, value));
}

/// An iterator moving entries out of a [`ProbeMap`].
///
/// This struct is created by the `into_iter` method on [`ProbeMap`].
pub struct IntoIter<K, V> {
    inner: std::vec::IntoIter<Slot<K, V>>,
    remaining: usize,
}
impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);
    impl_slot_iterator!(Slot::Occupied(key, value) => (key, value));
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}
impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V, S> IntoIterator for ProbeMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.slots.into_vec().into_iter(),
            remaining: self.len,
        }
    }
}
impl<'a, K, V, S> IntoIterator for &'a ProbeMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
impl<'a, K, V, S> IntoIterator for &'a mut ProbeMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
