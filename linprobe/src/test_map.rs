#![allow(missing_docs)]
use crate::{MapError, ProbeMap};
use indexmap::IndexMap;
use rand::prelude::*;
use std::{fmt::Debug, hash::Hash};

/// Runs every operation on a [`ProbeMap`] and on an [`IndexMap`] reference, comparing results.
struct CheckedMap<K, V> {
    dut: ProbeMap<K, V>,
    ref_map: IndexMap<K, V>,
}

impl<K: Hash + Eq + Clone + Debug, V: Eq + Clone + Debug> CheckedMap<K, V> {
    fn with_capacity(capacity: usize) -> Self {
        CheckedMap {
            dut: ProbeMap::with_capacity(capacity),
            ref_map: IndexMap::new(),
        }
    }
    fn len(&self) -> usize {
        let len = self.ref_map.len();
        assert_eq!(len, self.dut.len());
        len
    }
    fn put(&mut self, key: K, value: V) -> Result<(), MapError> {
        let ref_result = match self.ref_map.entry(key.clone()) {
            indexmap::map::Entry::Occupied(_) => Err(MapError::DuplicateKey),
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(value.clone());
                Ok(())
            }
        };
        let old_capacity = self.dut.capacity();
        let dut_result = self.dut.put(key, value);
        assert_eq!(ref_result, dut_result);
        if dut_result.is_err() {
            assert_eq!(old_capacity, self.dut.capacity());
        }
        ref_result
    }
    fn get(&self, key: &K) -> Result<&V, MapError> {
        let ref_result = self.ref_map.get(key).ok_or(MapError::NotFound);
        let dut_result = self.dut.get(key);
        assert_eq!(ref_result, dut_result);
        ref_result
    }
    fn contains_key(&self, key: &K) -> bool {
        let ref_result = self.ref_map.contains_key(key);
        let dut_result = self.dut.contains_key(key);
        assert_eq!(Ok(ref_result), dut_result);
        ref_result
    }
    fn remove(&mut self, key: &K) -> Result<V, MapError> {
        let ref_result = self.ref_map.swap_remove(key).ok_or(MapError::NotFound);
        let old_len = self.dut.len();
        let dut_result = self.dut.remove(key);
        assert_eq!(ref_result, dut_result);
        if dut_result.is_ok() {
            assert_eq!(self.dut.len(), old_len - 1);
        }
        ref_result
    }
    fn clear(&mut self) {
        let capacity = self.dut.capacity();
        self.ref_map.clear();
        self.dut.clear();
        assert_eq!(capacity, self.dut.capacity());
    }
    fn check(&self) {
        self.dut.check();
        assert_eq!(self.len(), self.dut.iter().len());
        for (key, value) in self.dut.iter() {
            assert_eq!(self.ref_map.get(key), Some(value));
        }
    }
    /// NB: `random_likelihood` is **not** a probability. `random_likelihood == 2.0` would be 2:1 odds random:present, i.e. 2/3 probability.
    fn present_or_random_key<R: Rng + SeedableRng>(
        &self,
        random_likelihood: f64,
        rng: &mut R,
        mut rand_k: impl FnMut(&mut R) -> K,
    ) -> K {
        debug_assert!(random_likelihood >= 0.0);
        if self.ref_map.is_empty() || rng.gen_range(0.0..1.0 + random_likelihood) >= 1.0 {
            rand_k(rng)
        } else {
            self.ref_map.iter().choose(rng).unwrap().0.clone()
        }
    }
}

macro_rules! weighted_choose {
    ($rng:expr, $($name:ident: $weight:expr => $body:expr),+) => {
        {
            enum Branches { $( $name,  )* }
            let weights = [$((Branches::$name, $weight)),+];
            match weights.choose_weighted($rng, |x| x.1).unwrap().0 {
                $(Branches::$name => $body),*
            }
        }
    }
}

fn test_suite<K, V, R>(
    initial_capacity: usize,
    mut rand_k: impl FnMut(&mut R) -> K,
    mut rand_v: impl FnMut(&mut R) -> V,
) where
    K: Hash + Eq + Clone + Debug,
    V: Eq + Clone + Debug,
    R: Rng + SeedableRng,
{
    let mut map: CheckedMap<K, V> = CheckedMap::with_capacity(initial_capacity);
    let mut rng = R::seed_from_u64(39);
    let mut max_size = 0;
    let mut capacity = map.dut.capacity();
    let verbosity = 1;
    for _ in 0..5000 {
        weighted_choose! {&mut rng,
            Put: 2.0 => {
                let k = map.present_or_random_key(6.0, &mut rng, &mut rand_k);
                let v = rand_v(&mut rng);
                let result = map.put(k.clone(), v.clone());
                if verbosity > 0 {
                    println!("putting {k:?}: {v:?} -> {result:?}");
                }
            },
            Get: 0.5 => {
                let k = map.present_or_random_key(1.0, &mut rng, &mut rand_k);
                let result = map.get(&k);
                if verbosity > 0 {
                    println!("getting {k:?} -> {result:?}");
                }
            },
            ContainsKey: 0.3 => {
                let k = map.present_or_random_key(1.0, &mut rng, &mut rand_k);
                let result = map.contains_key(&k);
                if verbosity > 0 {
                    println!("contains {k:?} -> {result:?}");
                }
            },
            Remove: 1.2 => {
                let k = map.present_or_random_key(0.5, &mut rng, &mut rand_k);
                let result = map.remove(&k);
                if verbosity > 0 {
                    println!("removing {k:?} -> {result:?}");
                }
            },
            Clear: 0.002 => {
                map.clear();
                if verbosity > 0 {
                    println!("clearing");
                }
            },
            Check: 0.15 => {
                map.check();
            }
        };
        let new_capacity = map.dut.capacity();
        assert!(new_capacity == capacity || new_capacity == 2 * capacity);
        capacity = new_capacity;
        max_size = std::cmp::max(max_size, map.len());
    }
    map.check();
    println!("max size {max_size}, capacity {capacity}");
}

#[test]
fn test_suite_usize_usize() {
    test_suite::<usize, usize, rand_pcg::Pcg64>(
        8,
        |rng| rng.gen::<usize>() >> rng.gen_range(0..usize::BITS),
        |rng| rng.gen(),
    );
}

#[test]
fn test_suite_small_keys() {
    // few distinct keys, so removals and re-insertions of the same keys dominate
    test_suite::<u8, u32, rand_pcg::Pcg64>(1, |rng| rng.gen_range(0..40), |rng| rng.gen());
}

#[test]
fn test_suite_boxed_usize_boxed_usize() {
    test_suite::<Box<usize>, Box<usize>, rand_pcg::Pcg64>(
        3,
        |rng| Box::new(rng.gen::<usize>() >> rng.gen_range(0..usize::BITS)),
        |rng| Box::new(rng.gen()),
    );
}

#[test]
fn test_suite_string_string() {
    test_suite::<String, String, rand_pcg::Pcg64>(
        8,
        |rng| {
            let len = rng.gen_range(1..6);
            String::from_iter((0..len).map(|_| rng.gen_range('!'..'~')))
        },
        |rng| {
            let len = rng.gen_range(8..32);
            String::from_iter((0..len).map(|_| rng.gen_range('!'..'~')))
        },
    );
}

#[test]
fn test_round_trip_across_resizes() {
    let mut rng = rand_pcg::Pcg64::seed_from_u64(10);
    let mut in_data: Vec<(u32, u64)> = (0..1000).map(|_| (rng.gen(), rng.gen())).collect();
    let mut seen = std::collections::HashSet::new();
    in_data.retain(|item| seen.insert(item.0));

    let mut map = ProbeMap::new();
    let mut capacities = vec![map.capacity()];
    for &(key, value) in in_data.iter() {
        map.put(key, value).unwrap();
        if capacities.last() != Some(&map.capacity()) {
            capacities.push(map.capacity());
        }
    }
    map.check();
    assert_eq!(map.len(), in_data.len());
    assert!(map.load_factor() < crate::GROWTH_THRESHOLD);
    for pair in capacities.windows(2) {
        assert_eq!(pair[1], 2 * pair[0]);
    }

    in_data.shuffle(&mut rng);
    for &(key, value) in in_data.iter() {
        assert_eq!(map.get(&key), Ok(&value));
    }
}
