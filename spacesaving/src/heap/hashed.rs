// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::error::Error;
use crate::hash::DEFAULT_SEED;
use crate::hash::roll_down;
use crate::heap::DEFAULT_SLOTS;
use crate::heap::search;
use crate::heap::search::SEARCH_GROUP;
use crate::item::Item;
use crate::row::Row;

/// Space-saving sketch over `K` slots for items of any [`Item`] type.
///
/// Works like [`HeapSketch`](crate::heap::HeapSketch) but scans 64-bit
/// fingerprints instead of the values themselves. Every fingerprint match is
/// confirmed with [`Item::same_item`] before it counts, so fingerprint
/// collisions never merge distinct items.
///
/// `K` must cover at least one search group of [`SEARCH_GROUP`] slots.
///
/// # Examples
///
/// ```
/// use spacesaving::heap::HashedHeapSketch;
///
/// let mut sketch = HashedHeapSketch::<String, 64>::new().unwrap();
/// for word in "to be or not to be".split(' ') {
///     sketch.insert(word.to_string());
/// }
/// assert_eq!(sketch.estimate(&"be".to_string()), 2);
/// assert_eq!(sketch.num_tracked(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct HashedHeapSketch<T, const K: usize = DEFAULT_SLOTS> {
    seed: u64,
    hashes: [u64; K],
    weights: [u64; K],
    values: [Option<T>; K],
}

impl<T: Item, const K: usize> HashedHeapSketch<T, K> {
    /// Creates an empty sketch hashing with [`DEFAULT_SEED`].
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid)
    /// if `K` is smaller than [`SEARCH_GROUP`].
    pub fn new() -> Result<Self, Error> {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Creates an empty sketch hashing with `seed`.
    pub fn with_seed(seed: u64) -> Result<Self, Error> {
        if K < SEARCH_GROUP {
            return Err(Error::config_invalid(format!(
                "slot count must be at least {SEARCH_GROUP}"
            ))
            .with_context("slots", K));
        }
        Ok(Self {
            seed,
            hashes: std::array::from_fn(|slot| slot as u64),
            weights: [0; K],
            values: std::array::from_fn(|_| None),
        })
    }

    /// Counts one occurrence of `value`.
    pub fn insert(&mut self, value: T) {
        let value = value.normalized();
        let hash = roll_down(value.hash128(self.seed));
        self.insert_hashed(value, hash);
    }

    /// Counts one occurrence of `value` whose 128-bit hash under this
    /// sketch's seed was computed by the caller.
    pub fn insert_prehashed(&mut self, value: T, hash: (u64, u64)) {
        self.insert_hashed(value.normalized(), roll_down(hash));
    }

    fn insert_hashed(&mut self, value: T, hash: u64) {
        let index = self.find(&value, hash).unwrap_or(0);
        self.hashes[index] = hash;
        self.weights[index] += 1;
        self.values[index] = Some(value);
        self.sift_down(index);
    }

    /// Returns the weight of `value`, zero if it is not tracked.
    pub fn estimate(&self, value: &T) -> u64 {
        let hash = roll_down(value.hash128(self.seed));
        self.find(value, hash)
            .map(|index| self.weights[index])
            .unwrap_or(0)
    }

    /// Reports every tracked item in heap order.
    ///
    /// Estimate and both bounds are the slot weight.
    pub fn report(&self) -> Vec<Row<T, u64>>
    where
        T: Clone,
    {
        self.values
            .iter()
            .zip(self.weights.iter())
            .filter_map(|(value, &weight)| {
                let value = value.as_ref()?;
                Some(Row::new(value.clone(), weight, weight, weight))
            })
            .collect()
    }

    /// Returns the number of slots.
    pub fn capacity(&self) -> usize {
        K
    }

    /// Returns the number of slots holding an inserted item.
    pub fn num_tracked(&self) -> usize {
        self.values.iter().filter(|value| value.is_some()).count()
    }

    /// Returns the weight of the next eviction victim.
    pub fn min_weight(&self) -> u64 {
        self.weights[0]
    }

    /// Returns the number of inserts so far.
    pub fn total_weight(&self) -> u64 {
        self.weights.iter().sum()
    }

    fn find(&self, value: &T, hash: u64) -> Option<usize> {
        search::find_verified(&self.hashes, hash, |index| {
            self.values[index]
                .as_ref()
                .is_some_and(|stored| stored.same_item(value))
        })
    }

    fn sift_down(&mut self, index: usize) {
        let weight = self.weights[index];
        let hash = self.hashes[index];
        let value = self.values[index].take();
        let mut parent = index;
        let mut child = 2 * parent + 1;
        while child < K {
            let right = child + 1;
            if right < K && self.weights[child] > self.weights[right] {
                child = right;
            }
            if weight <= self.weights[child] {
                break;
            }
            self.weights[parent] = self.weights[child];
            self.hashes[parent] = self.hashes[child];
            self.values[parent] = self.values[child].take();
            parent = child;
            child = 2 * parent + 1;
        }
        self.weights[parent] = weight;
        self.hashes[parent] = hash;
        self.values[parent] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_fewer_slots_than_a_group() {
        let err = HashedHeapSketch::<String, 16>::new().unwrap_err();
        assert_eq!(err.context(), &[("slots", "16".to_string())]);
        assert!(HashedHeapSketch::<String, 40>::new().is_ok());
    }

    #[test]
    fn test_partial_group_slots_are_searchable() {
        let mut sketch = HashedHeapSketch::<u128, 40>::new().unwrap();
        for value in 0..40u128 {
            sketch.insert(value << 64);
        }
        for value in 0..40u128 {
            sketch.insert(value << 64);
        }
        assert_eq!(sketch.num_tracked(), 40);
        assert!(sketch.weights.iter().all(|&w| w == 2));
    }

    #[test]
    fn test_fingerprint_collision_is_verified() {
        let mut sketch = HashedHeapSketch::<String, 32>::new().unwrap();
        let first = "first".to_string();
        let second = "second".to_string();
        let hash = first.hash128(sketch.seed);
        sketch.insert_prehashed(first.clone(), hash);
        // Same fingerprint, different item: must take its own slot.
        sketch.insert_prehashed(second.clone(), hash);
        assert_eq!(sketch.num_tracked(), 2);
        assert_eq!(sketch.estimate(&first), 1);
        let rows = sketch.report();
        assert!(rows.iter().any(|row| row.item() == &second));
    }

    #[test]
    fn test_heap_order_and_values_move_together() {
        let mut sketch = HashedHeapSketch::<String, 32>::new().unwrap();
        for i in 0..2_000u64 {
            sketch.insert(format!("key-{}", (i * 37) % 61));
            for parent in 0..32 {
                for child in [2 * parent + 1, 2 * parent + 2] {
                    if child < 32 {
                        assert!(sketch.weights[parent] <= sketch.weights[child]);
                    }
                }
            }
        }
        for (index, value) in sketch.values.iter().enumerate() {
            let value = value.as_ref().unwrap();
            assert_eq!(sketch.hashes[index], roll_down(value.hash128(sketch.seed)));
        }
    }
}
