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

//! Fixed-capacity heap sketch for 2, 4 and 8 byte primitives.

use crate::error::Error;
use crate::heap::DEFAULT_SLOTS;
use crate::heap::search;
use crate::heap::search::SEARCH_GROUP;
use crate::item::Lane;
use crate::row::Row;

/// Space-saving sketch over `K` slots kept as a binary min-heap.
///
/// Values are stored as their canonical lane bits and searched with the
/// grouped exact-match scan. Unused slots hold distinct sentinel patterns with
/// weight zero; a sentinel that happens to equal an inserted value is simply
/// claimed by it, which is indistinguishable from evicting a zero-weight root.
///
/// `K` must be a positive multiple of [`SEARCH_GROUP`].
///
/// # Examples
///
/// ```
/// use spacesaving::heap::HeapSketch;
///
/// let mut sketch = HeapSketch::<u32, 32>::new().unwrap();
/// for value in [7, 7, 7, 9] {
///     sketch.insert(value);
/// }
/// assert_eq!(sketch.estimate(&7), 3);
/// assert_eq!(sketch.num_tracked(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct HeapSketch<T: Lane, const K: usize = DEFAULT_SLOTS> {
    values: [T::Bits; K],
    weights: [u64; K],
}

impl<T: Lane, const K: usize> HeapSketch<T, K> {
    /// Creates an empty sketch.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid)
    /// if `K` is zero, not a multiple of [`SEARCH_GROUP`], or larger than the
    /// number of distinct values of `T`.
    pub fn new() -> Result<Self, Error> {
        if K == 0 || K % SEARCH_GROUP != 0 {
            return Err(Error::config_invalid(format!(
                "slot count must be a positive multiple of {SEARCH_GROUP}"
            ))
            .with_context("slots", K));
        }
        if K as u128 > T::DISTINCT_LANES {
            return Err(
                Error::config_invalid("slot count exceeds the number of distinct values")
                    .with_context("slots", K)
                    .with_context("distinct_values", T::DISTINCT_LANES),
            );
        }
        Ok(Self {
            values: std::array::from_fn(T::sentinel),
            weights: [0; K],
        })
    }

    /// Counts one occurrence of `value`.
    ///
    /// An untracked value replaces the root, the slot with the minimum weight,
    /// and inherits its weight plus one.
    pub fn insert(&mut self, value: T) {
        let lane = value.normalized().to_lane();
        let index = search::find_first(&self.values, lane).unwrap_or(0);
        self.values[index] = lane;
        self.weights[index] += 1;
        self.sift_down(index);
    }

    /// Returns the weight of `value`, zero if it is not tracked.
    pub fn estimate(&self, value: &T) -> u64 {
        search::find_first(&self.values, value.to_lane())
            .map(|index| self.weights[index])
            .unwrap_or(0)
    }

    /// Reports every tracked value in heap order.
    ///
    /// Estimate and both bounds are the slot weight.
    pub fn report(&self) -> Vec<Row<T, u64>> {
        self.values
            .iter()
            .zip(self.weights.iter())
            .filter(|&(_, &weight)| weight > 0)
            .map(|(&bits, &weight)| Row::new(T::from_lane(bits), weight, weight, weight))
            .collect()
    }

    /// Returns the number of slots.
    pub fn capacity(&self) -> usize {
        K
    }

    /// Returns the number of slots holding an inserted value.
    pub fn num_tracked(&self) -> usize {
        self.weights.iter().filter(|&&weight| weight > 0).count()
    }

    /// Returns the weight of the next eviction victim.
    pub fn min_weight(&self) -> u64 {
        self.weights[0]
    }

    /// Returns the number of inserts so far.
    pub fn total_weight(&self) -> u64 {
        self.weights.iter().sum()
    }

    /// Restores the heap after the weight at `index` grew.
    fn sift_down(&mut self, index: usize) {
        let weight = self.weights[index];
        let value = self.values[index];
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
            self.values[parent] = self.values[child];
            parent = child;
            child = 2 * parent + 1;
        }
        self.weights[parent] = weight;
        self.values[parent] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_min_heap<T: Lane, const K: usize>(sketch: &HeapSketch<T, K>) {
        for i in 0..K {
            for child in [2 * i + 1, 2 * i + 2] {
                if child < K {
                    assert!(
                        sketch.weights[i] <= sketch.weights[child],
                        "weights[{i}]={} > weights[{child}]={}",
                        sketch.weights[i],
                        sketch.weights[child]
                    );
                }
            }
        }
    }

    #[test]
    fn test_new_fills_distinct_sentinels() {
        let sketch = HeapSketch::<i64, 64>::new().unwrap();
        assert!(sketch.weights.iter().all(|&w| w == 0));
        assert_eq!(sketch.values[0], 0);
        assert_eq!(sketch.values[63], 63);
        assert!(sketch.report().is_empty());
    }

    #[test]
    fn test_rejects_misaligned_capacity() {
        assert!(HeapSketch::<u16, 48>::new().is_err());
        assert!(HeapSketch::<u16, 0>::new().is_err());
        assert!(HeapSketch::<u16, 32>::new().is_ok());
    }

    #[test]
    fn test_heap_order_holds_after_every_insert() {
        let mut sketch = HeapSketch::<u32, 64>::new().unwrap();
        let mut state = 17u32;
        for _ in 0..5_000 {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            sketch.insert((state >> 16) % 200);
            assert_min_heap(&sketch);
        }
        assert_eq!(sketch.total_weight(), 5_000);
    }

    #[test]
    fn test_sentinel_collision_is_claimed() {
        let mut sketch = HeapSketch::<u64, 32>::new().unwrap();
        // 5 is the sentinel pattern of slot 5.
        sketch.insert(5);
        sketch.insert(5);
        assert_eq!(sketch.estimate(&5), 2);
        assert_eq!(sketch.num_tracked(), 1);
        assert_min_heap(&sketch);
    }

    #[test]
    fn test_root_eviction_inherits_weight() {
        let mut sketch = HeapSketch::<i32, 32>::new().unwrap();
        for value in 100..132 {
            sketch.insert(value);
        }
        assert_eq!(sketch.min_weight(), 1);
        let root = i32::from_lane(sketch.values[0]);
        sketch.insert(1_000);
        assert_eq!(sketch.estimate(&root), 0);
        assert_eq!(sketch.estimate(&1_000), 2);
        assert_min_heap(&sketch);
    }

    #[test]
    fn test_four_slot_eviction() {
        // `new` rejects four slots, so build the heap by hand and scan linearly.
        fn insert(sketch: &mut HeapSketch<u32, 4>, value: u32) {
            let lane = value.to_lane();
            let index = sketch.values.iter().position(|&v| v == lane).unwrap_or(0);
            sketch.values[index] = lane;
            sketch.weights[index] += 1;
            sketch.sift_down(index);
        }
        let mut sketch = HeapSketch::<u32, 4> {
            values: std::array::from_fn(u32::sentinel),
            weights: [0; 4],
        };
        for value in [100, 101, 102, 103] {
            insert(&mut sketch, value);
        }
        let root = sketch.values[0];
        insert(&mut sketch, 104);

        let mut weights = sketch.weights;
        weights.sort_unstable();
        assert_eq!(weights, [1, 1, 1, 2]);
        assert!(!sketch.values.contains(&root));
        let heaviest = sketch.weights.iter().position(|&w| w == 2).unwrap();
        assert_eq!(sketch.values[heaviest], 104);
        assert_min_heap(&sketch);
    }

    #[test]
    fn test_float_zeroes_share_a_slot() {
        let mut sketch = HeapSketch::<f64, 32>::new().unwrap();
        sketch.insert(-0.0);
        sketch.insert(0.0);
        assert_eq!(sketch.estimate(&-0.0), 2);
        let rows = sketch.report();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item().to_bits(), 0);
    }
}
