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

//! Frequent items sketch built on the reverse purge hash map.

use crate::error::Error;
use crate::frequencies::FrequentItemsSketchBuilder;
use crate::frequencies::reverse_purge_hash_map::ReversePurgeHashMap;
use crate::frequencies::weight::Weight;
use crate::item::Item;
use crate::row::Row;

const EPSILON_FACTOR: f64 = 3.5;

/// Error guarantees for frequent item queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    /// Include items if upper bound exceeds threshold (no false negatives).
    NoFalseNegatives,
    /// Include items if lower bound exceeds threshold (no false positives).
    NoFalsePositives,
}

/// Frequent items sketch for generic item and weight types.
///
/// Tracks at most `0.75 * 2^lg_max_map_size` items. Once the table is at its
/// maximum size and overflows, the lighter half of the items is purged and the
/// purged weight is added to a global error offset.
///
/// # Examples
///
/// ```
/// use spacesaving::frequencies::FrequentItemsSketch;
///
/// let mut sketch = FrequentItemsSketch::<&str>::builder()
///     .lg_max_map_size(6)
///     .build()
///     .unwrap();
/// sketch.insert("apple");
/// sketch.insert_with_weight("banana", 3).unwrap();
///
/// assert_eq!(sketch.estimate(&"banana"), 3);
/// assert_eq!(sketch.total_weight(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct FrequentItemsSketch<T, W = u64> {
    total_weight: W,
    offset: W,
    hash_map: ReversePurgeHashMap<T, W>,
}

impl<T: Item> FrequentItemsSketch<T> {
    /// Returns a builder with the default configuration and `u64` weights.
    pub fn builder() -> FrequentItemsSketchBuilder<T> {
        FrequentItemsSketchBuilder::default()
    }
}

impl<T: Item, W: Weight> FrequentItemsSketch<T, W> {
    pub(super) fn with_lg_map_sizes(lg_max_map_size: u8, lg_start_map_size: u8, seed: u64) -> Self {
        Self {
            total_weight: W::ZERO,
            offset: W::ZERO,
            hash_map: ReversePurgeHashMap::new(lg_start_map_size, lg_max_map_size, seed),
        }
    }

    /// Inserts an item with weight one.
    pub fn insert(&mut self, item: T) {
        self.apply(item, W::ONE);
    }

    /// Inserts an item with the given weight.
    ///
    /// A zero weight leaves the sketch untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidWeight`](crate::error::ErrorKind::InvalidWeight)
    /// if the weight is negative, NaN or infinite. The sketch is not modified.
    pub fn insert_with_weight(&mut self, item: T, weight: W) -> Result<(), Error> {
        weight.validate()?;
        self.apply(item, weight);
        Ok(())
    }

    fn apply(&mut self, item: T, weight: W) {
        if weight == W::ZERO {
            return;
        }
        self.total_weight = self.total_weight.saturating_add(weight);
        let delta = self.hash_map.adjust_or_insert(item, weight);
        self.offset = self.offset.saturating_add(delta);
    }

    /// Returns true if no item is tracked.
    pub fn is_empty(&self) -> bool {
        self.hash_map.num_active() == 0
    }

    /// Returns the number of active items being tracked.
    pub fn num_active_items(&self) -> usize {
        self.hash_map.num_active()
    }

    /// Returns the sum of all weights ever inserted, saturating at the
    /// largest weight.
    pub fn total_weight(&self) -> W {
        self.total_weight
    }

    /// Returns the estimated frequency for an item, zero if it is not tracked.
    pub fn estimate(&self, item: &T) -> W {
        match self.hash_map.get(item) {
            Some(weight) => weight.saturating_add(self.offset),
            None => W::ZERO,
        }
    }

    /// Returns the lower bound for an item's frequency.
    pub fn lower_bound(&self, item: &T) -> W {
        self.hash_map.get(item).unwrap_or(W::ZERO)
    }

    /// Returns the upper bound for an item's frequency.
    pub fn upper_bound(&self, item: &T) -> W {
        self.lower_bound(item).saturating_add(self.offset)
    }

    /// Returns the maximum error across all items, the cumulative purge offset.
    pub fn maximum_error(&self) -> W {
        self.offset
    }

    /// Returns epsilon for this sketch.
    pub fn epsilon(&self) -> f64 {
        Self::epsilon_for_lg(self.hash_map.lg_max_size())
    }

    /// Returns epsilon for a sketch configured with `lg_max_map_size`.
    pub fn epsilon_for_lg(lg_max_map_size: u8) -> f64 {
        EPSILON_FACTOR / (1u64 << lg_max_map_size) as f64
    }

    /// Returns the a priori error estimate for a stream of the given weight.
    pub fn apriori_error(lg_max_map_size: u8, estimated_total_weight: f64) -> f64 {
        Self::epsilon_for_lg(lg_max_map_size) * estimated_total_weight
    }

    /// Returns the maximum number of items the table can hold at full size.
    pub fn maximum_map_capacity(&self) -> usize {
        (1usize << self.hash_map.lg_max_size()) * 3 / 4
    }

    /// Returns the number of items the table can hold at its current size.
    pub fn current_map_capacity(&self) -> usize {
        self.hash_map.capacity()
    }

    /// Returns the configured maximum map size in log2.
    pub fn lg_max_map_size(&self) -> u8 {
        self.hash_map.lg_max_size()
    }

    /// Returns the current map size in log2.
    pub fn lg_cur_map_size(&self) -> u8 {
        self.hash_map.lg_cur_size()
    }

    /// Reports every tracked item with its estimate and bounds.
    ///
    /// The rows come in no particular order.
    pub fn report(&self) -> Vec<Row<T, W>>
    where
        T: Clone,
    {
        self.hash_map
            .iter()
            .map(|(item, weight)| self.row(item, weight))
            .collect()
    }

    /// Returns frequent items using the sketch maximum error as threshold.
    pub fn frequent_items(&self, error_type: ErrorType) -> Vec<Row<T, W>>
    where
        T: Clone,
    {
        self.frequent_items_with_threshold(error_type, self.offset)
    }

    /// Returns frequent items whose bound exceeds `threshold`.
    ///
    /// The threshold is never lower than the maximum error. The rows come in no
    /// particular order.
    pub fn frequent_items_with_threshold(&self, error_type: ErrorType, threshold: W) -> Vec<Row<T, W>>
    where
        T: Clone,
    {
        let threshold = if threshold < self.offset {
            self.offset
        } else {
            threshold
        };
        self.hash_map
            .iter()
            .map(|(item, weight)| self.row(item, weight))
            .filter(|row| match error_type {
                ErrorType::NoFalseNegatives => row.upper_bound() > threshold,
                ErrorType::NoFalsePositives => row.lower_bound() > threshold,
            })
            .collect()
    }

    fn row(&self, item: &T, weight: W) -> Row<T, W>
    where
        T: Clone,
    {
        let upper = weight.saturating_add(self.offset);
        Row::new(item.clone(), upper, weight, upper)
    }
}
