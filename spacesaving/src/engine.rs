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

//! Common insert/report surface of the sketch engines.
//!
//! [`FrequencyEstimator`] is implemented by every engine, so code that only
//! inserts and reports can be written once. [`Engine`] picks one of the two
//! strategies from a runtime [`EngineConfig`].

use crate::error::Error;
use crate::frequencies::FrequentItemsSketch;
use crate::frequencies::Weight;
use crate::heap::DEFAULT_SLOTS;
use crate::heap::HashedHeapSketch;
use crate::heap::HeapSketch;
use crate::item::Item;
use crate::item::Lane;
use crate::row::Row;

/// Insert and report operations shared by all sketch engines.
///
/// # Examples
///
/// ```
/// use spacesaving::engine::FrequencyEstimator;
/// use spacesaving::heap::HeapSketch;
///
/// fn feed<E: FrequencyEstimator<u64>>(sketch: &mut E, values: &[u64]) {
///     for &value in values {
///         sketch.insert(value);
///     }
/// }
///
/// let mut sketch = HeapSketch::<u64, 32>::new().unwrap();
/// feed(&mut sketch, &[4, 4, 8]);
/// assert_eq!(FrequencyEstimator::estimate(&sketch, &4), 2);
/// ```
pub trait FrequencyEstimator<T> {
    /// Weight type of the reported rows.
    type Weight: Copy;

    /// Counts one occurrence of `item`.
    fn insert(&mut self, item: T);

    /// Returns the estimated count of `item`, zero if it is not tracked.
    fn estimate(&self, item: &T) -> Self::Weight;

    /// Reports every tracked item, in no particular order.
    fn report(&self) -> Vec<Row<T, Self::Weight>>;
}

impl<T: Item + Clone, W: Weight> FrequencyEstimator<T> for FrequentItemsSketch<T, W> {
    type Weight = W;

    fn insert(&mut self, item: T) {
        FrequentItemsSketch::insert(self, item)
    }

    fn estimate(&self, item: &T) -> W {
        FrequentItemsSketch::estimate(self, item)
    }

    fn report(&self) -> Vec<Row<T, W>> {
        FrequentItemsSketch::report(self)
    }
}

impl<T: Lane, const K: usize> FrequencyEstimator<T> for HeapSketch<T, K> {
    type Weight = u64;

    fn insert(&mut self, item: T) {
        HeapSketch::insert(self, item)
    }

    fn estimate(&self, item: &T) -> u64 {
        HeapSketch::estimate(self, item)
    }

    fn report(&self) -> Vec<Row<T, u64>> {
        HeapSketch::report(self)
    }
}

impl<T: Item + Clone, const K: usize> FrequencyEstimator<T> for HashedHeapSketch<T, K> {
    type Weight = u64;

    fn insert(&mut self, item: T) {
        HashedHeapSketch::insert(self, item)
    }

    fn estimate(&self, item: &T) -> u64 {
        HashedHeapSketch::estimate(self, item)
    }

    fn report(&self) -> Vec<Row<T, u64>> {
        HashedHeapSketch::report(self)
    }
}

/// Strategy chosen when an [`Engine`] is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineConfig {
    /// Reverse purge hash table growing from `2^lg_start_map_size` to
    /// `2^lg_max_map_size` slots.
    Table {
        /// Maximum table size in log2.
        lg_max_map_size: u8,
        /// Starting table size in log2.
        lg_start_map_size: u8,
    },
    /// Fixed min-heap over the engine's slot count.
    Heap,
}

/// A sketch whose strategy is selected at construction time.
///
/// Counts are `u64`. The heap variant is the hashed heap, so any [`Item`]
/// type works with either strategy.
///
/// # Examples
///
/// ```
/// use spacesaving::engine::Engine;
/// use spacesaving::engine::EngineConfig;
/// use spacesaving::engine::FrequencyEstimator;
///
/// for config in [
///     EngineConfig::Table { lg_max_map_size: 6, lg_start_map_size: 3 },
///     EngineConfig::Heap,
/// ] {
///     let mut engine = Engine::<&str>::new(config).unwrap();
///     engine.insert("x");
///     engine.insert("x");
///     assert_eq!(engine.estimate(&"x"), 2);
/// }
/// ```
#[derive(Debug, Clone)]
pub enum Engine<T, const K: usize = DEFAULT_SLOTS> {
    /// Reverse purge hash table engine.
    Table(FrequentItemsSketch<T, u64>),
    /// Fixed min-heap engine.
    Heap(Box<HashedHeapSketch<T, K>>),
}

impl<T: Item, const K: usize> Engine<T, K> {
    /// Builds the engine described by `config`.
    ///
    /// # Errors
    ///
    /// Returns the configuration error of the selected sketch.
    pub fn new(config: EngineConfig) -> Result<Self, Error> {
        match config {
            EngineConfig::Table {
                lg_max_map_size,
                lg_start_map_size,
            } => FrequentItemsSketch::builder()
                .lg_max_map_size(lg_max_map_size)
                .lg_start_map_size(lg_start_map_size)
                .build()
                .map(Engine::Table),
            EngineConfig::Heap => HashedHeapSketch::new().map(|sketch| Engine::Heap(Box::new(sketch))),
        }
    }
}

impl<T: Item + Clone, const K: usize> FrequencyEstimator<T> for Engine<T, K> {
    type Weight = u64;

    fn insert(&mut self, item: T) {
        match self {
            Engine::Table(sketch) => sketch.insert(item),
            Engine::Heap(sketch) => sketch.insert(item),
        }
    }

    fn estimate(&self, item: &T) -> u64 {
        match self {
            Engine::Table(sketch) => sketch.estimate(item),
            Engine::Heap(sketch) => sketch.estimate(item),
        }
    }

    fn report(&self) -> Vec<Row<T, u64>> {
        match self {
            Engine::Table(sketch) => sketch.report(),
            Engine::Heap(sketch) => sketch.report(),
        }
    }
}
