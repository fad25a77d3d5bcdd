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

use std::marker::PhantomData;

use crate::error::Error;
use crate::frequencies::FrequentItemsSketch;
use crate::frequencies::weight::Weight;
use crate::hash::DEFAULT_SEED;
use crate::item::Item;

/// Smallest table size in log2; smaller requests are raised to it.
pub const LG_MIN_MAP_SIZE: u8 = 3;
/// Largest table size in log2.
pub const MAX_LG_MAP_SIZE: u8 = 30;
/// Default maximum table size in log2.
pub const DEFAULT_LG_MAX_MAP_SIZE: u8 = 8;

/// Builder for creating frequent items sketches.
///
/// The table starts at `2^lg_start_map_size` slots and doubles until it
/// reaches `2^lg_max_map_size` slots; from then on overflow is handled by
/// purging.
///
/// # Examples
///
/// ```
/// use spacesaving::frequencies::FrequentItemsSketch;
///
/// let mut sketch = FrequentItemsSketch::<u32>::builder()
///     .lg_max_map_size(10)
///     .lg_start_map_size(4)
///     .seed(7)
///     .weight::<f64>()
///     .build()
///     .unwrap();
/// sketch.insert_with_weight(3, 0.5).unwrap();
/// assert_eq!(sketch.lower_bound(&3), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct FrequentItemsSketchBuilder<T, W = u64> {
    lg_max_map_size: u8,
    lg_start_map_size: u8,
    seed: u64,
    _marker: PhantomData<fn() -> (T, W)>,
}

impl<T> Default for FrequentItemsSketchBuilder<T> {
    fn default() -> Self {
        Self {
            lg_max_map_size: DEFAULT_LG_MAX_MAP_SIZE,
            lg_start_map_size: LG_MIN_MAP_SIZE,
            seed: DEFAULT_SEED,
            _marker: PhantomData,
        }
    }
}

impl<T: Item, W: Weight> FrequentItemsSketchBuilder<T, W> {
    /// Sets the maximum table size in log2.
    pub fn lg_max_map_size(mut self, lg_max_map_size: u8) -> Self {
        self.lg_max_map_size = lg_max_map_size;
        self
    }

    /// Sets the starting table size in log2.
    pub fn lg_start_map_size(mut self, lg_start_map_size: u8) -> Self {
        self.lg_start_map_size = lg_start_map_size;
        self
    }

    /// Sets the hash seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Switches the weight type of the sketch being built.
    pub fn weight<V: Weight>(self) -> FrequentItemsSketchBuilder<T, V> {
        FrequentItemsSketchBuilder {
            lg_max_map_size: self.lg_max_map_size,
            lg_start_map_size: self.lg_start_map_size,
            seed: self.seed,
            _marker: PhantomData,
        }
    }

    /// Builds the sketch.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid)
    /// if the starting size exceeds the maximum size, or if the maximum size
    /// exceeds [`MAX_LG_MAP_SIZE`].
    pub fn build(self) -> Result<FrequentItemsSketch<T, W>, Error> {
        if self.lg_start_map_size > self.lg_max_map_size {
            return Err(
                Error::config_invalid("starting size must not be greater than maximum size")
                    .with_context("lg_start_map_size", self.lg_start_map_size)
                    .with_context("lg_max_map_size", self.lg_max_map_size),
            );
        }
        if self.lg_max_map_size > MAX_LG_MAP_SIZE {
            return Err(Error::config_invalid(format!(
                "lg_max_map_size must not exceed {MAX_LG_MAP_SIZE}"
            ))
            .with_context("lg_max_map_size", self.lg_max_map_size));
        }
        let lg_max = self.lg_max_map_size.max(LG_MIN_MAP_SIZE);
        let lg_start = self.lg_start_map_size.max(LG_MIN_MAP_SIZE);
        Ok(FrequentItemsSketch::with_lg_map_sizes(
            lg_max, lg_start, self.seed,
        ))
    }
}
