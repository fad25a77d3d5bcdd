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

//! Reverse purge hash map: the counter table behind the frequent items sketch.
//!
//! Open addressing with linear probing. Each occupied slot records its drift,
//! the distance from the home slot of its key plus one, so a deletion can pull
//! later members of the probe run back into the hole. Lookups stop at the
//! first empty slot, which is why a hole must never sit in front of an entry
//! that probed past it.

use crate::frequencies::weight::Weight;
use crate::hash::roll_down;
use crate::item::Item;

const LOAD_FACTOR: f64 = 0.75;
const DRIFT_LIMIT: usize = 1024;
const MAX_SAMPLE_SIZE: usize = 1024;

#[derive(Debug, Clone)]
pub(super) struct ReversePurgeHashMap<T, W> {
    lg_cur_size: u8,
    lg_max_size: u8,
    seed: u64,
    load_threshold: usize,
    keys: Vec<Option<T>>,
    values: Vec<W>,
    states: Vec<u16>,
    num_active: usize,
}

impl<T: Item, W: Weight> ReversePurgeHashMap<T, W> {
    pub fn new(lg_cur_size: u8, lg_max_size: u8, seed: u64) -> Self {
        assert!(
            lg_cur_size <= lg_max_size,
            "lg_cur_size must not exceed lg_max_size, got lg_cur_size={lg_cur_size}, lg_max_size={lg_max_size}"
        );
        let size = 1usize << lg_cur_size;
        Self {
            lg_cur_size,
            lg_max_size,
            seed,
            load_threshold: load_threshold(size),
            keys: (0..size).map(|_| None).collect(),
            values: vec![W::ZERO; size],
            states: vec![0; size],
            num_active: 0,
        }
    }

    /// Returns the weight stored for `key`, if it is tracked.
    pub fn get(&self, key: &T) -> Option<W> {
        let mask = self.mask();
        let mut probe = self.home(key);
        while self.is_active(probe) {
            if self.key_at(probe).same_item(key) {
                return Some(self.values[probe]);
            }
            probe = (probe + 1) & mask;
        }
        None
    }

    /// Adds `weight` to `key`, inserting it if it is not tracked yet.
    ///
    /// Returns the amount by which the error offset of the owning sketch grows:
    /// zero unless the insert pushed a full-size table into a purge.
    pub fn adjust_or_insert(&mut self, key: T, weight: W) -> W {
        let num_active_before = self.num_active;
        self.internal_adjust_or_insert(key.normalized(), weight);
        if self.num_active > num_active_before {
            return self.resize_or_purge_if_needed();
        }
        W::ZERO
    }

    pub fn lg_cur_size(&self) -> u8 {
        self.lg_cur_size
    }

    pub fn lg_max_size(&self) -> u8 {
        self.lg_max_size
    }

    /// Maximum number of active entries before the table grows or purges.
    pub fn capacity(&self) -> usize {
        self.load_threshold
    }

    pub fn num_active(&self) -> usize {
        self.num_active
    }

    pub fn iter(&self) -> ReversePurgeIter<'_, T, W> {
        ReversePurgeIter::new(self)
    }

    fn internal_adjust_or_insert(&mut self, key: T, weight: W) -> usize {
        let mask = self.mask();
        let mut index = self.home(&key);
        let mut drift: usize = 1;
        while self.is_active(index) {
            if self.key_at(index).same_item(&key) {
                self.values[index] = self.values[index].saturating_add(weight);
                return index;
            }
            index = (index + 1) & mask;
            drift += 1;
            assert!(
                drift < DRIFT_LIMIT,
                "drift limit reached while inserting, drift={drift}, num_active={}, size={}",
                self.num_active,
                self.keys.len()
            );
        }
        assert!(
            self.num_active <= self.load_threshold,
            "num_active {} exceeds capacity {} before insert",
            self.num_active,
            self.load_threshold
        );
        self.keys[index] = Some(key);
        self.values[index] = weight;
        self.states[index] = drift as u16;
        self.num_active += 1;
        index
    }

    fn resize_or_purge_if_needed(&mut self) -> W {
        if self.num_active <= self.load_threshold {
            return W::ZERO;
        }
        if self.lg_cur_size < self.lg_max_size {
            self.resize(self.lg_cur_size + 1);
            return W::ZERO;
        }
        let offset = self.purge();
        assert!(
            self.num_active <= self.load_threshold,
            "purge did not reduce number of active items, num_active={}, capacity={}",
            self.num_active,
            self.load_threshold
        );
        offset
    }

    fn resize(&mut self, lg_new_size: u8) {
        let new_size = 1usize << lg_new_size;
        let old_keys = std::mem::replace(&mut self.keys, (0..new_size).map(|_| None).collect());
        let old_values = std::mem::replace(&mut self.values, vec![W::ZERO; new_size]);
        let old_states = std::mem::replace(&mut self.states, vec![0; new_size]);
        let num_active_before = self.num_active;
        self.lg_cur_size = lg_new_size;
        self.load_threshold = load_threshold(new_size);
        self.num_active = 0;
        for ((key, value), state) in old_keys.into_iter().zip(old_values).zip(old_states) {
            if state == 0 {
                continue;
            }
            if let Some(key) = key {
                self.internal_adjust_or_insert(key, value);
            }
        }
        assert_eq!(
            self.num_active, num_active_before,
            "resize changed the number of active items"
        );
    }

    /// Removes the lighter half of the table and returns the weight that was
    /// subtracted from every survivor.
    fn purge(&mut self) -> W {
        let limit = self.num_active.min(MAX_SAMPLE_SIZE);
        let mut samples: Vec<W> = (0..self.keys.len())
            .filter(|&i| self.is_active(i))
            .map(|i| self.values[i])
            .take(limit)
            .collect();
        let mid = samples.len() / 2;
        samples.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
        let median = samples[mid];
        self.subtract_and_keep_positive_only(median);
        median
    }

    fn subtract_and_keep_positive_only(&mut self, amount: W) {
        // Work from the high end of a cluster towards the front, so an entry
        // pulled back by a deletion has already been adjusted.
        let len = self.keys.len();
        let mut first_probe = len - 1;
        while self.is_active(first_probe) {
            first_probe = first_probe
                .checked_sub(1)
                .unwrap_or_else(|| panic!("table has no empty slot, size={len}"));
        }
        for probe in (0..first_probe).rev() {
            self.subtract_or_delete(probe, amount);
        }
        // The cluster that wraps around the end of the table.
        for probe in (first_probe..len).rev() {
            self.subtract_or_delete(probe, amount);
        }
    }

    #[inline]
    fn subtract_or_delete(&mut self, probe: usize, amount: W) {
        if !self.is_active(probe) {
            return;
        }
        if self.values[probe] <= amount {
            self.hash_delete(probe);
            self.num_active -= 1;
        } else {
            self.values[probe] = self.values[probe] - amount;
        }
    }

    /// Empties the slot and shifts later members of its probe run back.
    fn hash_delete(&mut self, mut delete_index: usize) {
        self.states[delete_index] = 0;
        self.keys[delete_index] = None;
        let mask = self.mask();
        let mut drift: usize = 1;
        let mut probe = (delete_index + drift) & mask;
        while self.is_active(probe) {
            if self.states[probe] as usize > drift {
                self.keys[delete_index] = self.keys[probe].take();
                self.values[delete_index] = self.values[probe];
                self.states[delete_index] = self.states[probe] - drift as u16;
                self.states[probe] = 0;
                drift = 0;
                delete_index = probe;
            }
            probe = (probe + 1) & mask;
            drift += 1;
            assert!(
                drift < DRIFT_LIMIT,
                "drift limit reached while deleting, drift={drift}"
            );
        }
    }

    #[inline]
    fn home(&self, key: &T) -> usize {
        (roll_down(key.hash128(self.seed)) as usize) & self.mask()
    }

    #[inline]
    fn mask(&self) -> usize {
        self.keys.len() - 1
    }

    #[inline]
    fn is_active(&self, index: usize) -> bool {
        self.states[index] > 0
    }

    #[inline]
    fn key_at(&self, index: usize) -> &T {
        match self.keys[index].as_ref() {
            Some(key) => key,
            None => unreachable!("active slot {index} holds no key"),
        }
    }
}

fn load_threshold(size: usize) -> usize {
    (size as f64 * LOAD_FACTOR) as usize
}

/// Visits the active entries with an odd stride, so consecutive items do not
/// come from one probe run.
pub(super) struct ReversePurgeIter<'a, T, W> {
    map: &'a ReversePurgeHashMap<T, W>,
    index: usize,
    count: usize,
    stride: usize,
    mask: usize,
}

impl<'a, T, W> ReversePurgeIter<'a, T, W> {
    fn new(map: &'a ReversePurgeHashMap<T, W>) -> Self {
        let size = map.keys.len();
        let stride = ((size as f64 * 0.6180339887498949) as usize) | 1;
        Self {
            map,
            index: 0usize.wrapping_sub(stride),
            count: 0,
            stride,
            mask: size - 1,
        }
    }
}

impl<'a, T, W: Copy> Iterator for ReversePurgeIter<'a, T, W> {
    type Item = (&'a T, W);

    fn next(&mut self) -> Option<Self::Item> {
        if self.count >= self.map.num_active {
            return None;
        }
        loop {
            self.index = self.index.wrapping_add(self.stride) & self.mask;
            if self.map.states[self.index] > 0 {
                if let Some(key) = self.map.keys[self.index].as_ref() {
                    self.count += 1;
                    return Some((key, self.map.values[self.index]));
                }
            }
        }
    }
}
