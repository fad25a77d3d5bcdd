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

//! Exact-match search over a slot array, one group of lanes at a time.
//!
//! Each group is compared against the broadcast needle as a whole and reduced
//! to a bitmask with one bit per lane. The loops are free of early exits inside
//! a group, so the compiler lowers them to wide vector compares.

/// Number of lanes compared per group.
pub const SEARCH_GROUP: usize = 32;

/// Returns a bitmask of the lanes in `group` equal to `needle`.
#[inline]
pub(super) fn match_mask<B: Copy + Eq>(group: &[B], needle: B) -> u64 {
    debug_assert!(group.len() <= 64);
    let mut mask = 0u64;
    for (lane, &value) in group.iter().enumerate() {
        mask |= ((value == needle) as u64) << lane;
    }
    mask
}

/// Returns the index of the first lane equal to `needle`.
///
/// `lanes.len()` must be a multiple of [`SEARCH_GROUP`].
#[inline]
pub(super) fn find_first<B: Copy + Eq>(lanes: &[B], needle: B) -> Option<usize> {
    debug_assert_eq!(lanes.len() % SEARCH_GROUP, 0);
    for (group_index, group) in lanes.chunks_exact(SEARCH_GROUP).enumerate() {
        let mask = match_mask(group, needle);
        if mask != 0 {
            return Some(group_index * SEARCH_GROUP + mask.trailing_zeros() as usize);
        }
    }
    None
}

/// Returns the index of the first lane equal to `needle` that `verify` accepts.
///
/// Lanes are fingerprints, so a matching lane is only a candidate. A trailing
/// partial group is scanned lane by lane.
#[inline]
pub(super) fn find_verified<B: Copy + Eq>(
    lanes: &[B],
    needle: B,
    mut verify: impl FnMut(usize) -> bool,
) -> Option<usize> {
    let mut groups = lanes.chunks_exact(SEARCH_GROUP);
    for (group_index, group) in (&mut groups).enumerate() {
        let mut mask = match_mask(group, needle);
        while mask != 0 {
            let index = group_index * SEARCH_GROUP + mask.trailing_zeros() as usize;
            if verify(index) {
                return Some(index);
            }
            mask &= mask - 1;
        }
    }
    let base = lanes.len() - groups.remainder().len();
    groups
        .remainder()
        .iter()
        .enumerate()
        .filter(|&(_, &value)| value == needle)
        .map(|(lane, _)| base + lane)
        .find(|&index| verify(index))
}
