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

use std::collections::HashMap;

use googletest::assert_that;
use googletest::prelude::contains_substring;
use googletest::prelude::eq;
use googletest::prelude::ge;
use googletest::prelude::le;
use spacesaving::error::ErrorKind;
use spacesaving::frequencies::ErrorType;
use spacesaving::frequencies::FrequentItemsSketch;

// Deterministic skewed stream: small keys are much more frequent.
fn skewed_stream(len: usize, seed: u64) -> Vec<u64> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let r = (state % 1_000) + 1;
            1_000 / r
        })
        .collect()
}

#[test]
fn purge_on_full_fixed_size_table() {
    let mut sketch = FrequentItemsSketch::<u64>::builder()
        .lg_max_map_size(3)
        .lg_start_map_size(3)
        .build()
        .unwrap();
    assert_eq!(sketch.current_map_capacity(), 6);

    for key in 1..=6 {
        sketch.insert(key);
    }
    assert_eq!(sketch.num_active_items(), 6);
    assert_eq!(sketch.maximum_error(), 0);

    sketch.insert(7);
    // All seven weights are 1, so the median is 1 and every entry goes.
    assert_that!(sketch.num_active_items(), le(5));
    assert_eq!(sketch.num_active_items(), 0);
    assert_eq!(sketch.maximum_error(), 1);
    assert_eq!(sketch.total_weight(), 7);
    assert_eq!(sketch.lg_cur_map_size(), 3);
}

#[test]
fn heavy_items_survive_repeated_purges() {
    let mut sketch = FrequentItemsSketch::<String>::builder()
        .lg_max_map_size(3)
        .lg_start_map_size(3)
        .build()
        .unwrap();
    sketch.insert_with_weight("alpha".to_string(), 20).unwrap();
    sketch.insert_with_weight("beta".to_string(), 12).unwrap();
    // Five light items per round overflow the six-entry table once each.
    for round in 0..3 {
        for i in 0..5 {
            sketch.insert(format!("filler-{round}-{i}"));
        }
        assert_eq!(sketch.num_active_items(), 2);
        assert_eq!(sketch.maximum_error(), round + 1);
    }

    assert_eq!(sketch.total_weight(), 47);
    let alpha = "alpha".to_string();
    let beta = "beta".to_string();
    assert_eq!(
        (sketch.lower_bound(&alpha), sketch.upper_bound(&alpha)),
        (17, 20)
    );
    assert_eq!((sketch.lower_bound(&beta), sketch.upper_bound(&beta)), (9, 12));
    assert_eq!(sketch.estimate(&"filler-2-4".to_string()), 0);

    let confident = sketch.frequent_items_with_threshold(ErrorType::NoFalsePositives, 10);
    assert_eq!(confident.len(), 1);
    assert_eq!(confident[0].item(), &alpha);
    let candidates = sketch.frequent_items_with_threshold(ErrorType::NoFalseNegatives, 10);
    assert_eq!(candidates.len(), 2);
}

#[test]
fn negative_weight_is_rejected_without_side_effects() {
    let mut sketch = FrequentItemsSketch::<u64>::builder()
        .weight::<i64>()
        .build()
        .unwrap();
    sketch.insert_with_weight(1, 5).unwrap();
    let before: Vec<(u64, i64)> = sketch
        .report()
        .iter()
        .map(|row| (*row.item(), row.lower_bound()))
        .collect();

    let err = sketch.insert_with_weight(2, -1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidWeight);
    assert_that!(err.message(), contains_substring("non-negative"));

    assert_eq!(sketch.total_weight(), 5);
    assert_eq!(sketch.num_active_items(), 1);
    let after: Vec<(u64, i64)> = sketch
        .report()
        .iter()
        .map(|row| (*row.item(), row.lower_bound()))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn float_weights_reject_nan_and_infinity() {
    let mut sketch = FrequentItemsSketch::<u32>::builder()
        .weight::<f64>()
        .build()
        .unwrap();
    for weight in [f64::NAN, f64::INFINITY, -0.5] {
        let err = sketch.insert_with_weight(1, weight).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidWeight);
    }
    assert!(sketch.is_empty());
    assert_eq!(sketch.total_weight(), 0.0);

    sketch.insert_with_weight(1, 0.25).unwrap();
    sketch.insert_with_weight(1, 0.5).unwrap();
    assert_eq!(sketch.estimate(&1), 0.75);
}

#[test]
fn zero_weight_is_a_no_op() {
    let mut sketch = FrequentItemsSketch::<u64>::builder().build().unwrap();
    sketch.insert_with_weight(3, 0).unwrap();
    assert!(sketch.is_empty());
    assert_eq!(sketch.total_weight(), 0);
}

#[test]
fn repeated_key_is_exact() {
    let mut sketch = FrequentItemsSketch::<&str>::builder()
        .lg_max_map_size(4)
        .build()
        .unwrap();
    for _ in 0..1_000 {
        sketch.insert("hot");
    }
    let rows = sketch.report();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].estimate(), 1_000);
    assert_eq!(rows[0].lower_bound(), 1_000);
    assert_eq!(rows[0].upper_bound(), 1_000);
}

#[test]
fn growth_without_purge_is_exact() {
    let mut sketch = FrequentItemsSketch::<u64>::builder()
        .lg_max_map_size(10)
        .lg_start_map_size(3)
        .build()
        .unwrap();
    for key in 0..700u64 {
        sketch.insert_with_weight(key, key % 7 + 1).unwrap();
    }
    assert_eq!(sketch.lg_cur_map_size(), 10);
    assert_eq!(sketch.maximum_error(), 0);
    assert_eq!(sketch.num_active_items(), 700);

    let rows = sketch.report();
    assert_eq!(rows.len(), 700);
    let total: u64 = rows.iter().map(|row| row.lower_bound()).sum();
    assert_eq!(total, sketch.total_weight());
    for row in rows {
        let expected = row.item() % 7 + 1;
        assert_eq!(row.lower_bound(), expected);
        assert_eq!(row.upper_bound(), expected);
    }
}

#[test]
fn bounds_bracket_true_counts() {
    let stream = skewed_stream(50_000, 0x2545F4914F6CDD1D);
    let mut sketch = FrequentItemsSketch::<u64>::builder()
        .lg_max_map_size(5)
        .build()
        .unwrap();
    let mut truth: HashMap<u64, u64> = HashMap::new();
    let mut last_offset = 0;
    for &key in &stream {
        sketch.insert(key);
        *truth.entry(key).or_default() += 1;

        assert_that!(sketch.maximum_error(), ge(last_offset));
        last_offset = sketch.maximum_error();
        assert_that!(sketch.num_active_items(), le(sketch.current_map_capacity()));
    }
    assert!(sketch.maximum_error() > 0);
    assert_eq!(sketch.total_weight(), stream.len() as u64);

    for (key, count) in &truth {
        assert_that!(sketch.lower_bound(key), le(*count));
        assert_that!(sketch.upper_bound(key), ge(*count));
    }
    // Key 1 carries about half the stream and survives every purge.
    assert!(sketch.lower_bound(&1) > 0);
}

#[test]
fn frequent_items_filters_by_error_type() {
    let mut sketch = FrequentItemsSketch::<u64>::builder()
        .lg_max_map_size(3)
        .lg_start_map_size(3)
        .build()
        .unwrap();
    sketch.insert_with_weight(1, 100).unwrap();
    sketch.insert_with_weight(2, 40).unwrap();
    for key in 3..=7 {
        sketch.insert(key);
    }
    let offset = sketch.maximum_error();
    assert_eq!(offset, 1);

    let threshold = 39;
    let no_fp = sketch.frequent_items_with_threshold(ErrorType::NoFalsePositives, threshold);
    let no_fn = sketch.frequent_items_with_threshold(ErrorType::NoFalseNegatives, threshold);
    assert!(no_fp.iter().all(|row| row.lower_bound() > threshold));
    assert!(no_fn.iter().all(|row| row.upper_bound() > threshold));
    assert_that!(no_fn.len(), ge(no_fp.len()));
    assert_that!(no_fn.len(), eq(2));
    assert_eq!(no_fp.len(), 1);
}

#[test]
fn float_keys_collapse_zero() {
    let mut sketch = FrequentItemsSketch::<f64>::builder().build().unwrap();
    sketch.insert(0.0);
    sketch.insert(-0.0);
    assert_eq!(sketch.num_active_items(), 1);
    assert_eq!(sketch.estimate(&-0.0), 2);
}

#[test]
fn invalid_configuration() {
    let err = FrequentItemsSketch::<u64>::builder()
        .lg_max_map_size(4)
        .lg_start_map_size(5)
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_that!(err.to_string(), contains_substring("lg_start_map_size: 5"));

    let err = FrequentItemsSketch::<u64>::builder()
        .lg_max_map_size(31)
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

    // Sizes below the minimum are raised to it.
    let sketch = FrequentItemsSketch::<u64>::builder()
        .lg_max_map_size(1)
        .lg_start_map_size(0)
        .build()
        .unwrap();
    assert_eq!(sketch.lg_max_map_size(), 3);
    assert_eq!(sketch.lg_cur_map_size(), 3);
}

#[test]
fn epsilon_and_apriori_error() {
    let sketch = FrequentItemsSketch::<u64>::builder()
        .lg_max_map_size(8)
        .build()
        .unwrap();
    assert_eq!(sketch.epsilon(), 3.5 / 256.0);
    assert_eq!(sketch.maximum_map_capacity(), 192);
    assert_eq!(
        FrequentItemsSketch::<u64>::apriori_error(8, 256_000.0),
        3_500.0
    );
}

#[test]
fn narrow_weights_saturate_instead_of_overflowing() {
    let mut sketch = FrequentItemsSketch::<u32>::builder()
        .weight::<u8>()
        .build()
        .unwrap();
    for _ in 0..300 {
        sketch.insert(1);
    }
    assert_eq!(sketch.total_weight(), u8::MAX);
    assert_eq!(sketch.estimate(&1), u8::MAX);
    assert_eq!(sketch.lower_bound(&1), u8::MAX);
    assert_eq!(sketch.upper_bound(&1), u8::MAX);
}

#[test]
fn max_weight_saturates_total() {
    let mut sketch = FrequentItemsSketch::<u64>::builder().build().unwrap();
    sketch.insert_with_weight(1, u64::MAX).unwrap();
    sketch.insert_with_weight(2, 1).unwrap();
    sketch.insert_with_weight(1, 5).unwrap();

    assert_eq!(sketch.total_weight(), u64::MAX);
    assert_eq!(sketch.estimate(&1), u64::MAX);
    assert_eq!(sketch.estimate(&2), 1);
}

#[test]
fn saturated_entry_keeps_bounds_after_purge() {
    let mut sketch = FrequentItemsSketch::<u32>::builder()
        .lg_max_map_size(3)
        .lg_start_map_size(3)
        .weight::<u8>()
        .build()
        .unwrap();
    sketch.insert_with_weight(1, 250).unwrap();
    for key in 2..=7 {
        sketch.insert(key);
    }
    assert_eq!(sketch.maximum_error(), 1);
    assert_eq!(sketch.total_weight(), u8::MAX);
    assert_eq!(sketch.lower_bound(&1), 249);

    sketch.insert_with_weight(1, 6).unwrap();
    assert_eq!(sketch.lower_bound(&1), u8::MAX);
    assert_eq!(sketch.upper_bound(&1), u8::MAX);
    let rows = sketch.report();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].estimate(), u8::MAX);
    assert_that!(rows[0].lower_bound(), le(rows[0].upper_bound()));
}
