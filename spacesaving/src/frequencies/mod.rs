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

//! Frequency sketch for finding heavy hitters in data streams.
//!
//! [`FrequentItemsSketch`] keeps item weights in an open-addressing hash map
//! that doubles up to a configured maximum size. Past that size, an insert
//! that overflows the table triggers a purge: the median of (a sample of) the
//! stored weights is subtracted from every entry, entries that drop to zero
//! or below are removed, and the median is added to the sketch's error offset.
//! For every tracked item the true count lies between the stored weight and
//! the stored weight plus the offset.
//!
//! # Usage
//!
//! ```rust
//! # use spacesaving::frequencies::ErrorType;
//! # use spacesaving::frequencies::FrequentItemsSketch;
//! let mut sketch = FrequentItemsSketch::<i64>::builder()
//!     .lg_max_map_size(6)
//!     .build()
//!     .unwrap();
//! sketch.insert_with_weight(1, 3).unwrap();
//! sketch.insert(2);
//! let rows = sketch.frequent_items(ErrorType::NoFalseNegatives);
//! assert!(rows.iter().any(|row| *row.item() == 1));
//! ```
//!
//! # Weights
//!
//! ```rust
//! # use spacesaving::error::ErrorKind;
//! # use spacesaving::frequencies::FrequentItemsSketch;
//! let mut sketch = FrequentItemsSketch::<String>::builder()
//!     .weight::<i64>()
//!     .build()
//!     .unwrap();
//! let err = sketch.insert_with_weight("a".to_string(), -1).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InvalidWeight);
//! assert!(sketch.is_empty());
//! ```

mod builder;
mod reverse_purge_hash_map;
mod sketch;
mod weight;

pub use self::builder::DEFAULT_LG_MAX_MAP_SIZE;
pub use self::builder::FrequentItemsSketchBuilder;
pub use self::builder::LG_MIN_MAP_SIZE;
pub use self::builder::MAX_LG_MAP_SIZE;
pub use self::sketch::ErrorType;
pub use self::sketch::FrequentItemsSketch;
pub use self::weight::Weight;
