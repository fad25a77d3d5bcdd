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

//! Fixed-capacity space-saving sketches organized as binary min-heaps.
//!
//! Both sketches keep `K` slots of values and weights. The slot arrays form a
//! min-heap by weight, so the root is always the next eviction victim. An
//! insert searches every slot for an exact match; a hit increments that slot,
//! a miss overwrites the root and increments it, so the newcomer inherits the
//! evicted weight as its error floor. Either way the touched weight only
//! grows, and a single sift-down restores the heap.
//!
//! * [`HeapSketch`] stores 2, 4 or 8 byte primitives as raw lanes and finds
//!   matches with a grouped wide compare.
//! * [`HashedHeapSketch`] stores any [`Item`](crate::item::Item) next to a
//!   64-bit fingerprint, compares fingerprints group-wise and confirms hits
//!   with a full equality check.
//!
//! These sketches keep no separate error offset: a reported weight is at once
//! the estimate and both bounds.
//!
//! # Usage
//!
//! ```rust
//! use spacesaving::heap::HeapSketch;
//!
//! let mut sketch = HeapSketch::<i64>::new().unwrap();
//! for value in [1, 2, 1, 3, 1] {
//!     sketch.insert(value);
//! }
//! let rows = sketch.report();
//! let top = rows.iter().max_by_key(|row| row.estimate()).unwrap();
//! assert_eq!(*top.item(), 1);
//! assert_eq!(top.estimate(), 3);
//! ```

mod hashed;
mod search;
mod sketch;

pub use self::hashed::HashedHeapSketch;
pub use self::search::SEARCH_GROUP;
pub use self::sketch::HeapSketch;

/// Default number of slots.
pub const DEFAULT_SLOTS: usize = 96;
