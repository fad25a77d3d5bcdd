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

//! Bounded-memory heavy hitter sketches.
//!
//! Given an unbounded stream of items, each sketch keeps a small set of
//! candidate heavy hitters with frequency estimates bracketed by a lower and an
//! upper bound, using memory independent of the stream length.
//!
//! Two engines implement the same insert/report contract:
//!
//! * [`frequencies::FrequentItemsSketch`]: an open-addressing hash table with
//!   bounded-probe inserts, backward-shift deletion and a median purge once the
//!   table reaches its maximum size. Supports weighted updates.
//! * [`heap::HeapSketch`] and [`heap::HashedHeapSketch`]: `K` fixed slots
//!   kept as a min-heap by weight, searched with a grouped exact-match scan
//!   instead of hashing.
//!
//! [`engine::FrequencyEstimator`] is the shared interface and
//! [`engine::Engine`] selects a strategy at construction time.
//!
//! The sketches are single-writer structures: wrap them in a lock or keep one
//! per worker to use them from several threads.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod engine;
pub mod error;
pub mod frequencies;
pub mod hash;
pub mod heap;
pub mod item;
mod row;

pub use self::row::Row;
