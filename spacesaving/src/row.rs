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

/// Result row reported by the sketches.
///
/// The true count of [`item`](Row::item) since the sketch was created lies in
/// `[lower_bound, upper_bound]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<T, W> {
    item: T,
    estimate: W,
    lower_bound: W,
    upper_bound: W,
}

impl<T, W: Copy> Row<T, W> {
    pub(crate) fn new(item: T, estimate: W, lower_bound: W, upper_bound: W) -> Self {
        Self {
            item,
            estimate,
            lower_bound,
            upper_bound,
        }
    }

    /// Returns the item value.
    pub fn item(&self) -> &T {
        &self.item
    }

    /// Returns the estimated frequency.
    pub fn estimate(&self) -> W {
        self.estimate
    }

    /// Returns the lower bound for the frequency.
    pub fn lower_bound(&self) -> W {
        self.lower_bound
    }

    /// Returns the upper bound for the frequency.
    pub fn upper_bound(&self) -> W {
        self.upper_bound
    }

    /// Consumes the row and returns the item.
    pub fn into_item(self) -> T {
        self.item
    }
}
