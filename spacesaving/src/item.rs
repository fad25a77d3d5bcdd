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

//! Canonical item representation shared by all sketches.
//!
//! Both engines compare items by their canonical bit pattern. Values that are
//! equal but have distinct encodings (`-0.0` and `+0.0`) are collapsed before
//! they are hashed, compared or stored.

use std::hash::Hash;

use crate::hash::MurmurHash3X64128;
use crate::hash::murmur3_x64_128;

/// An item that can be tracked by a sketch.
///
/// Implementations must keep [`same_item`](Item::same_item) and
/// [`hash128`](Item::hash128) consistent: items that are the same must hash
/// identically under every seed. Types that derive `Hash` and `Eq` get an
/// implementation by opting into [`HashedItem`].
///
/// # Examples
///
/// ```
/// use spacesaving::item::Item;
///
/// assert_eq!((-0.0f64).normalized().to_bits(), 0.0f64.to_bits());
/// assert!((-0.0f32).same_item(&0.0));
/// assert_eq!(
///     "key".to_string().hash128(7),
///     "key".hash128(7),
/// );
/// ```
pub trait Item: Sized {
    /// Returns the canonical representative of this value.
    fn normalized(self) -> Self {
        self
    }

    /// Returns true if both values have the same canonical representation.
    fn same_item(&self, other: &Self) -> bool;

    /// Hashes the canonical byte form of this value with a 64-bit seed.
    fn hash128(&self, seed: u64) -> (u64, u64);
}

/// Marker for `Hash + Eq` types that are tracked through their `Hash`
/// implementation.
///
/// Hashing feeds [`Hash::hash`] into a seeded [`MurmurHash3X64128`] and
/// equality is `==`, so the type's `Hash` and `Eq` must agree.
///
/// # Examples
///
/// ```
/// use spacesaving::frequencies::FrequentItemsSketch;
/// use spacesaving::item::HashedItem;
///
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// struct Route {
///     method: &'static str,
///     path: String,
/// }
///
/// impl HashedItem for Route {}
///
/// let mut sketch = FrequentItemsSketch::<Route>::builder().build().unwrap();
/// let home = Route { method: "GET", path: "/".to_string() };
/// sketch.insert(home.clone());
/// sketch.insert(home.clone());
/// assert_eq!(sketch.estimate(&home), 2);
/// ```
pub trait HashedItem: Hash + Eq {}

impl<T: HashedItem> Item for T {
    #[inline]
    fn same_item(&self, other: &Self) -> bool {
        self == other
    }

    fn hash128(&self, seed: u64) -> (u64, u64) {
        let mut hasher = MurmurHash3X64128::with_seed(seed);
        self.hash(&mut hasher);
        hasher.finish128()
    }
}

/// A 2, 4 or 8 byte primitive that the fixed heap can scan lane by lane.
///
/// Lanes are the canonical bit patterns of the values, so an exact lane match
/// is the same as [`Item::same_item`].
pub trait Lane: Item + Copy + std::fmt::Debug {
    /// Unsigned integer holding the canonical bits.
    type Bits: Copy + Eq + std::fmt::Debug;

    /// Number of distinct lane patterns, which bounds the number of slots
    /// that can hold distinct sentinels.
    const DISTINCT_LANES: u128;

    /// Returns the canonical bit pattern of this value.
    fn to_lane(self) -> Self::Bits;

    /// Rebuilds a value from its canonical bit pattern.
    fn from_lane(bits: Self::Bits) -> Self;

    /// Returns the placeholder pattern of an unused slot.
    ///
    /// Distinct slots get distinct patterns.
    fn sentinel(slot: usize) -> Self::Bits;
}

macro_rules! impl_integer_item {
    ($($t:ty),* $(,)?) => {
        $(
            impl Item for $t {
                #[inline]
                fn same_item(&self, other: &Self) -> bool {
                    self == other
                }

                #[inline]
                fn hash128(&self, seed: u64) -> (u64, u64) {
                    murmur3_x64_128(&self.to_le_bytes(), seed)
                }
            }
        )*
    };
}

impl_integer_item!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! impl_float_item {
    ($($t:ty => $bits:ty),* $(,)?) => {
        $(
            impl Item for $t {
                #[inline]
                fn normalized(self) -> Self {
                    if self == 0.0 { 0.0 } else { self }
                }

                #[inline]
                fn same_item(&self, other: &Self) -> bool {
                    self.normalized().to_bits() == other.normalized().to_bits()
                }

                #[inline]
                fn hash128(&self, seed: u64) -> (u64, u64) {
                    murmur3_x64_128(&self.normalized().to_bits().to_le_bytes(), seed)
                }
            }

            impl Lane for $t {
                type Bits = $bits;

                const DISTINCT_LANES: u128 = 1 << <$bits>::BITS;

                #[inline]
                fn to_lane(self) -> $bits {
                    self.normalized().to_bits()
                }

                #[inline]
                fn from_lane(bits: $bits) -> Self {
                    <$t>::from_bits(bits)
                }

                #[inline]
                fn sentinel(slot: usize) -> $bits {
                    slot as $bits
                }
            }
        )*
    };
}

impl_float_item!(f32 => u32, f64 => u64);

macro_rules! impl_integer_lane {
    ($($t:ty => $bits:ty),* $(,)?) => {
        $(
            impl Lane for $t {
                type Bits = $bits;

                const DISTINCT_LANES: u128 = 1 << <$bits>::BITS;

                #[inline]
                fn to_lane(self) -> $bits {
                    self as $bits
                }

                #[inline]
                fn from_lane(bits: $bits) -> Self {
                    bits as $t
                }

                #[inline]
                fn sentinel(slot: usize) -> $bits {
                    slot as $bits
                }
            }
        )*
    };
}

impl_integer_lane!(
    i16 => u16,
    u16 => u16,
    i32 => u32,
    u32 => u32,
    i64 => u64,
    u64 => u64,
);

impl Item for bool {
    fn same_item(&self, other: &Self) -> bool {
        self == other
    }

    fn hash128(&self, seed: u64) -> (u64, u64) {
        murmur3_x64_128(&[*self as u8], seed)
    }
}

impl Item for char {
    fn same_item(&self, other: &Self) -> bool {
        self == other
    }

    fn hash128(&self, seed: u64) -> (u64, u64) {
        murmur3_x64_128(&(*self as u32).to_le_bytes(), seed)
    }
}

impl Item for String {
    fn same_item(&self, other: &Self) -> bool {
        self == other
    }

    fn hash128(&self, seed: u64) -> (u64, u64) {
        murmur3_x64_128(self.as_bytes(), seed)
    }
}

impl Item for &str {
    fn same_item(&self, other: &Self) -> bool {
        self == other
    }

    fn hash128(&self, seed: u64) -> (u64, u64) {
        murmur3_x64_128(self.as_bytes(), seed)
    }
}

impl Item for Vec<u8> {
    fn same_item(&self, other: &Self) -> bool {
        self == other
    }

    fn hash128(&self, seed: u64) -> (u64, u64) {
        murmur3_x64_128(self, seed)
    }
}
