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

//! Weight types accepted by the frequent items sketch.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;
use std::ops::Sub;

use crate::error::Error;

/// A non-negative accumulator for item weights.
///
/// Implemented for every primitive integer and for `f32`/`f64`. Signed types
/// reject negative weights, floating types additionally reject NaN and
/// infinities, unsigned types accept every value.
pub trait Weight:
    Copy + PartialOrd + fmt::Debug + fmt::Display + Add<Output = Self> + Sub<Output = Self>
{
    /// The additive identity.
    const ZERO: Self;

    /// Weight of a single unweighted update.
    const ONE: Self;

    /// Checks that this weight may be added to a sketch.
    fn validate(self) -> Result<(), Error>;

    /// Adds two weights, clamping at the largest representable weight.
    fn saturating_add(self, other: Self) -> Self;

    /// Total order used to select the purge median.
    fn total_cmp(&self, other: &Self) -> Ordering;
}

macro_rules! impl_signed_weight {
    ($($t:ty),* $(,)?) => {
        $(
            impl Weight for $t {
                const ZERO: Self = 0;
                const ONE: Self = 1;

                #[inline]
                fn validate(self) -> Result<(), Error> {
                    if self < 0 {
                        return Err(negative_weight(self));
                    }
                    Ok(())
                }

                #[inline]
                fn saturating_add(self, other: Self) -> Self {
                    <$t>::saturating_add(self, other)
                }

                #[inline]
                fn total_cmp(&self, other: &Self) -> Ordering {
                    self.cmp(other)
                }
            }
        )*
    };
}

macro_rules! impl_unsigned_weight {
    ($($t:ty),* $(,)?) => {
        $(
            impl Weight for $t {
                const ZERO: Self = 0;
                const ONE: Self = 1;

                #[inline]
                fn validate(self) -> Result<(), Error> {
                    Ok(())
                }

                #[inline]
                fn saturating_add(self, other: Self) -> Self {
                    <$t>::saturating_add(self, other)
                }

                #[inline]
                fn total_cmp(&self, other: &Self) -> Ordering {
                    self.cmp(other)
                }
            }
        )*
    };
}

macro_rules! impl_float_weight {
    ($($t:ty),* $(,)?) => {
        $(
            impl Weight for $t {
                const ZERO: Self = 0.0;
                const ONE: Self = 1.0;

                fn validate(self) -> Result<(), Error> {
                    if self < 0.0 {
                        return Err(negative_weight(self));
                    }
                    if self.is_nan() {
                        return Err(Error::invalid_weight("weight must be a valid number"));
                    }
                    if self.is_infinite() {
                        return Err(
                            Error::invalid_weight("weight must be finite").with_context("weight", self)
                        );
                    }
                    Ok(())
                }

                #[inline]
                fn saturating_add(self, other: Self) -> Self {
                    let sum = self + other;
                    if sum.is_infinite() { <$t>::MAX } else { sum }
                }

                #[inline]
                fn total_cmp(&self, other: &Self) -> Ordering {
                    <$t>::total_cmp(self, other)
                }
            }
        )*
    };
}

impl_signed_weight!(i8, i16, i32, i64, i128, isize);
impl_unsigned_weight!(u8, u16, u32, u64, u128, usize);
impl_float_weight!(f32, f64);

fn negative_weight(weight: impl fmt::Display) -> Error {
    Error::invalid_weight("weight must be non-negative").with_context("weight", weight)
}
