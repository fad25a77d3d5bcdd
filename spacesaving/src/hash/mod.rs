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

//! Keyed 128-bit hashing shared by the sketches.
//!
//! Items are hashed from their canonical byte form with MurmurHash3 x64/128
//! under a 64-bit seed. The table engine uses the folded 64-bit value to pick a
//! home slot; the hashed heap engine keeps the folded value per slot as a
//! search fingerprint.

use std::hash::Hasher;

use byteorder::ByteOrder;
use byteorder::LittleEndian;

/// Seed used when a sketch is built without an explicit seed.
pub const DEFAULT_SEED: u64 = 9001;

const C1: u64 = 0x87c37b91114253d5;
const C2: u64 = 0x4cf5ad432745937f;

/// Computes MurmurHash3 x64/128 of `bytes` with a 64-bit `seed`.
///
/// For seeds below 2^32 the output equals the reference implementation.
pub fn murmur3_x64_128(bytes: &[u8], seed: u64) -> (u64, u64) {
    let mut hasher = MurmurHash3X64128::with_seed(seed);
    hasher.write(bytes);
    hasher.finish128()
}

/// Streaming MurmurHash3 x64/128.
///
/// Feeding the same bytes in any number of `write` calls gives the same
/// result as [`murmur3_x64_128`] over their concatenation. As a [`Hasher`] it
/// lets any [`Hash`](std::hash::Hash) type be hashed under a 64-bit seed.
#[derive(Debug, Clone)]
pub struct MurmurHash3X64128 {
    h1: u64,
    h2: u64,
    total_len: u64,
    buffer: [u8; 16],
    buffer_len: usize,
}

impl MurmurHash3X64128 {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            h1: seed,
            h2: seed,
            total_len: 0,
            buffer: [0; 16],
            buffer_len: 0,
        }
    }

    /// Returns both 64-bit halves of the hash of the bytes written so far.
    pub fn finish128(&self) -> (u64, u64) {
        let mut h1 = self.h1;
        let mut h2 = self.h2;

        let tail = &self.buffer[..self.buffer_len];
        if tail.len() > 8 {
            h2 ^= mix_k2(LittleEndian::read_uint(&tail[8..], tail.len() - 8));
        }
        if !tail.is_empty() {
            let n = tail.len().min(8);
            h1 ^= mix_k1(LittleEndian::read_uint(&tail[..n], n));
        }

        h1 ^= self.total_len;
        h2 ^= self.total_len;
        h1 = h1.wrapping_add(h2);
        h2 = h2.wrapping_add(h1);
        h1 = fmix64(h1);
        h2 = fmix64(h2);
        h1 = h1.wrapping_add(h2);
        h2 = h2.wrapping_add(h1);
        (h1, h2)
    }

    #[inline]
    fn update(&mut self, block: &[u8]) {
        let k1 = LittleEndian::read_u64(&block[..8]);
        let k2 = LittleEndian::read_u64(&block[8..16]);

        self.h1 ^= mix_k1(k1);
        self.h1 = self.h1.rotate_left(27).wrapping_add(self.h2);
        self.h1 = self.h1.wrapping_mul(5).wrapping_add(0x52dce729);

        self.h2 ^= mix_k2(k2);
        self.h2 = self.h2.rotate_left(31).wrapping_add(self.h1);
        self.h2 = self.h2.wrapping_mul(5).wrapping_add(0x38495ab5);
    }
}

impl Default for MurmurHash3X64128 {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl Hasher for MurmurHash3X64128 {
    fn finish(&self) -> u64 {
        roll_down(self.finish128())
    }

    fn write(&mut self, bytes: &[u8]) {
        self.total_len = self.total_len.wrapping_add(bytes.len() as u64);

        if self.buffer_len + bytes.len() < 16 {
            self.buffer[self.buffer_len..self.buffer_len + bytes.len()].copy_from_slice(bytes);
            self.buffer_len += bytes.len();
            return;
        }

        let mut bytes = bytes;

        if self.buffer_len != 0 {
            let needed = 16 - self.buffer_len;
            self.buffer[self.buffer_len..].copy_from_slice(&bytes[..needed]);
            let block = self.buffer;
            self.update(&block);
            self.buffer_len = 0;
            bytes = &bytes[needed..];
        }

        let mut blocks = bytes.chunks_exact(16);
        for block in &mut blocks {
            self.update(block);
        }

        let remainder = blocks.remainder();
        self.buffer[..remainder.len()].copy_from_slice(remainder);
        self.buffer_len = remainder.len();
    }
}

/// Folds a 128-bit hash down to 64 bits.
#[inline]
pub fn roll_down((h1, h2): (u64, u64)) -> u64 {
    h1 ^ h2
}

#[inline]
fn mix_k1(k1: u64) -> u64 {
    k1.wrapping_mul(C1).rotate_left(31).wrapping_mul(C2)
}

#[inline]
fn mix_k2(k2: u64) -> u64 {
    k2.wrapping_mul(C2).rotate_left(33).wrapping_mul(C1)
}

#[inline]
fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51afd7ed558ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ceb9fe1a85ec53);
    k ^ (k >> 33)
}
