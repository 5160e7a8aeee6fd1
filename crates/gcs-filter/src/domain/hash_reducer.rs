//! Keyed hash reduction into `[0, range)`
//!
//! Items are hashed with 128-bit SipHash-2-4 under the filter key and the
//! hash is mapped onto the target range with multiply-and-shift fast range
//! reduction: the hash is read as a fraction in `[0, 1)` and scaled by the
//! range. No modulo is involved, so there is no modulo bias.

use std::hash::Hasher;

use siphasher::sip128::{Hasher128, SipHasher24};

use crate::error::FilterError;

/// Filter key length in bytes
pub const KEY_LENGTH: usize = 16;

/// 16-byte SipHash key used to build and query a filter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FilterKey([u8; KEY_LENGTH]);

impl FilterKey {
    /// Wrap a raw 16-byte key
    pub const fn new(bytes: [u8; KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Derive the conventional key: the first 16 bytes of the block hash.
    pub fn from_block_hash(block_hash: &[u8; 32]) -> Self {
        let mut key = [0u8; KEY_LENGTH];
        key.copy_from_slice(&block_hash[..KEY_LENGTH]);
        Self(key)
    }

    /// Raw key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }
}

impl TryFrom<&[u8]> for FilterKey {
    type Error = FilterError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let key: [u8; KEY_LENGTH] = bytes
            .try_into()
            .map_err(|_| FilterError::InvalidKeyLength { len: bytes.len() })?;
        Ok(Self(key))
    }
}

/// Maps byte strings to uniformly distributed integers under a fixed key
#[derive(Clone, Debug)]
pub struct HashReducer {
    key: FilterKey,
}

impl HashReducer {
    /// Create a reducer for `key`
    pub fn new(key: FilterKey) -> Self {
        Self { key }
    }

    /// The key this reducer hashes with
    pub fn key(&self) -> &FilterKey {
        &self.key
    }

    /// 128-bit SipHash-2-4 of `item`, `h1` in the low word.
    ///
    /// The value is the same on every host regardless of byte order.
    pub fn hash128(&self, item: &[u8]) -> u128 {
        let mut hasher = SipHasher24::new_with_key(self.key.as_bytes());
        hasher.write(item);
        u128::from(hasher.finish128())
    }

    /// Hash `item` into `[0, range)`.
    ///
    /// A zero range maps everything to 0.
    pub fn reduce(&self, item: &[u8], range: u64) -> u64 {
        fast_reduce(self.hash128(item), range)
    }
}

/// `floor(hash * range / 2^128)`, computed exactly with `u128` intermediates.
pub fn fast_reduce(hash: u128, range: u64) -> u64 {
    let hi = (hash >> 64) as u64;
    let lo = hash as u64;
    let range = u128::from(range);

    // hi * range <= (2^64 - 1)^2 and the carry is < 2^64, so the sum fits.
    let carry = (u128::from(lo) * range) >> 64;
    let scaled = u128::from(hi) * range + carry;
    (scaled >> 64) as u64
}
