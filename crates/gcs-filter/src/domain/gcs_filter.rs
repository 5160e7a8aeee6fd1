//! # GCS Filters (Golomb-Coded Sets) - BIP 158
//!
//! Deterministic, node-side block filters using Golomb-Rice coding.
//!
//! ## Algorithm: Golomb-Rice Coding
//!
//! 1. Hash every item under the filter key into `[0, N * M)`
//! 2. Sort hashes and compute consecutive differences
//! 3. Encode differences with Golomb-Rice (unary + binary)
//!
//! Queries walk the encoded deltas, accumulating them back into the sorted
//! hash set. Since the sequence is non-decreasing, a lookup stops as soon as
//! the running value reaches the query hash.
//!
//! `N` and `P` are not stored inside `data`; they travel alongside it in one
//! of the wire layouts (see `wire.rs`).

use tracing::{debug, trace};

use super::bit_stream::{BitReader, BitWriter};
use super::hash_reducer::{FilterKey, HashReducer};
use super::rice;
use crate::error::FilterError;

/// Rice parameter of the standard (basic) filter.
pub const GOLOMB_P: u8 = 19;

/// Per-item modulus factor: `M = N * GOLOMB_M`.
///
/// Chosen so the false positive rate matches the `P = 19` configuration.
pub const GOLOMB_M: u64 = 784_931;

/// Expected false positive rate of any filter (`1 / GOLOMB_M`).
pub const GCS_FPR: f64 = 1.0 / (GOLOMB_M as f64);

/// Largest accepted Rice parameter
pub const MAX_PRECISION: u8 = 32;

/// Largest number of distinct items a filter can hold
pub const MAX_ITEMS: u64 = u32::MAX as u64;

/// Golomb-Coded Set filter.
///
/// Immutable once built or decoded, so a filter can be queried from many
/// threads without synchronization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GcsFilter {
    /// Number of items encoded
    n: u32,
    /// Rice parameter
    p: u8,
    /// Hash range, `n * GOLOMB_M`
    m: u64,
    /// Golomb-Rice encoded deltas
    data: Vec<u8>,
}

impl GcsFilter {
    /// Build a filter over `items` with Rice parameter `p` and a 16-byte key.
    ///
    /// Duplicate items are collapsed before encoding.
    pub fn build<I, T>(p: u8, key: &[u8], items: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        check_precision(p)?;
        let key = FilterKey::try_from(key)?;
        Self::build_with_key(p, &key, items)
    }

    /// Same as [`GcsFilter::build`] with an already validated key.
    pub fn build_with_key<I, T>(p: u8, key: &FilterKey, items: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        Self::build_with_limit(p, key, items, MAX_ITEMS)
    }

    /// Same as [`GcsFilter::build_with_key`], rejecting more than
    /// `max_items` distinct items before anything is hashed or encoded.
    pub fn build_with_limit<I, T>(
        p: u8,
        key: &FilterKey,
        items: I,
        max_items: u64,
    ) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        check_precision(p)?;

        let mut items: Vec<T> = items.into_iter().collect();
        items.sort_unstable_by(|a, b| a.as_ref().cmp(b.as_ref()));
        items.dedup_by(|a, b| a.as_ref() == b.as_ref());

        let max = max_items.min(MAX_ITEMS);
        if items.len() as u64 > max {
            return Err(FilterError::TooManyItems {
                count: items.len(),
                max,
            });
        }
        let n = u32::try_from(items.len()).map_err(|_| FilterError::TooManyItems {
            count: items.len(),
            max: MAX_ITEMS,
        })?;
        let m = modulus(n);

        let reducer = HashReducer::new(*key);
        let mut values: Vec<u64> = items
            .iter()
            .map(|item| reducer.reduce(item.as_ref(), m))
            .collect();
        values.sort_unstable();

        let mut last = 0u64;
        let total_bits: u64 = values
            .iter()
            .map(|&value| {
                let bits = rice::encoded_bits(value - last, p);
                last = value;
                bits
            })
            .sum();

        let mut writer = BitWriter::with_capacity(total_bits as usize);
        let mut last = 0u64;
        for value in values {
            rice::encode(&mut writer, value - last, p);
            last = value;
        }
        debug_assert_eq!(writer.bit_len() as u64, total_bits);
        let data = writer.render();

        debug!(n, p, bytes = data.len(), "Built GCS filter");

        Ok(Self { n, p, m, data })
    }

    /// Reassemble a filter from its parts, as carried by a wire layout.
    pub fn from_parts(n: u32, p: u8, data: Vec<u8>) -> Result<Self, FilterError> {
        check_precision(p)?;
        Ok(Self {
            n,
            p,
            m: modulus(n),
            data,
        })
    }

    /// Number of items encoded
    pub fn n(&self) -> u32 {
        self.n
    }

    /// Rice parameter
    pub fn p(&self) -> u8 {
        self.p
    }

    /// Hash range the items were reduced into
    pub fn m(&self) -> u64 {
        self.m
    }

    /// Encoded filter body
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Whether the filter encodes no items
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Get filter body size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Get expected FPR.
    pub fn false_positive_rate(&self) -> f64 {
        GCS_FPR
    }

    /// Iterate the sorted hash values encoded in the filter.
    ///
    /// Stops after `n` entries or when the data runs out, whichever is first.
    pub fn values(&self) -> FilterValues<'_> {
        FilterValues {
            reader: BitReader::new(&self.data),
            p: self.p,
            remaining: self.n,
            running: 0,
        }
    }

    /// Decode every hash value in the filter.
    pub fn decode_values(&self) -> Vec<u64> {
        self.values().collect()
    }

    /// Check whether `target` may be in the filter.
    ///
    /// `true` if the element MAY be in the set, `false` if it definitely is not.
    pub fn contains(&self, key: &[u8], target: &[u8]) -> Result<bool, FilterError> {
        let key = FilterKey::try_from(key)?;
        Ok(self.contains_with_key(&key, target))
    }

    /// Same as [`GcsFilter::contains`] with an already validated key.
    pub fn contains_with_key(&self, key: &FilterKey, target: &[u8]) -> bool {
        if self.n == 0 {
            return false;
        }

        let term = HashReducer::new(*key).reduce(target, self.m);
        for value in self.values() {
            if value == term {
                return true;
            }
            if value > term {
                return false;
            }
        }
        false
    }

    /// Check whether any of `targets` may be in the filter.
    ///
    /// Target hashes are sorted and merged against the decoded stream in a
    /// single pass. An empty target set is rejected.
    pub fn match_any<I, T>(&self, key: &[u8], targets: I) -> Result<bool, FilterError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let key = FilterKey::try_from(key)?;
        self.match_any_with_key(&key, targets)
    }

    /// Same as [`GcsFilter::match_any`] with an already validated key.
    pub fn match_any_with_key<I, T>(&self, key: &FilterKey, targets: I) -> Result<bool, FilterError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut targets = targets.into_iter().peekable();
        if targets.peek().is_none() {
            return Err(FilterError::EmptyTargetSet);
        }
        if self.n == 0 {
            return Ok(false);
        }

        let reducer = HashReducer::new(*key);
        let mut hashes: Vec<u64> = targets
            .map(|target| reducer.reduce(target.as_ref(), self.m))
            .collect();
        hashes.sort_unstable();
        hashes.dedup();

        let mut values = self.values();
        let Some(mut value) = values.next() else {
            return Ok(false);
        };
        let mut index = 0;

        loop {
            let target = hashes[index];
            if target == value {
                trace!(hash = target, "Batch match hit");
                return Ok(true);
            }
            if target < value {
                index += 1;
                if index == hashes.len() {
                    return Ok(false);
                }
            } else {
                match values.next() {
                    Some(next) => value = next,
                    None => return Ok(false),
                }
            }
        }
    }
}

/// Iterator over the cumulative hash values of a filter
#[derive(Clone, Debug)]
pub struct FilterValues<'a> {
    reader: BitReader<'a>,
    p: u8,
    remaining: u32,
    running: u64,
}

impl Iterator for FilterValues<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.remaining == 0 {
            return None;
        }
        let delta = rice::decode(&mut self.reader, self.p)?;
        self.running = self.running.checked_add(delta)?;
        self.remaining -= 1;
        Some(self.running)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining as usize))
    }
}

/// Hash range for `n` items
pub fn modulus(n: u32) -> u64 {
    u64::from(n) * GOLOMB_M
}

/// Reject Rice parameters outside `[0, 32]`
pub fn check_precision(p: u8) -> Result<(), FilterError> {
    if p > MAX_PRECISION {
        return Err(FilterError::InvalidPrecision { p });
    }
    Ok(())
}
