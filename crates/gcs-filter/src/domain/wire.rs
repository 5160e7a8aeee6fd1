//! Wire layouts for GCS filters
//!
//! The filter body never carries its own item count or Rice parameter. The
//! layouts below differ only in how `N` and `P` travel alongside it:
//!
//! | Layout | Bytes | Out-of-band |
//! |--------|-------|-------------|
//! | N      | `compact_size(N) \|\| data` | `P` |
//! | P      | `u8(P) \|\| data` | `N` |
//! | NP     | `u32_be(N) \|\| u8(P) \|\| data` | nothing |
//! | Basic  | `compact_size(N) \|\| data`, `P = 19` | nothing |
//!
//! The basic layout is what peers exchange and what filter hashes commit to.

use super::gcs_filter::{GcsFilter, GOLOMB_P};
use crate::error::FilterError;

/// A wire layout together with whatever it needs supplied out of band
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireLayout {
    /// `compact_size(N) || data`, `P` supplied by the caller
    N { p: u8 },
    /// `u8(P) || data`, `N` supplied by the caller
    P { n: u32 },
    /// `u32_be(N) || u8(P) || data`
    NP,
    /// `compact_size(N) || data` with `P` fixed at 19
    Basic,
}

impl WireLayout {
    /// Serialize `filter` in this layout
    pub fn encode(&self, filter: &GcsFilter) -> Result<Vec<u8>, FilterError> {
        match self {
            Self::N { .. } => Ok(filter.to_n_bytes()),
            Self::P { .. } => Ok(filter.to_p_bytes()),
            Self::NP => Ok(filter.to_np_bytes()),
            Self::Basic => filter.to_basic_bytes(),
        }
    }

    /// Deserialize a filter written in this layout
    pub fn decode(&self, bytes: &[u8]) -> Result<GcsFilter, FilterError> {
        match *self {
            Self::N { p } => GcsFilter::from_n_bytes(p, bytes),
            Self::P { n } => GcsFilter::from_p_bytes(n, bytes),
            Self::NP => GcsFilter::from_np_bytes(bytes),
            Self::Basic => GcsFilter::from_basic_bytes(bytes),
        }
    }
}

impl GcsFilter {
    /// `compact_size(N) || data`
    pub fn to_n_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(compact_size_len(u64::from(self.n())) + self.size_bytes());
        write_compact_size(&mut out, u64::from(self.n()));
        out.extend_from_slice(self.data());
        out
    }

    /// Decode `compact_size(N) || data` with Rice parameter `p`
    pub fn from_n_bytes(p: u8, bytes: &[u8]) -> Result<Self, FilterError> {
        let (n, offset) = read_compact_size(bytes)?;
        let n = u32::try_from(n).map_err(|_| {
            FilterError::MalformedBuffer(format!("item count {} exceeds u32", n))
        })?;
        Self::from_parts(n, p, bytes[offset..].to_vec())
    }

    /// `u8(P) || data`
    pub fn to_p_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.size_bytes());
        out.push(self.p());
        out.extend_from_slice(self.data());
        out
    }

    /// Decode `u8(P) || data` holding `n` items
    pub fn from_p_bytes(n: u32, bytes: &[u8]) -> Result<Self, FilterError> {
        let (&p, data) = bytes
            .split_first()
            .ok_or_else(|| FilterError::MalformedBuffer("missing P prefix".to_string()))?;
        Self::from_parts(n, p, data.to_vec())
    }

    /// `u32_be(N) || u8(P) || data`
    pub fn to_np_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(5 + self.size_bytes());
        out.extend_from_slice(&self.n().to_be_bytes());
        out.push(self.p());
        out.extend_from_slice(self.data());
        out
    }

    /// Decode `u32_be(N) || u8(P) || data`
    pub fn from_np_bytes(bytes: &[u8]) -> Result<Self, FilterError> {
        if bytes.len() < 5 {
            return Err(FilterError::MalformedBuffer(format!(
                "NP prefix needs 5 bytes, got {}",
                bytes.len()
            )));
        }
        let (prefix, data) = bytes.split_at(5);
        let n = u32::from_be_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]);
        Self::from_parts(n, prefix[4], data.to_vec())
    }

    /// Canonical network encoding. Only defined for `P = 19`.
    pub fn to_basic_bytes(&self) -> Result<Vec<u8>, FilterError> {
        if self.p() != GOLOMB_P {
            return Err(FilterError::InvalidPrecision { p: self.p() });
        }
        Ok(self.to_n_bytes())
    }

    /// Decode the canonical network encoding
    pub fn from_basic_bytes(bytes: &[u8]) -> Result<Self, FilterError> {
        Self::from_n_bytes(GOLOMB_P, bytes)
    }
}

/// Encoded length of `value` as a CompactSize
pub fn compact_size_len(value: u64) -> usize {
    match value {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}

/// Append `value` as a Bitcoin CompactSize integer
pub fn write_compact_size(out: &mut Vec<u8>, value: u64) {
    match value {
        0..=0xfc => out.push(value as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(value as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(value as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
}

/// Read a CompactSize integer from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed. Truncated and
/// non-canonical encodings are rejected.
pub fn read_compact_size(bytes: &[u8]) -> Result<(u64, usize), FilterError> {
    let (&tag, rest) = bytes
        .split_first()
        .ok_or_else(|| FilterError::MalformedBuffer("missing item count".to_string()))?;

    let (value, width, min) = match tag {
        0xfd => (read_le(rest, 2)?, 2, 0xfd),
        0xfe => (read_le(rest, 4)?, 4, 0x1_0000),
        0xff => (read_le(rest, 8)?, 8, 0x1_0000_0000),
        small => return Ok((u64::from(small), 1)),
    };

    if value < min {
        return Err(FilterError::MalformedBuffer(format!(
            "non-canonical compact size {}",
            value
        )));
    }
    Ok((value, 1 + width))
}

fn read_le(bytes: &[u8], width: usize) -> Result<u64, FilterError> {
    let field = bytes.get(..width).ok_or_else(|| {
        FilterError::MalformedBuffer(format!(
            "truncated compact size: need {} bytes, got {}",
            width,
            bytes.len()
        ))
    })?;
    Ok(field
        .iter()
        .rev()
        .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte)))
}
