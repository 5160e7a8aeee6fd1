//! Bit-level stream over a byte buffer
//!
//! Bits are packed MSB-first within each byte. The writer zero-pads the last
//! partial byte when rendered.
//!
//! Running past the end of a reader is not an error: `read_bit` and
//! `read_bits` return `None`, which the Rice decoder uses as the regular
//! "no more entries" signal.

use bitvec::prelude::*;

/// Append-only bit writer
#[derive(Clone, Debug, Default)]
pub struct BitWriter {
    bits: BitVec<u8, Msb0>,
}

impl BitWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with room for `bits` bits
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bits: BitVec::with_capacity(bits),
        }
    }

    /// Append a single bit
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Append the low `width` bits of `value`, most significant first.
    ///
    /// `width` must be at most 64; release builds clamp larger widths to 64.
    pub fn write_bits(&mut self, value: u64, width: u32) {
        debug_assert!(width <= 64, "bit field wider than 64: {}", width);
        let width = width.min(64) as usize;
        if width == 0 {
            return;
        }
        let view = value.view_bits::<Msb0>();
        self.bits.extend_from_bitslice(&view[64 - width..]);
    }

    /// Append `count` one-bits (a unary run)
    pub fn write_ones(&mut self, count: u64) {
        let len = self.bits.len().saturating_add(count as usize);
        self.bits.resize(len, true);
    }

    /// Number of bits written so far
    pub fn bit_len(&self) -> usize {
        self.bits.len()
    }

    /// Finish the stream, zero-padding the final partial byte.
    pub fn render(mut self) -> Vec<u8> {
        self.bits.set_uninitialized(false);
        self.bits.into_vec()
    }
}

/// Cursor over a fixed byte buffer
#[derive(Clone, Debug)]
pub struct BitReader<'a> {
    bits: &'a BitSlice<u8, Msb0>,
    pos: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader positioned at the first bit of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            bits: data.view_bits::<Msb0>(),
            pos: 0,
        }
    }

    /// Read one bit, or `None` at end of stream
    #[inline]
    pub fn read_bit(&mut self) -> Option<bool> {
        let bit = self.bits.get(self.pos).map(|bit| *bit)?;
        self.pos += 1;
        Some(bit)
    }

    /// Read a `width`-bit big-endian field (`width <= 64`).
    ///
    /// Returns `None` without consuming anything if fewer than `width` bits
    /// remain.
    pub fn read_bits(&mut self, width: u32) -> Option<u64> {
        if width > 64 {
            return None;
        }
        let end = self.pos.checked_add(width as usize)?;
        if end > self.bits.len() {
            return None;
        }
        let value = self.bits[self.pos..end]
            .iter()
            .by_vals()
            .fold(0u64, |acc, bit| (acc << 1) | u64::from(bit));
        self.pos = end;
        Some(value)
    }

    /// Current bit offset from the start of the buffer
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bits left before end of stream
    pub fn remaining(&self) -> usize {
        self.bits.len() - self.pos
    }
}
