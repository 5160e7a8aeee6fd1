//! Golomb-Rice coding with parameter `P`
//!
//! A value `v` is written as `v >> P` one-bits, a terminating zero-bit, then
//! the low `P` bits of `v`.

use super::bit_stream::{BitReader, BitWriter};

/// Write the Rice code of `value` with parameter `p` (`p <= 32`).
pub fn encode(writer: &mut BitWriter, value: u64, p: u8) {
    let p = u32::from(p);
    let quotient = value.checked_shr(p).unwrap_or(0);
    writer.write_ones(quotient);
    writer.write_bit(false);
    writer.write_bits(value, p);
}

/// Read one Rice-coded value with parameter `p`.
///
/// Returns `None` when the stream ends anywhere inside the code; that is the
/// normal termination signal for sequential decoding.
pub fn decode(reader: &mut BitReader<'_>, p: u8) -> Option<u64> {
    let mut quotient = 0u64;
    while reader.read_bit()? {
        quotient += 1;
    }
    let remainder = reader.read_bits(u32::from(p))?;
    // A quotient that cannot be shifted back without losing bits only comes
    // from corrupt data; treat it as the end of the stream.
    let high = quotient.checked_shl(u32::from(p))?;
    if high >> p != quotient {
        return None;
    }
    Some(high | remainder)
}

/// Number of bits `encode` writes for `value`
pub fn encoded_bits(value: u64, p: u8) -> u64 {
    value.checked_shr(u32::from(p)).unwrap_or(0) + 1 + u64::from(p)
}
