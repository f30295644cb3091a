//! Bit-indexed helpers over byte buffers.
//!
//! Boolean vectors (variable assignments, monomial vectors, equation rows and
//! digests) are stored MSB-first: bit index 0 is the most significant bit of
//! byte 0. Bits past the logical length in the last byte are padding and must
//! stay zero.
//!
//! The free functions operate on caller-owned slices and never panic on an
//! out-of-range index; they report failure through their return value instead.
//! They mutate in place, so a buffer must not be shared between threads while
//! being written.

use std::fmt;

use crate::MqError;

/// Number of bytes needed to hold `bits` bits.
pub const fn byte_len(bits: usize) -> usize {
    bits.div_ceil(8)
}

/// Number of padding bits in the last byte of a `bits`-bit vector.
pub const fn padding_bits(bits: usize) -> usize {
    (8 - bits % 8) % 8
}

/// Read bit `i`. `None` if `i` is past the end of the buffer.
pub fn get_bit(buf: &[u8], i: usize) -> Option<bool> {
    buf.get(i / 8).map(|b| (b >> (7 - i % 8)) & 1 == 1)
}

/// Write bit `i`. Returns `false` (and leaves the buffer untouched) if `i` is
/// past the end of the buffer.
#[must_use]
pub fn set_bit(buf: &mut [u8], i: usize, value: bool) -> bool {
    let Some(byte) = buf.get_mut(i / 8) else {
        return false;
    };
    let mask = 0x80u8 >> (i % 8);
    if value {
        *byte |= mask;
    } else {
        *byte &= !mask;
    }
    true
}

/// Overwrite `len` bits of `dst` starting at bit `offset` with the first `len`
/// bits of `src`.
///
/// Destination bits are replaced, not OR-ed. Returns `false` without writing
/// anything if either range exceeds its buffer.
#[must_use]
pub fn write_bits(dst: &mut [u8], offset: usize, src: &[u8], len: usize) -> bool {
    let fits_dst = offset
        .checked_add(len)
        .is_some_and(|end| end <= dst.len() * 8);
    if !fits_dst || len > src.len() * 8 {
        return false;
    }

    for k in 0..len {
        let bit = (src[k / 8] >> (7 - k % 8)) & 1;
        let pos = offset + k;
        let mask = 0x80u8 >> (pos % 8);
        if bit == 1 {
            dst[pos / 8] |= mask;
        } else {
            dst[pos / 8] &= !mask;
        }
    }
    true
}

/// Byte-wise `out = a & b`. All three buffers must have the same length.
#[must_use]
pub fn and_into(a: &[u8], b: &[u8], out: &mut [u8]) -> bool {
    if a.len() != b.len() || a.len() != out.len() {
        return false;
    }
    for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
        *o = x & y;
    }
    true
}

/// XOR of every bit in `buf`: the GF(2) sum of its entries.
pub fn parity(buf: &[u8]) -> bool {
    buf.iter().fold(0u8, |acc, b| acc ^ b).count_ones() & 1 == 1
}

/// Shift the whole buffer one bit towards index 0. The last bit becomes zero.
pub fn shift_left_one(buf: &mut [u8]) {
    let len = buf.len();
    for k in 0..len {
        let carry = if k + 1 < len { buf[k + 1] >> 7 } else { 0 };
        buf[k] = (buf[k] << 1) | carry;
    }
}

/// Shift the whole buffer one bit away from index 0. Bit 0 becomes zero.
pub fn shift_right_one(buf: &mut [u8]) {
    for k in (0..buf.len()).rev() {
        let carry = if k > 0 { buf[k - 1] & 1 } else { 0 };
        buf[k] = (buf[k] >> 1) | (carry << 7);
    }
}

/// Zero the low `pad` bits of the last byte.
///
/// Returns `false` for an empty buffer or `pad >= 8`.
#[must_use]
pub fn clear_padding(buf: &mut [u8], pad: usize) -> bool {
    if pad >= 8 {
        return false;
    }
    let Some(last) = buf.last_mut() else {
        return false;
    };
    *last &= 0xFFu8 << pad;
    true
}

/// Whether the low `pad` bits of the last byte are all zero.
pub fn padding_is_zero(buf: &[u8], pad: usize) -> bool {
    if pad == 0 {
        return true;
    }
    match buf.last() {
        Some(last) if pad < 8 => last & !(0xFFu8 << pad) == 0,
        _ => false,
    }
}

/// A fixed-length boolean vector owning its byte buffer.
///
/// The length is fixed at construction; padding bits are kept at zero by every
/// operation.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitVec {
    bytes: Vec<u8>,
    len: usize,
}

impl BitVec {
    /// An all-zero vector of `len` bits.
    pub fn zeros(len: usize) -> Self {
        Self {
            bytes: vec![0u8; byte_len(len)],
            len,
        }
    }

    /// Wrap `bytes` as a `len`-bit vector, enforcing the exact byte length and
    /// zero padding.
    pub fn from_bytes(bytes: &[u8], len: usize) -> Result<Self, MqError> {
        let expected = byte_len(len);
        if bytes.len() != expected {
            return Err(MqError::Length {
                expected,
                actual: bytes.len(),
            });
        }
        if !padding_is_zero(bytes, padding_bits(len)) {
            return Err(MqError::Encoding(format!(
                "{} trailing padding bits must be zero",
                padding_bits(len)
            )));
        }
        Ok(Self {
            bytes: bytes.to_vec(),
            len,
        })
    }

    /// Parse a string of `'0'`/`'1'` characters, first character = bit 0.
    pub fn from_bit_str(s: &str) -> Result<Self, MqError> {
        let mut v = Self::zeros(s.len());
        for (i, c) in s.bytes().enumerate() {
            match c {
                b'0' => {}
                b'1' => v.bytes[i / 8] |= 0x80 >> (i % 8),
                other => {
                    return Err(MqError::Encoding(format!(
                        "unexpected character {:?} at position {i}",
                        other as char
                    )))
                }
            }
        }
        Ok(v)
    }

    /// Build from individual bits, first element = bit 0.
    pub fn from_bools(bits: &[bool]) -> Self {
        let mut v = Self::zeros(bits.len());
        for (i, &b) in bits.iter().enumerate() {
            if b {
                v.bytes[i / 8] |= 0x80 >> (i % 8);
            }
        }
        v
    }

    /// The low `len` bits of `value`, most significant first. `len` is capped at 64.
    pub fn from_uint(value: u64, len: usize) -> Self {
        let len = len.min(64);
        let mut v = Self::zeros(len);
        for i in 0..len {
            if (value >> (len - 1 - i)) & 1 == 1 {
                v.bytes[i / 8] |= 0x80 >> (i % 8);
            }
        }
        v
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn get(&self, i: usize) -> Option<bool> {
        if i >= self.len {
            return None;
        }
        get_bit(&self.bytes, i)
    }

    #[must_use]
    pub fn set(&mut self, i: usize, value: bool) -> bool {
        i < self.len && set_bit(&mut self.bytes, i, value)
    }

    /// Overwrite the bits starting at `offset` with the first `len` bits of `src`.
    #[must_use]
    pub fn write_bits(&mut self, offset: usize, src: &[u8], len: usize) -> bool {
        let in_range = offset.checked_add(len).is_some_and(|end| end <= self.len);
        in_range && write_bits(&mut self.bytes, offset, src, len)
    }

    /// Shift one position towards index 0; the last logical bit becomes zero.
    pub fn shift_left_one(&mut self) {
        shift_left_one(&mut self.bytes);
    }

    /// Shift one position away from index 0; bits pushed into padding are dropped.
    pub fn shift_right_one(&mut self) {
        shift_right_one(&mut self.bytes);
        let _ = clear_padding(&mut self.bytes, padding_bits(self.len));
    }

    /// GF(2) sum of all bits.
    pub fn parity(&self) -> bool {
        parity(&self.bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| (self.bytes[i / 8] >> (7 - i % 8)) & 1 == 1)
    }

    /// Render as a `'0'`/`'1'` string.
    pub fn to_bit_string(&self) -> String {
        self.iter().map(|b| if b { '1' } else { '0' }).collect()
    }
}

impl fmt::Debug for BitVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitVec({})", self.to_bit_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_zero_is_msb_of_first_byte() {
        let buf = [0x80u8, 0x01];
        assert_eq!(get_bit(&buf, 0), Some(true));
        assert_eq!(get_bit(&buf, 1), Some(false));
        assert_eq!(get_bit(&buf, 15), Some(true));
        assert_eq!(get_bit(&buf, 16), None);
    }

    #[test]
    fn set_bit_out_of_range_is_noop() {
        let mut buf = [0u8; 2];
        assert!(set_bit(&mut buf, 9, true));
        assert_eq!(buf, [0x00, 0x40]);
        assert!(!set_bit(&mut buf, 16, true));
        assert_eq!(buf, [0x00, 0x40]);
        assert!(set_bit(&mut buf, 9, false));
        assert_eq!(buf, [0, 0]);
    }

    #[test]
    fn write_bits_overwrites_instead_of_accumulating() {
        let mut dst = [0xFFu8, 0xFF];
        assert!(write_bits(&mut dst, 3, &[0b1010_0000], 4));
        assert_eq!(dst, [0b1111_0101, 0xFF]);
    }

    #[test]
    fn write_bits_across_byte_boundary() {
        let mut dst = [0u8; 3];
        assert!(write_bits(&mut dst, 6, &[0xFF, 0xC0], 10));
        assert_eq!(dst, [0b0000_0011, 0xFF, 0x00]);
    }

    #[test]
    fn write_bits_rejects_overflow() {
        let mut dst = [0u8; 1];
        assert!(!write_bits(&mut dst, 5, &[0xFF], 4));
        assert!(!write_bits(&mut dst, 0, &[0xFF], 9));
        assert!(!write_bits(&mut dst, usize::MAX, &[0xFF], 2));
        assert_eq!(dst, [0]);
    }

    #[test]
    fn and_requires_matching_lengths() {
        let mut out = [0u8; 2];
        assert!(and_into(&[0xF0, 0x0F], &[0xFF, 0x01], &mut out));
        assert_eq!(out, [0xF0, 0x01]);
        assert!(!and_into(&[0xF0], &[0xFF, 0x01], &mut out));
    }

    #[test]
    fn parity_counts_all_bits() {
        assert!(!parity(&[]));
        assert!(parity(&[0x01]));
        assert!(!parity(&[0x03]));
        assert!(parity(&[0x80, 0x81]));
        assert!(!parity(&[0xFF, 0xFF, 0xFF]));
    }

    #[test]
    fn shifts_carry_between_bytes() {
        let mut buf = [0x01u8, 0x80];
        shift_left_one(&mut buf);
        assert_eq!(buf, [0x03, 0x00]);
        shift_right_one(&mut buf);
        assert_eq!(buf, [0x01, 0x80]);
        shift_right_one(&mut buf);
        assert_eq!(buf, [0x00, 0xC0]);
    }

    #[test]
    fn padding_helpers() {
        let mut buf = [0xFFu8, 0xFF];
        assert!(!padding_is_zero(&buf, 3));
        assert!(clear_padding(&mut buf, 3));
        assert_eq!(buf, [0xFF, 0xF8]);
        assert!(padding_is_zero(&buf, 3));
        assert!(padding_is_zero(&buf, 0));
        assert!(!clear_padding(&mut buf, 8));
        assert!(!clear_padding(&mut [], 1));
    }

    #[test]
    fn byte_and_padding_counts() {
        assert_eq!(byte_len(0), 0);
        assert_eq!(byte_len(1), 1);
        assert_eq!(byte_len(8), 1);
        assert_eq!(byte_len(9), 2);
        assert_eq!(padding_bits(10), 6);
        assert_eq!(padding_bits(16), 0);
        assert_eq!(padding_bits(usize::MAX), 1);
    }

    #[test]
    fn bitvec_from_bytes_enforces_canonical_form() {
        assert!(BitVec::from_bytes(&[0xFF, 0xC0], 10).is_ok());
        assert_eq!(
            BitVec::from_bytes(&[0xFF], 10),
            Err(MqError::Length {
                expected: 2,
                actual: 1
            })
        );
        assert!(matches!(
            BitVec::from_bytes(&[0xFF, 0xE0], 10),
            Err(MqError::Encoding(_))
        ));
    }

    #[test]
    fn bitvec_bit_string_roundtrip() {
        let v = BitVec::from_bit_str("1011000001").unwrap();
        assert_eq!(v.len(), 10);
        assert_eq!(v.as_bytes(), &[0b1011_0000, 0b0100_0000]);
        assert_eq!(v.to_bit_string(), "1011000001");
        assert!(matches!(
            BitVec::from_bit_str("10x1"),
            Err(MqError::Encoding(_))
        ));
    }

    #[test]
    fn bitvec_bounds_follow_logical_length() {
        let mut v = BitVec::zeros(10);
        assert!(v.set(9, true));
        assert!(!v.set(10, true));
        assert_eq!(v.get(10), None);
        assert!(!v.write_bits(8, &[0xFF], 3));
        assert_eq!(v.as_bytes(), &[0x00, 0x40]);
    }

    #[test]
    fn bitvec_shift_right_keeps_padding_zero() {
        let mut v = BitVec::from_bit_str("0000000001").unwrap();
        v.shift_right_one();
        assert!(v.is_zero());
        assert_eq!(v.as_bytes(), &[0, 0]);
    }

    #[test]
    fn bitvec_from_uint_is_big_endian() {
        assert_eq!(BitVec::from_uint(0b101, 3).to_bit_string(), "101");
        assert_eq!(BitVec::from_uint(1, 10).to_bit_string(), "0000000001");
        assert_eq!(BitVec::from_uint(0xFF, 4).to_bit_string(), "1111");
        assert!(BitVec::from_uint(7, 0).is_empty());
    }

    #[test]
    fn bitvec_from_bools_matches_bit_str() {
        let a = BitVec::from_bools(&[true, false, true, true]);
        let b = BitVec::from_bit_str("1011").unwrap();
        assert_eq!(a, b);
        assert!(a.parity());
    }
}
