//! Canonical 32-byte candidate encoding.
//!
//! A candidate carries `variables_n` significant bits, MSB-first, in its first
//! `variables_byte` bytes. Everything after them, including the padding bits of
//! the last significant byte, must be zero, so each assignment has exactly one
//! accepted encoding.

use mqpow_types::bits::padding_is_zero;
use mqpow_types::{BitVec, MqError, CANDIDATE_BYTES};

use crate::layout::EquationLayout;

/// Check `x` is a canonical candidate for `layout` and return its significant bytes.
pub fn check_canonical<'a>(layout: &EquationLayout, x: &'a [u8]) -> Result<&'a [u8], MqError> {
    if x.len() != CANDIDATE_BYTES {
        return Err(MqError::Length {
            expected: CANDIDATE_BYTES,
            actual: x.len(),
        });
    }
    if !layout.fits_candidate() {
        return Err(MqError::VariableCount(layout.variables_n));
    }
    let (significant, rest) = x.split_at(layout.variables_byte);
    if rest.iter().any(|&b| b != 0) {
        return Err(MqError::Encoding(format!(
            "bytes past {} must be zero",
            layout.variables_byte
        )));
    }
    if !padding_is_zero(significant, layout.unwanted_variables_bit) {
        return Err(MqError::Encoding(format!(
            "{} padding bits must be zero",
            layout.unwanted_variables_bit
        )));
    }
    Ok(significant)
}

/// Encode an assignment as a canonical candidate.
pub fn candidate_from_bits(bits: &BitVec) -> Result<[u8; CANDIDATE_BYTES], MqError> {
    let bytes = bits.as_bytes();
    if bytes.len() > CANDIDATE_BYTES {
        return Err(MqError::VariableCount(bits.len()));
    }
    let mut out = [0u8; CANDIDATE_BYTES];
    out[..bytes.len()].copy_from_slice(bytes);
    Ok(out)
}

/// Decode a canonical candidate into its `variables_n` bits.
pub fn bits_from_candidate(layout: &EquationLayout, x: &[u8]) -> Result<BitVec, MqError> {
    let significant = check_canonical(layout, x)?;
    BitVec::from_bytes(significant, layout.variables_n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_canonical() {
        let layout = EquationLayout::new(5, 10);
        let mut x = [0u8; 32];
        x[0] = 0xAB;
        x[1] = 0xC0;
        assert_eq!(check_canonical(&layout, &x).unwrap(), &[0xAB, 0xC0]);
        assert_eq!(
            bits_from_candidate(&layout, &x).unwrap().to_bit_string(),
            "1010101111"
        );
    }

    #[test]
    fn rejects_wrong_length() {
        let layout = EquationLayout::new(5, 10);
        assert!(matches!(
            check_canonical(&layout, &[0u8; 31]),
            Err(MqError::Length { expected: 32, actual: 31 })
        ));
        assert!(check_canonical(&layout, &[0u8; 33]).is_err());
    }

    #[test]
    fn rejects_trailing_bytes_and_padding() {
        let layout = EquationLayout::new(5, 10);
        let mut x = [0u8; 32];
        x[31] = 1;
        assert!(matches!(check_canonical(&layout, &x), Err(MqError::Encoding(_))));

        let mut x = [0u8; 32];
        x[1] = 0x20;
        assert!(matches!(check_canonical(&layout, &x), Err(MqError::Encoding(_))));
    }

    #[test]
    fn rejects_oversized_layout() {
        let layout = EquationLayout::new(260, 265);
        assert!(matches!(
            check_canonical(&layout, &[0u8; 32]),
            Err(MqError::VariableCount(265))
        ));
    }

    #[test]
    fn encode_then_check() {
        let bits = BitVec::from_bit_str("110010011").unwrap();
        let x = candidate_from_bits(&bits).unwrap();
        assert_eq!(&x[..2], &[0b1100_1001, 0b1000_0000]);
        let layout = EquationLayout::new(4, 9);
        assert_eq!(bits_from_candidate(&layout, &x).unwrap(), bits);
        assert!(candidate_from_bits(&BitVec::zeros(257)).is_err());
    }
}
