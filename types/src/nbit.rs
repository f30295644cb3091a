//! Compact 2-byte difficulty encoding.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::params::{PowParams, VARIABLES_MARGIN};
use crate::MqError;

/// Compact difficulty: `[exponent, threshold]`.
///
/// The exponent byte plus [`PowParams::equations_offset`] is the number of
/// equations in the puzzle; the threshold byte tunes the acceptance probability
/// of a valid solution in 1/512 steps.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nbit([u8; 2]);

impl Nbit {
    /// The lowest difficulty retargeting can produce.
    pub const FLOOR: Self = Self([1, 0]);

    pub const fn new(exponent: u8, threshold: u8) -> Self {
        Self([exponent, threshold])
    }

    pub const fn from_bytes(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, MqError> {
        let arr: [u8; 2] = bytes.try_into().map_err(|_| MqError::Length {
            expected: 2,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    pub const fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }

    pub const fn exponent(&self) -> u8 {
        self.0[0]
    }

    pub const fn threshold(&self) -> u8 {
        self.0[1]
    }

    /// Number of equations in the puzzle for this difficulty.
    pub fn equations_n(&self, params: &PowParams) -> usize {
        (self.exponent() as usize).saturating_add(params.equations_offset as usize)
    }

    /// Number of variables in the puzzle for this difficulty.
    pub fn variables_n(&self, params: &PowParams) -> usize {
        self.equations_n(params).saturating_add(VARIABLES_MARGIN)
    }
}

impl fmt::Debug for Nbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nbit(exp={}, thr={})", self.exponent(), self.threshold())
    }
}

impl fmt::Display for Nbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for Nbit {
    type Err = MqError;

    /// Parse four hex digits, e.g. `"0a80"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| MqError::Encoding(format!("nbit: {e}")))?;
        Self::from_slice(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_follow_offset_and_margin() {
        let params = PowParams::default();
        let nbit = Nbit::new(3, 200);
        assert_eq!(nbit.equations_n(&params), 34);
        assert_eq!(nbit.variables_n(&params), 39);
    }

    #[test]
    fn from_slice_requires_two_bytes() {
        assert_eq!(Nbit::from_slice(&[1, 2]).unwrap(), Nbit::new(1, 2));
        assert_eq!(
            Nbit::from_slice(&[1, 2, 3]),
            Err(MqError::Length {
                expected: 2,
                actual: 3
            })
        );
        assert!(Nbit::from_slice(&[]).is_err());
    }

    #[test]
    fn hex_text_form() {
        let nbit: Nbit = "0a80".parse().unwrap();
        assert_eq!(nbit, Nbit::new(10, 128));
        assert_eq!(nbit.to_string(), "0a80");
        assert!("0a".parse::<Nbit>().is_err());
        assert!("zz00".parse::<Nbit>().is_err());
    }
}
