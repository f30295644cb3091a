//! Quadratic equation systems over GF(2).

use mqpow_crypto::xof;
use mqpow_types::bits::{
    and_into, clear_padding, get_bit, padding_is_zero, parity, set_bit, shift_left_one, write_bits,
};
use mqpow_types::{BitVec, MqError, Nbit, PowParams};

use crate::layout::EquationLayout;

/// `equations_n` quadratic equations in `variables_n` boolean variables.
///
/// Each equation is a `coefficient_byte`-byte row holding one coefficient bit
/// per monomial (see [`EquationLayout`]) and a trailing constant bit, with the
/// padding bits of the last byte zero. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct EquationSystem {
    layout: EquationLayout,
    equations: Vec<Vec<u8>>,
}

impl EquationSystem {
    /// Derive a system from `seed`.
    ///
    /// SHAKE256 output of `equations_n * coefficient_byte` bytes is cut into
    /// equal rows and each row's padding is cleared. Identical inputs always
    /// give byte-identical equations.
    pub fn new(seed: &[u8], equations_n: usize, variables_n: usize) -> Self {
        let layout = EquationLayout::new(equations_n, variables_n);
        let material = xof(seed, equations_n * layout.coefficient_byte);
        let equations = material
            .chunks_exact(layout.coefficient_byte)
            .map(|chunk| {
                let mut row = chunk.to_vec();
                let _ = clear_padding(&mut row, layout.unwanted_coefficient_bit);
                row
            })
            .collect();
        Self { layout, equations }
    }

    /// The puzzle for a block: sizes come from `nbit` and `params`.
    pub fn from_nbit(seed: &[u8], nbit: Nbit, params: &PowParams) -> Self {
        Self::new(seed, nbit.equations_n(params), nbit.variables_n(params))
    }

    /// Adopt pre-built rows, e.g. equations handed back by another process.
    pub fn from_equations(variables_n: usize, equations: Vec<Vec<u8>>) -> Result<Self, MqError> {
        let layout = EquationLayout::new(equations.len(), variables_n);
        for row in &equations {
            if row.len() != layout.coefficient_byte {
                return Err(MqError::StructuralMismatch {
                    expected: layout.coefficient,
                    actual: row.len() * 8,
                });
            }
            if !padding_is_zero(row, layout.unwanted_coefficient_bit) {
                return Err(MqError::Encoding(
                    "equation padding bits must be zero".into(),
                ));
            }
        }
        Ok(Self { layout, equations })
    }

    /// Adopt rows written as `'0'`/`'1'` strings of exactly `coefficient` characters.
    pub fn from_bit_strings(variables_n: usize, rows: &[&str]) -> Result<Self, MqError> {
        let layout = EquationLayout::new(rows.len(), variables_n);
        let equations = rows
            .iter()
            .map(|row| {
                if row.len() != layout.coefficient {
                    return Err(MqError::StructuralMismatch {
                        expected: layout.coefficient,
                        actual: row.len(),
                    });
                }
                BitVec::from_bit_str(row).map(BitVec::into_bytes)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { layout, equations })
    }

    pub fn layout(&self) -> &EquationLayout {
        &self.layout
    }

    pub fn equations_n(&self) -> usize {
        self.layout.equations_n
    }

    pub fn variables_n(&self) -> usize {
        self.layout.variables_n
    }

    pub fn equations(&self) -> &[Vec<u8>] {
        &self.equations
    }

    /// Each equation as a fixed-width lowercase hex string.
    pub fn to_hex(&self) -> Vec<String> {
        self.equations.iter().map(hex::encode).collect()
    }

    /// Expand `x` into its monomial vector.
    ///
    /// Row `i` of the triangle receives `x[i..n)` when `x_i = 1` and stays zero
    /// otherwise; rows are disjoint so each write replaces, never accumulates.
    /// The constant position is set to 1.
    pub fn expand(&self, x: &[u8]) -> Result<Vec<u8>, MqError> {
        self.check_assignment(x)?;
        let n = self.layout.variables_n;
        let mut monomials = vec![0u8; self.layout.coefficient_byte];
        let mut shifted = x.to_vec();
        let mut offset = 0;

        for i in 0..n {
            let row_len = n - i;
            // `shifted` now starts at x_i.
            if get_bit(x, i) == Some(true) && !write_bits(&mut monomials, offset, &shifted, row_len)
            {
                return Err(MqError::StructuralMismatch {
                    expected: self.layout.coefficient,
                    actual: offset + row_len,
                });
            }
            offset += row_len;
            shift_left_one(&mut shifted);
        }

        let _ = set_bit(&mut monomials, self.layout.constant_index(), true);
        Ok(monomials)
    }

    /// Evaluate every equation at `x`.
    ///
    /// Returns the digest: one bit per equation, MSB-first, `hash_byte` bytes
    /// with zero padding.
    pub fn evaluate(&self, x: &[u8]) -> Result<Vec<u8>, MqError> {
        let monomials = self.expand(x)?;
        let mut scratch = vec![0u8; self.layout.coefficient_byte];
        let mut digest = vec![0u8; self.layout.hash_byte];

        for (k, row) in self.equations.iter().enumerate() {
            if and_into(row, &monomials, &mut scratch) && parity(&scratch) {
                let _ = set_bit(&mut digest, k, true);
            }
        }
        Ok(digest)
    }

    /// Whether every equation vanishes at `x`. A malformed `x` is never a solution.
    pub fn is_solution(&self, x: &[u8]) -> bool {
        let Ok(monomials) = self.expand(x) else {
            return false;
        };
        let mut scratch = vec![0u8; self.layout.coefficient_byte];
        self.equations
            .iter()
            .all(|row| and_into(row, &monomials, &mut scratch) && !parity(&scratch))
    }

    fn check_assignment(&self, x: &[u8]) -> Result<(), MqError> {
        if x.len() != self.layout.variables_byte {
            return Err(MqError::Length {
                expected: self.layout.variables_byte,
                actual: x.len(),
            });
        }
        if !padding_is_zero(x, self.layout.unwanted_variables_bit) {
            return Err(MqError::Encoding(format!(
                "{} trailing variable bits must be zero",
                self.layout.unwanted_variables_bit
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for EquationSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EquationSystem")
            .field("equations_n", &self.layout.equations_n)
            .field("variables_n", &self.layout.variables_n)
            .finish_non_exhaustive()
    }
}
