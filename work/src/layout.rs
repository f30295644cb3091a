//! Sizes and offsets derived from `(equations_n, variables_n)`.

use mqpow_types::bits::{byte_len, padding_bits};
use mqpow_types::{Nbit, PowParams, CANDIDATE_BYTES};

/// Every size an equation system of a given shape needs.
///
/// Monomials are laid out upper-triangular, row-major:
/// `x0x0, x0x1, …, x0x(n-1), x1x1, …, x(n-1)x(n-1)`, followed by one constant bit.
/// The diagonal `xi·xi` stands for the linear term `xi`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EquationLayout {
    pub equations_n: usize,
    pub variables_n: usize,
    /// Bits per equation: one per monomial plus the constant.
    pub coefficient: usize,
    pub coefficient_byte: usize,
    pub unwanted_coefficient_bit: usize,
    pub variables_byte: usize,
    pub unwanted_variables_bit: usize,
    pub hash_byte: usize,
    pub unwanted_hash_bit: usize,
}

impl EquationLayout {
    /// Sizes saturate rather than wrap, so absurd shapes still produce a layout
    /// that [`fits_candidate`](Self::fits_candidate) rejects.
    pub const fn new(equations_n: usize, variables_n: usize) -> Self {
        let coefficient = variables_n.saturating_mul(variables_n.saturating_add(1)) / 2 + 1;
        Self {
            equations_n,
            variables_n,
            coefficient,
            coefficient_byte: byte_len(coefficient),
            unwanted_coefficient_bit: padding_bits(coefficient),
            variables_byte: byte_len(variables_n),
            unwanted_variables_bit: padding_bits(variables_n),
            hash_byte: byte_len(equations_n),
            unwanted_hash_bit: padding_bits(equations_n),
        }
    }

    pub fn for_nbit(nbit: Nbit, params: &PowParams) -> Self {
        Self::new(nbit.equations_n(params), nbit.variables_n(params))
    }

    /// First monomial index of row `i` (the pairs `(i, i..n)`).
    pub const fn row_offset(&self, i: usize) -> usize {
        i * (2 * self.variables_n + 1 - i) / 2
    }

    /// Position of monomial `xi·xj`, `i <= j < n`.
    pub fn monomial_index(&self, i: usize, j: usize) -> Option<usize> {
        (i <= j && j < self.variables_n).then(|| self.row_offset(i) + (j - i))
    }

    /// Position of the constant bit.
    pub const fn constant_index(&self) -> usize {
        self.coefficient - 1
    }

    /// Whether a variable assignment fits the fixed-width candidate buffer.
    pub const fn fits_candidate(&self) -> bool {
        self.variables_byte <= CANDIDATE_BYTES
    }
}
