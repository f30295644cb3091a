//! Search-space partitioning by fixing variables.
//!
//! Assigning constants to the top `k` variables of an `n`-variable system gives
//! an equivalent system in the remaining `n - k` variables. The `2^k` possible
//! assignments split the original search space into disjoint, equally sized
//! pieces that independent solvers can work through, and a root of any piece
//! maps back to a root of the original by appending the fixed bits.

use mqpow_types::bits::{get_bit, set_bit};
use mqpow_types::{BitVec, MqError, CANDIDATE_BYTES};

use crate::candidate::candidate_from_bits;
use crate::equations::EquationSystem;
use crate::layout::EquationLayout;
use crate::WorkError;

/// Longest fix whose `2^k` partitions can still be indexed by a `u64`.
pub const MAX_FIX_LENGTH: usize = 63;

/// Constant values for the top `len()` variables, first bit = variable `n - len()`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FixAssignment(BitVec);

impl FixAssignment {
    /// Parse a `'0'`/`'1'` string.
    pub fn parse(s: &str) -> Result<Self, MqError> {
        BitVec::from_bit_str(s).map(Self)
    }

    /// The `index`-th of the `2^len` assignments, most significant bit first.
    ///
    /// Fails if `len` exceeds [`MAX_FIX_LENGTH`] or `index` needs more than `len` bits.
    pub fn from_index(index: u64, len: usize) -> Result<Self, MqError> {
        check_fix_length(len)?;
        if index >> len != 0 {
            return Err(MqError::Encoding(format!(
                "partition {index} does not fit in {len} bits"
            )));
        }
        Ok(Self(BitVec::from_uint(index, len)))
    }

    /// Every assignment of `len` bits, in index order.
    pub fn partitions(len: usize) -> Result<impl Iterator<Item = Self>, MqError> {
        check_fix_length(len)?;
        Ok((0..1u64 << len).map(move |i| Self(BitVec::from_uint(i, len))))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bits(&self) -> &BitVec {
        &self.0
    }

    fn bit(&self, k: usize) -> bool {
        self.0.get(k).unwrap_or(false)
    }
}

fn check_fix_length(len: usize) -> Result<(), MqError> {
    if len > MAX_FIX_LENGTH {
        return Err(MqError::Encoding(format!(
            "fix of {len} bits exceeds {MAX_FIX_LENGTH}"
        )));
    }
    Ok(())
}

impl std::fmt::Display for FixAssignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.to_bit_string())
    }
}

/// A reduced system together with what is needed to map its roots back.
#[derive(Clone, Debug)]
pub struct FixedSystem {
    reduced: EquationSystem,
    fix: FixAssignment,
    original: EquationLayout,
}

impl FixedSystem {
    /// The system over the `n - k` free variables.
    pub fn reduced(&self) -> &EquationSystem {
        &self.reduced
    }

    pub fn fix(&self) -> &FixAssignment {
        &self.fix
    }

    /// Layout of the system this one was reduced from.
    pub fn original_layout(&self) -> &EquationLayout {
        &self.original
    }

    /// Map a root of the reduced system to a candidate for the original one.
    pub fn reconstruct(&self, reduced_bits: &BitVec) -> Result<[u8; CANDIDATE_BYTES], MqError> {
        if reduced_bits.len() != self.reduced.variables_n() {
            return Err(MqError::StructuralMismatch {
                expected: self.reduced.variables_n(),
                actual: reduced_bits.len(),
            });
        }
        reconstruct(reduced_bits, &self.fix, self.original.unwanted_variables_bit)
    }
}

/// Partially evaluate `system` at `fix`.
///
/// For every monomial `xi·xj` (`i <= j`) of the original system:
/// - both variables fixed: the product is a known bit, folded into the constant;
/// - only `xj` fixed: it becomes `fix_j · xi`, a linear term in `xi`;
/// - neither fixed: the coefficient moves to its position in the smaller triangle.
///
/// Linear terms are then folded into the diagonal, since `xi·xi = xi`.
pub fn reduce(system: &EquationSystem, fix: &FixAssignment) -> Result<FixedSystem, WorkError> {
    let original = *system.layout();
    let n = original.variables_n;
    let k = fix.len();
    if k >= n {
        return Err(WorkError::FixTooLong {
            fix_length: k,
            variables_n: n,
        });
    }
    let new_n = n - k;
    let target = EquationLayout::new(original.equations_n, new_n);

    let equations = system
        .equations()
        .iter()
        .map(|row| reduce_row(row, &original, &target, fix))
        .collect();
    let reduced = EquationSystem::from_equations(new_n, equations)?;

    Ok(FixedSystem {
        reduced,
        fix: fix.clone(),
        original,
    })
}

fn reduce_row(
    row: &[u8],
    original: &EquationLayout,
    target: &EquationLayout,
    fix: &FixAssignment,
) -> Vec<u8> {
    let n = original.variables_n;
    let new_n = target.variables_n;
    let mut out = vec![0u8; target.coefficient_byte];
    let mut constant = get_bit(row, original.constant_index()).unwrap_or(false);
    let mut linear = vec![false; new_n];

    let mut idx = 0;
    for i in 0..n {
        for j in i..n {
            let coefficient = get_bit(row, idx).unwrap_or(false);
            idx += 1;
            if !coefficient {
                continue;
            }
            if i >= new_n {
                constant ^= fix.bit(i - new_n) & fix.bit(j - new_n);
            } else if j >= new_n {
                linear[i] ^= fix.bit(j - new_n);
            } else if let Some(pos) = target.monomial_index(i, j) {
                let _ = set_bit(&mut out, pos, true);
            }
        }
    }

    for (i, &term) in linear.iter().enumerate() {
        if term {
            if let Some(pos) = target.monomial_index(i, i) {
                let current = get_bit(&out, pos).unwrap_or(false);
                let _ = set_bit(&mut out, pos, !current);
            }
        }
    }
    let _ = set_bit(&mut out, target.constant_index(), constant);
    out
}

/// Lay out `[free bits][fixed bits][zero padding]` as a 32-byte candidate.
///
/// `unwanted_variables_bit` is the original system's padding count; it must
/// match the combined length or the result would not be canonical.
pub fn reconstruct(
    reduced_bits: &BitVec,
    fix: &FixAssignment,
    unwanted_variables_bit: usize,
) -> Result<[u8; CANDIDATE_BYTES], MqError> {
    let full: Vec<bool> = reduced_bits.iter().chain(fix.bits().iter()).collect();
    let padding = mqpow_types::bits::padding_bits(full.len());
    if padding != unwanted_variables_bit {
        return Err(MqError::Encoding(format!(
            "{} variables leave {padding} padding bits, expected {unwanted_variables_bit}",
            full.len()
        )));
    }
    candidate_from_bits(&BitVec::from_bools(&full))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(value: u64, n: usize) -> BitVec {
        BitVec::from_uint(value, n)
    }

    #[test]
    fn parse_rejects_other_symbols() {
        assert_eq!(FixAssignment::parse("0110").unwrap().to_string(), "0110");
        assert!(matches!(FixAssignment::parse("01a0"), Err(MqError::Encoding(_))));
        assert!(FixAssignment::parse("").unwrap().is_empty());
    }

    #[test]
    fn partitions_enumerate_in_order() {
        let all: Vec<String> = FixAssignment::partitions(2).unwrap().map(|f| f.to_string()).collect();
        assert_eq!(all, ["00", "01", "10", "11"]);
        assert_eq!(FixAssignment::partitions(0).unwrap().count(), 1);
    }

    #[test]
    fn from_index_rejects_long_fixes_and_wide_indices() {
        assert_eq!(FixAssignment::from_index(5, 3).unwrap().to_string(), "101");
        assert!(FixAssignment::from_index(0, 0).unwrap().is_empty());
        assert_eq!(FixAssignment::from_index(0, MAX_FIX_LENGTH).unwrap().len(), 63);
        assert!(matches!(FixAssignment::from_index(0, 64), Err(MqError::Encoding(_))));
        assert!(matches!(FixAssignment::from_index(1, 70), Err(MqError::Encoding(_))));
        assert!(matches!(FixAssignment::from_index(8, 3), Err(MqError::Encoding(_))));
        assert!(FixAssignment::partitions(64).is_err());
    }

    #[test]
    fn fix_length_must_leave_a_variable() {
        let system = EquationSystem::new(b"too long", 2, 4);
        assert_eq!(
            reduce(&system, &FixAssignment::parse("0000").unwrap()).unwrap_err(),
            WorkError::FixTooLong {
                fix_length: 4,
                variables_n: 4
            }
        );
        assert!(reduce(&system, &FixAssignment::parse("000").unwrap()).is_ok());
    }

    #[test]
    fn empty_fix_is_identity() {
        let system = EquationSystem::new(b"identity", 4, 9);
        let fixed = reduce(&system, &FixAssignment::parse("").unwrap()).unwrap();
        assert_eq!(fixed.reduced(), &system);
    }

    #[test]
    fn reduced_layout_shrinks() {
        let system = EquationSystem::new(b"layout", 5, 10);
        let fixed = reduce(&system, &FixAssignment::parse("101").unwrap()).unwrap();
        let layout = fixed.reduced().layout();
        assert_eq!(layout.variables_n, 7);
        assert_eq!(layout.equations_n, 5);
        assert_eq!(layout.coefficient, 29);
        assert_eq!(layout.coefficient_byte, 4);
        assert_eq!(fixed.original_layout().variables_n, 10);
    }

    #[test]
    fn reduced_evaluation_matches_original_everywhere() {
        let n = 8;
        let system = EquationSystem::new(b"partial evaluation", 6, n);
        for k in 0..n {
            for fix in FixAssignment::partitions(k).unwrap() {
                let fixed = reduce(&system, &fix).unwrap();
                for value in 0..(1u64 << (n - k)) {
                    let free = assignment(value, n - k);
                    let reduced_digest = fixed.reduced().evaluate(free.as_bytes()).unwrap();
                    let full = fixed.reconstruct(&free).unwrap();
                    let original_digest = system.evaluate(&full[..1]).unwrap();
                    assert_eq!(reduced_digest, original_digest, "k={k} fix={fix} x={value}");
                }
            }
        }
    }

    #[test]
    fn reduced_roots_are_original_roots() {
        let system = EquationSystem::new(b"roots", 5, 10);
        for fix in FixAssignment::partitions(3).unwrap() {
            let fixed = reduce(&system, &fix).unwrap();
            for value in 0..(1u64 << 7) {
                let free = assignment(value, 7);
                if fixed.reduced().is_solution(free.as_bytes()) {
                    let x = fixed.reconstruct(&free).unwrap();
                    assert!(system.is_solution(&x[..2]));
                }
            }
        }
    }

    #[test]
    fn partitions_cover_space_exactly_once() {
        let n = 9;
        let k = 3;
        let system = EquationSystem::new(b"cover", 4, n);
        let mut hits = vec![0u32; 1 << n];
        for fix in FixAssignment::partitions(k).unwrap() {
            let fixed = reduce(&system, &fix).unwrap();
            for value in 0..(1u64 << (n - k)) {
                let x = fixed.reconstruct(&assignment(value, n - k)).unwrap();
                let bits = BitVec::from_bytes(&x[..2], n).unwrap();
                let index = bits.iter().fold(0usize, |acc, b| (acc << 1) | b as usize);
                hits[index] += 1;
            }
        }
        assert!(hits.iter().all(|&h| h == 1));
    }

    #[test]
    fn reconstruct_layout() {
        let free = BitVec::from_bit_str("1100101").unwrap();
        let fix = FixAssignment::parse("011").unwrap();
        let x = reconstruct(&free, &fix, 6).unwrap();
        assert_eq!(&x[..2], &[0b1100_1010, 0b1100_0000]);
        assert!(x[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn reconstruct_checks_padding_count() {
        let free = BitVec::from_bit_str("1100101").unwrap();
        let fix = FixAssignment::parse("011").unwrap();
        assert!(matches!(reconstruct(&free, &fix, 5), Err(MqError::Encoding(_))));
    }

    #[test]
    fn fixed_system_rejects_wrong_reduced_width() {
        let system = EquationSystem::new(b"width", 5, 10);
        let fixed = reduce(&system, &FixAssignment::parse("10").unwrap()).unwrap();
        assert!(matches!(
            fixed.reconstruct(&BitVec::zeros(7)),
            Err(MqError::StructuralMismatch { expected: 8, actual: 7 })
        ));
    }
}
