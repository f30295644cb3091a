//! PoW validation.
//!
//! A candidate `x` passes when:
//! 1. it is the canonical 32-byte encoding of an assignment to the puzzle's variables,
//! 2. it is a root of the equation system derived from the seed,
//! 3. evaluating the system at `x2 = SHAKE256(x)` and re-hashing the digest gives
//!    a 9-bit value strictly above the nbit threshold.
//!
//! Step 3 re-seeds the candidate so that whatever structure the search used to
//! find a root has no bearing on the threshold check. Given a root, the
//! acceptance probability is `(511 - threshold) / 512`.

use mqpow_crypto::xof;
use mqpow_types::bits::clear_padding;
use mqpow_types::{pow_params, MqError, Nbit, PowParams, CANDIDATE_BYTES};
use tracing::debug;

use crate::candidate::check_canonical;
use crate::equations::EquationSystem;
use crate::layout::EquationLayout;
use crate::WorkError;

/// Verify a candidate against the process-wide parameters.
///
/// Every failure, including malformed input, is a plain `false`.
pub fn verify_pow(seed: &[u8], nbit: &[u8], x: &[u8]) -> bool {
    verify_pow_with(&pow_params(), seed, nbit, x)
}

/// Verify a candidate against explicit parameters.
pub fn verify_pow_with(params: &PowParams, seed: &[u8], nbit: &[u8], x: &[u8]) -> bool {
    match Nbit::from_slice(nbit) {
        Ok(nbit) => match check_pow(params, seed, nbit, x) {
            Ok(()) => true,
            Err(e) => {
                debug!(%nbit, reason = %e, "pow rejected");
                false
            }
        },
        Err(e) => {
            debug!(reason = %e, "pow rejected: bad nbit");
            false
        }
    }
}

/// Verify a candidate and report why it was rejected.
pub fn check_pow(params: &PowParams, seed: &[u8], nbit: Nbit, x: &[u8]) -> Result<(), WorkError> {
    let variables_n = nbit.variables_n(params);
    if variables_n > 8 * CANDIDATE_BYTES {
        return Err(MqError::VariableCount(variables_n).into());
    }
    let layout = EquationLayout::for_nbit(nbit, params);
    // Encoding checks only need the layout, so they run before the XOF expansion.
    let significant = check_canonical(&layout, x)?;

    let system = EquationSystem::new(seed, layout.equations_n, layout.variables_n);
    if !system.is_solution(significant) {
        return Err(WorkError::NotASolution);
    }

    let hash_value = threshold_hash(&system, significant)?;
    if nbit.threshold() as u16 >= hash_value {
        return Err(WorkError::BelowThreshold {
            hash_value,
            threshold: nbit.threshold(),
        });
    }
    Ok(())
}

/// The 9-bit value compared against the threshold for a root `x`.
pub fn threshold_hash(system: &EquationSystem, x: &[u8]) -> Result<u16, WorkError> {
    let layout = system.layout();
    let mut x2 = xof(x, layout.variables_byte);
    let _ = clear_padding(&mut x2, layout.unwanted_variables_bit);

    let digest = system.evaluate(&x2)?;
    let h = xof(&digest, 2);
    Ok(((h[0] as u16) << 1) | (h[1] >> 7) as u16)
}
