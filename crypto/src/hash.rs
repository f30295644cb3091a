//! SHAKE256 extendable-output hashing.

use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::Shake256;

/// Squeeze `len` bytes of SHAKE256 output from `data`.
pub fn xof(data: &[u8], len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    xof_into(data, &mut out);
    out
}

/// Fill `out` with SHAKE256 output from `data`.
pub fn xof_into(data: &[u8], out: &mut [u8]) {
    let mut hasher = Shake256::default();
    hasher.update(data);
    hasher.finalize_xof().read(out);
}
