//! Tunable PoW parameters.
//!
//! Every construction and verification entry point has a variant taking an
//! explicit `&PowParams`. The process-wide copy behind [`set_pow`] exists for
//! callers that configure once at startup and then use the convenience
//! functions; reconfiguring while verification is in flight on other threads
//! gives no guarantee about which parameters those calls observe.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// Variables exceed equations by this fixed margin.
pub const VARIABLES_MARGIN: usize = 5;

/// Width of a candidate solution buffer in bytes.
pub const CANDIDATE_BYTES: usize = 32;

/// Parameters read by equation construction, verification and retargeting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowParams {
    /// Added to the nbit exponent byte to give the number of equations.
    pub equations_offset: u32,
    /// Blocks per difficulty retarget window.
    pub nbit_sample_rate: u64,
    /// Target spacing between blocks, in seconds.
    pub reference_seconds: u64,
}

impl PowParams {
    pub const DEFAULT: Self = Self {
        equations_offset: 31,
        nbit_sample_rate: 200,
        reference_seconds: 600,
    };
}

impl Default for PowParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

static POW_PARAMS: RwLock<PowParams> = RwLock::new(PowParams::DEFAULT);

/// Replace the process-wide parameters. Last writer wins.
pub fn set_pow(params: PowParams) {
    let mut guard = POW_PARAMS.write().unwrap_or_else(|e| e.into_inner());
    *guard = params;
}

/// Snapshot of the process-wide parameters.
pub fn pow_params() -> PowParams {
    *POW_PARAMS.read().unwrap_or_else(|e| e.into_inner())
}
