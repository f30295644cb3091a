//! Difficulty scoring and retargeting.
//!
//! The compact nbit has two knobs: the exponent (each step adds an equation,
//! roughly doubling search cost) and the threshold (a root is accepted with
//! probability `(511 - threshold) / 512`). Both fold into one continuous score,
//!
//! `score = exponent + log2(512 / (512 - threshold))`,
//!
//! and retargeting moves that score by `log2(target_spacing / observed_spacing)`.

use std::collections::VecDeque;

use mqpow_types::{MqError, Nbit, PowParams};
use tracing::{debug, warn};

/// Continuous difficulty of a compact nbit.
pub fn difficulty_score(nbit: Nbit) -> f64 {
    let threshold = nbit.threshold() as f64;
    nbit.exponent() as f64 + (512.0 / (512.0 - threshold)).log2()
}

/// [`difficulty_score`] for a raw 2-byte nbit.
pub fn get_difficulty_by_nbit(nbit: &[u8]) -> Result<f64, MqError> {
    Nbit::from_slice(nbit).map(difficulty_score)
}

/// Compute the next nbit from the spacing observed over a window.
///
/// `window_start`/`window_end` are the timestamps (seconds) bounding
/// `window_size` block intervals. Scores below 1, including `-inf`, clamp to
/// [`Nbit::FLOOR`]; an exponent above 255 wraps on write. A degenerate window
/// (no intervals, or `window_end <= window_start`) or a NaN/`+inf` score leaves
/// `last_nbit` unchanged.
pub fn calculate_nbit(
    target_time: f64,
    last_nbit: Nbit,
    window_size: u64,
    window_start: u64,
    window_end: u64,
) -> Nbit {
    if window_size == 0 || window_end <= window_start {
        warn!(window_size, window_start, window_end, "degenerate retarget window");
        return last_nbit;
    }

    let actual_time = (window_end - window_start) as f64 / window_size as f64;
    let speed_ratio = target_time / actual_time;
    let new_score = difficulty_score(last_nbit) + speed_ratio.log2();
    debug!(%last_nbit, actual_time, speed_ratio, new_score, "retarget");

    // -inf (target_time of zero) is below 1 and clamps like any other low score.
    if new_score < 1.0 {
        warn!(new_score, "difficulty clamped to floor");
        return Nbit::FLOOR;
    }
    if !new_score.is_finite() {
        warn!(target_time, actual_time, "non-finite difficulty score");
        return last_nbit;
    }

    let new_exponent = new_score.floor();
    let new_threshold = (512.0 - 512.0 / (new_score - new_exponent).exp2())
        .floor()
        .clamp(0.0, 255.0);

    let exponent = new_exponent as u64;
    if exponent > u8::MAX as u64 {
        warn!(exponent, "difficulty exponent wraps past 255");
    }
    Nbit::new(exponent as u8, new_threshold as u8)
}

/// Retarget scheduler.
///
/// Tracks the timestamps of the last `nbit_sample_rate + 1` blocks, i.e.
/// `nbit_sample_rate` intervals, and retargets toward `reference_seconds`
/// spacing on heights that are multiples of the sample rate.
pub struct DifficultyAdjuster {
    window: VecDeque<u64>,
    params: PowParams,
}

impl DifficultyAdjuster {
    pub fn new(params: PowParams) -> Self {
        let capacity = params.nbit_sample_rate.saturating_add(1) as usize;
        Self {
            window: VecDeque::with_capacity(capacity.min(4096)),
            params,
        }
    }

    /// Record a block timestamp.
    pub fn record_block(&mut self, timestamp_secs: u64) {
        self.window.push_back(timestamp_secs);
        let max = self.params.nbit_sample_rate.saturating_add(1) as usize;
        while self.window.len() > max {
            self.window.pop_front();
        }
    }

    /// Whether the block at `height` carries a new nbit.
    pub fn is_retarget_height(&self, height: u64) -> bool {
        self.params.nbit_sample_rate != 0 && height % self.params.nbit_sample_rate == 0
    }

    /// Number of intervals currently in the window.
    pub fn intervals(&self) -> u64 {
        self.window.len().saturating_sub(1) as u64
    }

    /// Mean spacing over the window, if it holds at least one interval.
    pub fn mean_spacing(&self) -> Option<f64> {
        let (first, last) = (self.window.front()?, self.window.back()?);
        let intervals = self.intervals();
        (intervals > 0).then(|| last.saturating_sub(*first) as f64 / intervals as f64)
    }

    /// The nbit that follows `last_nbit` given the recorded window.
    pub fn next_nbit(&self, last_nbit: Nbit) -> Nbit {
        let (Some(&first), Some(&last)) = (self.window.front(), self.window.back()) else {
            return last_nbit;
        };
        calculate_nbit(
            self.params.reference_seconds as f64,
            last_nbit,
            self.intervals(),
            first,
            last,
        )
    }
}
