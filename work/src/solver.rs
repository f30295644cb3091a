//! Reference CPU search (multi-threaded, exhaustive).
//!
//! Real puzzles are searched by an external engine. This solver exists for toy
//! parameter sets: tests, devnets and cross-checking an external engine's
//! output. It splits the space with [`reduce`] and hands each partition to a
//! rayon worker.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use mqpow_types::{BitVec, CANDIDATE_BYTES};
use rayon::prelude::*;
use tracing::{info, trace};

use crate::equations::EquationSystem;
use crate::fix::{reduce, FixAssignment};
use crate::WorkError;

/// Points tried per worker between checks of the stop flags.
const BATCH_SIZE: u64 = 1024;

/// Largest variable count the exhaustive search accepts.
pub const MAX_SEARCH_VARIABLES: usize = 40;

/// A root found by the solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Solution {
    /// Canonical 32-byte candidate.
    pub candidate: [u8; CANDIDATE_BYTES],
    /// Points evaluated across all workers before stopping.
    pub searched: u64,
}

/// Exhaustive solver that fixes the top `fix_length` variables per partition.
#[derive(Clone, Copy, Debug)]
pub struct CpuSolver {
    pub fix_length: usize,
}

impl CpuSolver {
    pub fn new(fix_length: usize) -> Self {
        Self { fix_length }
    }

    /// Search the whole space for a root of `system`.
    pub fn solve(&self, system: &EquationSystem) -> Result<Solution, WorkError> {
        self.solve_with_cancel(system, &AtomicBool::new(false))
    }

    /// Search until a root is found, the space is exhausted, or `cancel` is set.
    ///
    /// The first worker to find a root stops the others. The root is mapped
    /// back to the full variable set and re-checked against `system` before it
    /// is returned.
    pub fn solve_with_cancel(
        &self,
        system: &EquationSystem,
        cancel: &AtomicBool,
    ) -> Result<Solution, WorkError> {
        let n = system.variables_n();
        if n > MAX_SEARCH_VARIABLES {
            return Err(WorkError::SearchTooLarge { variables_n: n });
        }
        if self.fix_length >= n {
            return Err(WorkError::FixTooLong {
                fix_length: self.fix_length,
                variables_n: n,
            });
        }
        let free_n = n - self.fix_length;
        let partitions = 1u64 << self.fix_length;
        let points_per_partition = 1u64 << free_n;

        // Packed as `partition << free_n | local`.
        let found = AtomicU64::new(u64::MAX);
        let stop = AtomicBool::new(false);
        let searched = AtomicU64::new(0);
        let failure = Mutex::new(None);
        let halted = || stop.load(Ordering::Relaxed) || cancel.load(Ordering::Relaxed);

        (0..partitions).into_par_iter().for_each(|partition| {
            if halted() {
                return;
            }
            let fixed = match FixAssignment::from_index(partition, self.fix_length)
                .map_err(WorkError::from)
                .and_then(|fix| reduce(system, &fix))
            {
                Ok(fixed) => fixed,
                Err(e) => {
                    *failure.lock().unwrap_or_else(|p| p.into_inner()) = Some(e);
                    stop.store(true, Ordering::Relaxed);
                    return;
                }
            };
            trace!(fix = %fixed.fix(), "searching partition");

            let mut local = 0u64;
            while local < points_per_partition {
                if halted() {
                    return;
                }
                let end = (local + BATCH_SIZE).min(points_per_partition);
                for value in local..end {
                    let x = BitVec::from_uint(value, free_n);
                    if fixed.reduced().is_solution(x.as_bytes()) {
                        searched.fetch_add(value - local + 1, Ordering::Relaxed);
                        let _ = found.compare_exchange(
                            u64::MAX,
                            (partition << free_n) | value,
                            Ordering::AcqRel,
                            Ordering::Relaxed,
                        );
                        stop.store(true, Ordering::Relaxed);
                        return;
                    }
                }
                searched.fetch_add(end - local, Ordering::Relaxed);
                local = end;
            }
        });

        if let Some(e) = failure.into_inner().unwrap_or_else(|p| p.into_inner()) {
            return Err(e);
        }
        let searched = searched.load(Ordering::Relaxed);
        let packed = found.load(Ordering::Acquire);
        if packed == u64::MAX {
            return Err(if cancel.load(Ordering::Relaxed) {
                WorkError::Cancelled
            } else {
                WorkError::Exhausted { searched }
            });
        }

        let fix = FixAssignment::from_index(packed >> free_n, self.fix_length)?;
        let free = BitVec::from_uint(packed & (points_per_partition - 1), free_n);
        let fixed = reduce(system, &fix)?;
        let candidate = fixed.reconstruct(&free)?;
        if !system.is_solution(&candidate[..system.layout().variables_byte]) {
            return Err(WorkError::NotASolution);
        }

        info!(%fix, free = %free.to_bit_string(), searched, "solution found");
        Ok(Solution {
            candidate,
            searched,
        })
    }
}
