//! One unit of work for an external solver: a reduced system and its fix.

use std::io::Write;

use mqpow_types::CANDIDATE_BYTES;
use mqpow_work::{reduce, EquationSystem, FixAssignment, FixedSystem};
use tracing::debug;

use crate::codec::write_equations;
use crate::output::SolverOutput;
use crate::ProtocolError;

/// A partition of the puzzle, ready to be written to a solver and to map its
/// answer back to a full candidate.
#[derive(Clone, Debug)]
pub struct SolverJob {
    fixed: FixedSystem,
}

impl SolverJob {
    pub fn new(system: &EquationSystem, fix: &FixAssignment) -> Result<Self, ProtocolError> {
        Ok(Self {
            fixed: reduce(system, fix)?,
        })
    }

    /// Every partition for `fix_length` fixed variables, in index order.
    pub fn partition(
        system: &EquationSystem,
        fix_length: usize,
    ) -> Result<Vec<Self>, ProtocolError> {
        FixAssignment::partitions(fix_length)?
            .map(|fix| Self::new(system, &fix))
            .collect()
    }

    pub fn fixed(&self) -> &FixedSystem {
        &self.fixed
    }

    /// Variables the solver has to find.
    pub fn variables_n(&self) -> usize {
        self.fixed.reduced().variables_n()
    }

    /// Write the reduced equations in the line format.
    pub fn write_input<W: Write>(&self, out: &mut W) -> Result<(), ProtocolError> {
        write_equations(self.fixed.reduced(), out)
    }

    /// Map a solver's answer to a candidate for the original puzzle.
    ///
    /// `Ok(None)` when the solver found nothing. The candidate is checked
    /// against the reduced system here; callers still run full verification.
    pub fn accept(&self, output: &SolverOutput) -> Result<Option<[u8; CANDIDATE_BYTES]>, ProtocolError> {
        let Some(bits) = output.bits(self.variables_n())? else {
            debug!(fix = %self.fixed.fix(), count = output.count, "solver found nothing");
            return Ok(None);
        };
        if !self.fixed.reduced().is_solution(bits.as_bytes()) {
            return Err(mqpow_work::WorkError::NotASolution.into());
        }
        Ok(Some(self.fixed.reconstruct(&bits)?))
    }
}
