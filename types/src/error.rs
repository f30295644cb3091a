//! Error taxonomy shared by every crate in the workspace.

use thiserror::Error;

/// Why a buffer, equation or assignment was refused.
///
/// Consensus-facing predicates collapse all of these into `false`; the variants
/// only exist so that tooling and tests can see the reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MqError {
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("non-canonical encoding: {0}")]
    Encoding(String),

    #[error("structural mismatch: expected {expected} coefficient bits, got {actual}")]
    StructuralMismatch { expected: usize, actual: usize },

    #[error("{0} variables do not fit a 256-bit candidate")]
    VariableCount(usize),
}
