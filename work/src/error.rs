use mqpow_types::MqError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkError {
    #[error(transparent)]
    Malformed(#[from] MqError),

    #[error("candidate is not a root of the equation system")]
    NotASolution,

    #[error("hash value {hash_value} does not exceed threshold {threshold}")]
    BelowThreshold { hash_value: u16, threshold: u8 },

    #[error("cannot fix {fix_length} of {variables_n} variables")]
    FixTooLong { fix_length: usize, variables_n: usize },

    #[error("exhaustive search over {variables_n} variables is not supported")]
    SearchTooLarge { variables_n: usize },

    #[error("search space of {searched} points holds no solution")]
    Exhausted { searched: u64 },

    #[error("search cancelled")]
    Cancelled,
}
