use mqpow_types::MqError;
use mqpow_work::WorkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed solver message: {0}")]
    Malformed(String),

    #[error(transparent)]
    Invalid(#[from] MqError),

    #[error(transparent)]
    Work(#[from] WorkError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
