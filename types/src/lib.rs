//! Fundamental types for the MQ proof-of-work.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! the bit-vector helpers used to expand and evaluate quadratic equations over GF(2),
//! the 2-byte compact difficulty encoding, the tunable PoW parameters, and the
//! error taxonomy.

pub mod bits;
pub mod error;
pub mod nbit;
pub mod params;

pub use bits::BitVec;
pub use error::MqError;
pub use nbit::Nbit;
pub use params::{pow_params, set_pow, PowParams, CANDIDATE_BYTES, VARIABLES_MARGIN};
