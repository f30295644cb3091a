//! Hash primitives for the MQ proof-of-work.
//!
//! - **SHAKE256** as the extendable-output function that derives equation
//!   coefficients from a seed and re-seeds candidate solutions during verification.

pub mod hash;

pub use hash::{xof, xof_into};
