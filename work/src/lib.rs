//! MQ proof-of-work.
//!
//! The puzzle is a system of `m` quadratic equations over GF(2) in `n = m + 5`
//! variables, derived from a seed with SHAKE256. A candidate is valid when it is
//! a root of the system and a re-hash of the system evaluated at a re-seeded
//! point clears the threshold carried in the compact difficulty.
//!
//! The search itself is external. This crate only constructs and checks
//! puzzles, retargets difficulty, and splits the search space ("fixing") so
//! that independent solvers can each take a partition.

pub mod candidate;
pub mod difficulty;
pub mod equations;
pub mod error;
pub mod fix;
pub mod layout;
pub mod solver;
pub mod validator;

pub use candidate::{bits_from_candidate, candidate_from_bits, check_canonical};
pub use difficulty::{calculate_nbit, difficulty_score, get_difficulty_by_nbit, DifficultyAdjuster};
pub use equations::EquationSystem;
pub use error::WorkError;
pub use fix::{reconstruct, reduce, FixAssignment, FixedSystem, MAX_FIX_LENGTH};
pub use layout::EquationLayout;
pub use solver::{CpuSolver, Solution};
pub use validator::{check_pow, verify_pow, verify_pow_with};
