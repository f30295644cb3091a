//! Hand-off format between the node and an external solver process.
//!
//! The node writes the equations a solver should attack as one hex row per
//! line, terminated by `end`:
//!
//! ```text
//! 3fa0…
//! 91c4…
//! end
//! ```
//!
//! The solver answers with a single JSON record such as
//! `{"x":"0110…","count":123456}`, where `x` is the root it found (absent or
//! null if none) and `count` is how many points it tried.

pub mod codec;
pub mod error;
pub mod job;
pub mod output;

pub use codec::{decode_equations, encode_equations, read_equations, write_equations, END_MARKER};
pub use error::ProtocolError;
pub use job::SolverJob;
pub use output::SolverOutput;
