//! Shared utilities for the MQ proof-of-work tooling.

pub mod logging;
pub mod time;

pub use logging::{init_logging, LogFormat};
pub use time::format_spacing;
