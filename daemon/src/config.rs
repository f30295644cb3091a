//! CLI configuration file.
//!
//! All fields have defaults, so a partial (or empty) file is valid:
//!
//! ```toml
//! log_format = "json"
//!
//! [pow]
//! equations_offset = 31
//! reference_seconds = 600
//! ```

use std::path::Path;

use anyhow::Context;
use mqpow_types::PowParams;
use mqpow_utils::LogFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Puzzle and retarget parameters.
    #[serde(default)]
    pub pow: PowParams,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl CliConfig {
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            pow: PowParams::default(),
        }
    }
}
