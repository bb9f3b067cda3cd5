//! Configuration management for pwgen
//!
//! Settings come from three layers: built-in defaults, an optional TOML
//! file (`pwgen.toml` in the working directory, or the path given with
//! `--config`), and command-line arguments, which always win.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::alphabet::CharsetKind;
use crate::generator::Strategy;

/// Main configuration structure for pwgen
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PwgenConfig {
    /// Generation settings
    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// Generation-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Worker count; detected CPU count when unset
    #[serde(default)]
    pub workers: Option<usize>,

    /// Enumeration strategy
    #[serde(default)]
    pub strategy: Strategy,

    /// Built-in charset to use when no file is given
    #[serde(default)]
    pub charset: CharsetKind,

    /// Progress sample interval in seconds
    #[serde(default = "default_progress_interval")]
    pub progress_interval_secs: u64,
}

/// Default progress sample interval
fn default_progress_interval() -> u64 {
    20
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            workers: None,
            strategy: Strategy::default(),
            charset: CharsetKind::default(),
            progress_interval_secs: default_progress_interval(),
        }
    }
}

impl PwgenConfig {
    /// Config file looked up in the working directory when `--config` is
    /// not given
    pub const DEFAULT_FILE: &'static str = "pwgen.toml";

    /// Load configuration; an explicit path must exist, the default file
    /// is optional
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(Path::new(path)),
            None => {
                let default = Path::new(Self::DEFAULT_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = PwgenConfig::default();
        assert_eq!(config.generator.workers, None);
        assert_eq!(config.generator.strategy, Strategy::Iterative);
        assert_eq!(config.generator.charset, CharsetKind::Full);
        assert_eq!(config.generator.progress_interval_secs, 20);
    }

    #[test]
    fn parse_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[generator]\nworkers = 4\nstrategy = \"recursive\"\ncharset = \"short\"\n"
        )
        .unwrap();

        let config = PwgenConfig::load(file.path().to_str()).unwrap();
        assert_eq!(config.generator.workers, Some(4));
        assert_eq!(config.generator.strategy, Strategy::Recursive);
        assert_eq!(config.generator.charset, CharsetKind::Short);
        // unspecified keys keep their defaults
        assert_eq!(config.generator.progress_interval_secs, 20);
    }

    #[test]
    fn missing_explicit_file_is_fatal() {
        assert!(PwgenConfig::load(Some("/nonexistent/pwgen.toml")).is_err());
    }

    #[test]
    fn bad_toml_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[generator\nworkers = ").unwrap();
        assert!(PwgenConfig::load(file.path().to_str()).is_err());
    }
}
