//! Project configuration from `astfold.toml`.
//!
//! ```toml
//! [driver]
//! max_sweeps = 10
//!
//! [passes]
//! enabled = ["block-folding", "constant-propagation"]
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::driver::DEFAULT_MAX_SWEEPS;
use crate::passes::PassKind;

pub const CONFIG_FILE: &str = "astfold.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid '{}': max_sweeps must be at least 1", path.display())]
    ZeroSweeps { path: PathBuf },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub driver: DriverConfig,
    pub passes: PassesConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverConfig {
    pub max_sweeps: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_sweeps: DEFAULT_MAX_SWEEPS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PassesConfig {
    /// Passes in the order each sweep runs them.
    pub enabled: Vec<PassKind>,
}

impl Default for PassesConfig {
    fn default() -> Self {
        Self {
            enabled: PassKind::ALL.to_vec(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse `content`; `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if config.driver.max_sweeps == 0 {
            return Err(ConfigError::ZeroSweeps {
                path: path.to_path_buf(),
            });
        }
        Ok(config)
    }

    /// Try to find an `astfold.toml` in the given directory or its ancestors.
    pub fn find(start_dir: &Path) -> Option<PathBuf> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Load the configuration governing files under `start_dir`, or the
    /// defaults when there is none.
    pub fn discover(start_dir: &Path) -> Result<Config, ConfigError> {
        match Self::find(start_dir) {
            Some(path) => {
                tracing::debug!("using configuration {}", path.display());
                Self::load(&path)
            }
            None => Ok(Config::default()),
        }
    }
}
