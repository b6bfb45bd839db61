//! Parser configuration loaded from YAML.
//!
//! ```yaml
//! target_version: "1.5"
//! rules_db: /path/to/communityRules.json
//! ```

use crate::version::{TargetVersion, VersionError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_TARGET_VERSION: &str = "1.5";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Version(#[from] VersionError),
}

/// Settings for parsing a batch of descriptors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Game version used to select version-qualified rules
    #[serde(default = "default_target_version")]
    pub target_version: String,

    /// Optional path to an external rules database
    #[serde(default)]
    pub rules_db: Option<PathBuf>,
}

fn default_target_version() -> String {
    DEFAULT_TARGET_VERSION.to_string()
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            target_version: default_target_version(),
            rules_db: None,
        }
    }
}

impl ParserConfig {
    /// Load parser configuration from a YAML file.
    ///
    /// # Errors
    /// Returns error if the file can't be read, isn't valid YAML, or names a
    /// malformed target version.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: ParserConfig = serde_yaml::from_str(contents)?;
        config.target()?;
        Ok(config)
    }

    /// The configured target version, validated.
    pub fn target(&self) -> Result<TargetVersion, ConfigError> {
        Ok(TargetVersion::parse(&self.target_version)?)
    }
}
