//! Transpiler configuration
//!
//! Settings are read from a TOML file. A missing file is not an error and
//! yields the defaults; every key is optional.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the persistent volume claim backing file outputs.
pub const DEFAULT_VOLUME_CLAIM_NAME: &str = "argovolume";
/// Mount path used when the container has no working directory.
pub const DEFAULT_VOLUME_MOUNT_PATH: &str = "/mnt/pvol";
/// CWL's default `outdirMin`, in mebibytes.
pub const DEFAULT_OUTDIR_MIN_MEBIBYTES: u64 = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranspilerConfig {
    pub volume_claim_name: String,
    pub volume_mount_path: String,
    /// Storage requested when a `ResourceRequirement` omits `outdirMin`
    pub default_outdir_min_mebibytes: u64,
}

impl Default for TranspilerConfig {
    fn default() -> Self {
        Self {
            volume_claim_name: DEFAULT_VOLUME_CLAIM_NAME.to_string(),
            volume_mount_path: DEFAULT_VOLUME_MOUNT_PATH.to_string(),
            default_outdir_min_mebibytes: DEFAULT_OUTDIR_MIN_MEBIBYTES,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Expected {path} to be a TOML file, but found a directory")]
    IsDirectory { path: PathBuf },

    #[error("Failed to parse {path} as TOML: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

impl TranspilerConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: TranspilerConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.volume_claim_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "volume_claim_name must not be empty".to_string(),
            });
        }
        if !self.volume_mount_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                message: format!(
                    "volume_mount_path must be absolute, got `{}`",
                    self.volume_mount_path
                ),
            });
        }
        Ok(())
    }
}

/// Load configuration from `path`, falling back to defaults if it does not exist.
pub fn load_config(path: &Path) -> Result<TranspilerConfig, ConfigError> {
    match fs::read_to_string(path) {
        Ok(contents) => TranspilerConfig::from_toml(&contents, path),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(TranspilerConfig::default())
        }
        Err(err) if err.kind() == io::ErrorKind::IsADirectory => Err(ConfigError::IsDirectory {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
