use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "tasker.toml";

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Read the config file.
///
/// A missing file yields the defaults. When `explicit` is true the caller
/// asked for this exact path, so a missing file is an error instead.
pub fn read_config(path: &Path, explicit: bool) -> Result<Config, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound && !explicit => {
            return Ok(Config::default());
        }
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Resolve the data file: an explicit override wins, then the config value.
/// Relative paths are resolved against `base`.
pub fn resolve_data_file(config: &Config, override_path: Option<&Path>, base: &Path) -> PathBuf {
    let raw = match override_path {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(&config.storage.file),
    };
    if raw.is_absolute() {
        raw
    } else {
        base.join(raw)
    }
}
