//! Loan parameter persistence.
//!
//! Parameters live in a flat TOML document whose keys match the fields of
//! [`LoanParameters`]. Keys that are absent take their default values.
//! Nothing here validates the values; [`crate::compute_schedule`] does.

use crate::error::ConfigError;
use crate::loan::LoanParameters;
use log::{debug, info};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Reads loan parameters from the TOML file at `path`.
pub fn load(path: &Path) -> Result<LoanParameters, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let params = from_toml(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("loaded parameters from {}: {}", path.display(), params);
    Ok(params)
}

/// Like [`load`], but a file that does not exist yields the defaults.
pub fn load_or_default(path: &Path) -> Result<LoanParameters, ConfigError> {
    match load(path) {
        Err(ConfigError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
            info!("{} not found, using default parameters", path.display());
            Ok(LoanParameters::default())
        }
        other => other,
    }
}

/// Writes `params` to `path`, creating missing parent directories.
pub fn save(params: &LoanParameters, path: &Path) -> Result<(), ConfigError> {
    let content = to_toml(params)?;
    let io_err = |source: std::io::Error| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(io_err)?;
    }
    fs::write(path, content).map_err(io_err)?;
    debug!("saved parameters to {}", path.display());
    Ok(())
}

pub fn from_toml(content: &str) -> Result<LoanParameters, toml::de::Error> {
    toml::from_str(content)
}

pub fn to_toml(params: &LoanParameters) -> Result<String, ConfigError> {
    Ok(toml::to_string(params)?)
}
