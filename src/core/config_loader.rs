// src/core/config_loader.rs

use crate::core::paths::{self, PathError};
use crate::models::RunnerConfig;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading or writing `runner.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read or written.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// The config directory could not be located, or a path in the file could not be expanded.
    #[error("Could not resolve a config path: {0}")]
    Path(#[from] PathError),
    /// The file is not valid runner TOML.
    #[error("Failed to parse runner config: {0}")]
    TomlParse(#[from] toml::de::Error),
    /// The defaults could not be written out as TOML.
    #[error("Failed to serialize runner config to TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Loads `runner.toml` from the termexec config directory.
///
/// On first use the file does not exist yet; the platform defaults are written to it
/// so the user has something to edit, and returned.
pub fn load_or_init() -> Result<RunnerConfig, ConfigError> {
    let config_path = paths::get_runner_config_path()?;
    load_or_init_at(&config_path)
}

/// Same as [`load_or_init`], for an explicit file location.
pub fn load_or_init_at(config_path: &Path) -> Result<RunnerConfig, ConfigError> {
    if !config_path.exists() {
        let default_config = RunnerConfig::default();
        let toml_string = toml::to_string_pretty(&default_config)?;
        fs::write(config_path, toml_string)?;
        log::debug!(
            "Default runner config written to: {}",
            config_path.display()
        );
        Ok(default_config)
    } else {
        load_from(config_path)
    }
}

/// Reads a runner config from an explicit file. Missing keys take platform defaults.
/// The executable path is expanded (`~`, environment variables) on the way in.
pub fn load_from(config_path: &Path) -> Result<RunnerConfig, ConfigError> {
    let content = fs::read_to_string(config_path)?;
    let mut config: RunnerConfig = toml::from_str(&content)?;
    config.executable_path = paths::expand_executable_path(&config.executable_path)?;
    log::debug!("Runner config loaded from {}: {:?}", config_path.display(), config);
    Ok(config)
}
