// src/core/paths.rs

use crate::constants::{CONFIG_DIR_NAME, RUNNER_CONFIG_FILENAME};
use lazy_static::lazy_static;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

lazy_static! {
    static ref TERMEXEC_CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// Errors raised while locating or expanding filesystem paths.
#[derive(Error, Debug)]
pub enum PathError {
    /// The OS does not report a config directory for this user.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// The termexec config directory did not exist and could not be created.
    #[error("Could not create config directory at '{path}': {source}")]
    ConfigDirCreation {
        /// The directory that was being created.
        path: String,
        /// The underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
    /// `~` or an environment variable in a path could not be expanded.
    #[error("Failed to expand path '{path}': {reason}")]
    Expansion {
        /// The path as written.
        path: String,
        /// Why expansion failed, e.g. an undefined variable.
        reason: String,
    },
}

/// Returns the path to the termexec configuration directory (`~/.config/termexec`).
/// Creates it if it doesn't exist.
///
/// Memoized: only the first call touches the filesystem.
pub fn get_config_dir() -> Result<PathBuf, PathError> {
    // The cached value is either None or a complete path, so a poisoned lock is still usable.
    let mut cached_path_guard = TERMEXEC_CONFIG_DIR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(path) = &*cached_path_guard {
        return Ok(path.clone());
    }

    let config_path = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join(CONFIG_DIR_NAME);

    if !config_path.exists() {
        fs::create_dir_all(&config_path).map_err(|e| PathError::ConfigDirCreation {
            path: config_path.display().to_string(),
            source: e,
        })?;
    }

    *cached_path_guard = Some(config_path.clone());
    Ok(config_path)
}

/// Returns the path to `runner.toml` inside the configuration directory.
pub fn get_runner_config_path() -> Result<PathBuf, PathError> {
    get_config_dir().map(|dir| dir.join(RUNNER_CONFIG_FILENAME))
}

/// Expands `~` and environment variables (`$VAR`, `${VAR}`) in an executable path.
///
/// Bare names such as `bash` are returned unchanged so they are still looked up in `PATH`.
pub fn expand_executable_path(path: &Path) -> Result<PathBuf, PathError> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw).map_err(|e| PathError::Expansion {
        path: raw.to_string(),
        reason: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// Cleans a working directory before it is handed to the OS.
/// On Windows this strips the `\\?\` prefix that canonicalized paths carry.
pub fn clean_working_dir(path: &Path) -> &Path {
    dunce::simplified(path)
}
