// src/models.rs

use crate::constants::{
    UNIX_ARGUMENT_TEMPLATE, UNIX_EXECUTABLE, WINDOWS_ARGUMENT_TEMPLATE, WINDOWS_EXECUTABLE,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// --- PLATFORM ---

/// The family of command interpreter a runner targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Any Unix-like host, launched through a POSIX shell.
    Unix,
    /// Windows hosts, launched through PowerShell.
    Windows,
}

impl Platform {
    /// Detects the platform of the running host.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Unix
        }
    }

    /// The interpreter launched by default on this platform.
    pub fn default_executable(self) -> &'static str {
        match self {
            Self::Unix => UNIX_EXECUTABLE,
            Self::Windows => WINDOWS_EXECUTABLE,
        }
    }

    /// The argument template used by default on this platform.
    pub fn default_argument_template(self) -> &'static str {
        match self {
            Self::Unix => UNIX_ARGUMENT_TEMPLATE,
            Self::Windows => WINDOWS_ARGUMENT_TEMPLATE,
        }
    }
}

// --- RUNNER CONFIGURATION (FOR TOML) ---

/// Which interpreter a `CommandRunner` launches and how the command is handed to it.
///
/// Both keys are optional in `runner.toml`; a missing key takes the default of the
/// host platform.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Path (or bare name looked up in `PATH`) of the interpreter binary.
    #[serde(default = "default_executable_path")]
    pub executable_path: PathBuf,
    /// Argument string holding exactly one `{0}` slot for the command text.
    #[serde(default = "default_argument_template")]
    pub argument_template: String,
}

fn default_executable_path() -> PathBuf {
    PathBuf::from(Platform::current().default_executable())
}

fn default_argument_template() -> String {
    Platform::current().default_argument_template().to_string()
}

impl RunnerConfig {
    /// Builds the default configuration for the given platform.
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            executable_path: PathBuf::from(platform.default_executable()),
            argument_template: platform.default_argument_template().to_string(),
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::for_platform(Platform::current())
    }
}

// --- INVOCATION ---

/// A single request to run a command.
///
/// The flag defaults mirror the common case: no window, every standard stream redirected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The command text substituted into the argument template.
    pub command: String,
    /// The directory the child process starts in.
    pub working_directory: PathBuf,
    /// Whether a console window is created for the child (Windows only).
    pub create_window: bool,
    /// Whether standard error is captured instead of inherited.
    pub redirect_error: bool,
    /// Whether standard input is a (closed) pipe instead of inherited.
    pub redirect_input: bool,
    /// Whether standard output is captured. Must be `true` for a run to succeed.
    pub redirect_output: bool,
}

impl Invocation {
    /// Creates an invocation with the default flags.
    pub fn new(command: impl Into<String>, working_directory: impl AsRef<Path>) -> Self {
        Self {
            command: command.into(),
            working_directory: working_directory.as_ref().to_path_buf(),
            create_window: false,
            redirect_error: true,
            redirect_input: true,
            redirect_output: true,
        }
    }

    /// Sets whether a console window is created.
    pub fn create_window(mut self, value: bool) -> Self {
        self.create_window = value;
        self
    }

    /// Sets whether standard error is captured.
    pub fn redirect_error(mut self, value: bool) -> Self {
        self.redirect_error = value;
        self
    }

    /// Sets whether standard input is redirected.
    pub fn redirect_input(mut self, value: bool) -> Self {
        self.redirect_input = value;
        self
    }

    /// Sets whether standard output is captured.
    pub fn redirect_output(mut self, value: bool) -> Self {
        self.redirect_output = value;
        self
    }
}
