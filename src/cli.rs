// src/cli.rs

use crate::core::paths::{self, PathError};
use crate::models::{Invocation, RunnerConfig};
use clap::Parser;
use std::path::PathBuf;

/// termexec: run a command through the platform shell and print what it wrote to stdout.
///
/// The interpreter and argument template come from `runner.toml` in the termexec config
/// directory (created with platform defaults on first use), unless overridden below.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read the runner configuration from this file instead of the default location.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Interpreter to launch (e.g. `/bin/zsh`, `pwsh`).
    #[arg(long, value_name = "PATH")]
    pub shell: Option<PathBuf>,

    /// Argument template with exactly one `{0}` slot for the command.
    #[arg(long, value_name = "TEMPLATE", allow_hyphen_values = true)]
    pub template: Option<String>,

    /// Directory to run the command in. Defaults to the current directory.
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Give the child its own console window (Windows only).
    #[arg(long)]
    pub window: bool,

    /// Let the child write standard error straight to this terminal.
    #[arg(long)]
    pub no_redirect_stderr: bool,

    /// Let the child read standard input from this terminal.
    #[arg(long)]
    pub no_redirect_stdin: bool,

    /// Do not capture standard output. The run will fail, as there is nothing to return.
    #[arg(long)]
    pub no_redirect_stdout: bool,

    /// The command to run. Multiple words are joined with single spaces.
    #[arg(required = true, trailing_var_arg = true)]
    pub command: Vec<String>,
}

impl Cli {
    /// Applies the `--shell` and `--template` overrides on top of a loaded config.
    /// `--shell` is expanded (`~`, environment variables) like the value in `runner.toml`.
    pub fn apply_overrides(&self, mut config: RunnerConfig) -> Result<RunnerConfig, PathError> {
        if let Some(shell) = &self.shell {
            config.executable_path = paths::expand_executable_path(shell)?;
        }
        if let Some(template) = &self.template {
            config.argument_template = template.clone();
        }
        Ok(config)
    }

    /// Builds the invocation described by the command line.
    pub fn invocation(&self, default_cwd: PathBuf) -> Invocation {
        let cwd = self.cwd.clone().unwrap_or(default_cwd);
        Invocation::new(self.command.join(" "), cwd)
            .create_window(self.window)
            .redirect_error(!self.no_redirect_stderr)
            .redirect_input(!self.no_redirect_stdin)
            .redirect_output(!self.no_redirect_stdout)
    }
}
