// src/bin/termexec.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::env;
use std::io::{self, Write};
use std::sync::Arc;
use termexec::{CommandRunner, LogCrateLogger, cli::Cli, core::config_loader};

/// The main entry point of the `termexec` binary.
/// It sets up logging, parses arguments, runs the command and performs
/// centralized error handling.
fn main() {
    env_logger::init();

    match run_cli(Cli::parse()) {
        // The command ran; mirror its exit code so scripts can rely on it.
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("\n{}: {:#}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Loads the configuration, runs the requested command and writes its captured output
/// to stdout. Returns the exit code the process should finish with.
fn run_cli(cli: Cli) -> Result<i32> {
    log::debug!("CLI args parsed: {:?}", cli);

    let config = match &cli.config {
        Some(path) => config_loader::load_from(path)
            .with_context(|| format!("Could not load runner config '{}'", path.display()))?,
        None => config_loader::load_or_init().context("Could not load runner config")?,
    };
    let config = cli
        .apply_overrides(config)
        .context("Could not apply the --shell override")?;

    let cwd = env::current_dir().context("Could not determine the current directory")?;
    let invocation = cli.invocation(cwd);

    let runner = CommandRunner::new(config).with_logger(Arc::new(LogCrateLogger));
    let output = runner.execute(&invocation)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    if let Some(stderr) = output.stderr() {
        io::stderr().write_all(stderr)?;
    }
    stdout.flush()?;

    let status = output.status();
    if !status.success() {
        log::warn!("Command exited with code: {:?}", status.code());
    }
    // A child killed by a signal has no code; report a generic failure.
    Ok(status.code().unwrap_or(1))
}
