//! Run a command through the platform's command interpreter and capture its standard output.
//!
//! ```no_run
//! use std::sync::Arc;
//! use termexec::{CommandRunner, LogCrateLogger, RunnerConfig};
//!
//! let runner = CommandRunner::new(RunnerConfig::default()).with_logger(Arc::new(LogCrateLogger));
//! let output = runner.run("echo hi", ".")?;
//! assert_eq!(output.into_string(), "hi\n");
//! # Ok::<(), termexec::RunError>(())
//! ```

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;

pub use models::{Invocation, Platform, RunnerConfig};
pub use system::executor::{CommandOutput, CommandRunner, FailureKind, RunError};
pub use system::logger::{LogCrateLogger, Logger, NoopLogger};
