//! # System Interaction Layer
//!
//! This module is the boundary between the crate and the operating system's process
//! machinery.
//!
//! ## Modules
//!
//! - **`executor`**: The `CommandRunner`. It formats the argument template, launches the
//!   configured interpreter as a child process, waits for it, and hands back the captured
//!   standard output.
//! - **`logger`**: The `Logger` trait the runner reports through, with a silent default
//!   and an adapter for the `log` facade.

pub mod executor;
pub mod logger;
