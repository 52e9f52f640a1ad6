// src/system/executor.rs

use crate::{
    constants::LOG_TAG,
    core::{
        paths,
        template::{self, TemplateError},
    },
    models::{Invocation, Platform, RunnerConfig},
    system::logger::{Logger, NoopLogger},
};
use std::fmt;
use std::io::{self, BufRead, Cursor, Read};
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, ExitStatus, Stdio};
use std::sync::Arc;
use thiserror::Error;

/// The three broad ways a run can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The argument template could not be combined with the command.
    Format,
    /// The interpreter could not be started.
    Launch,
    /// The interpreter started but its output could not be collected.
    Runtime,
}

/// A failed run. Every variant keeps the command text it was given.
#[derive(Error, Debug)]
pub enum RunError {
    /// The argument template could not take the command.
    #[error("Command '{command}' could not be formatted: {source}")]
    Format {
        /// The command text of the run.
        command: String,
        /// What was wrong with the template.
        #[source]
        source: TemplateError,
    },
    /// The interpreter could not be started (missing binary, permissions, bad cwd).
    #[error("Command '{command}' could not be launched: {source}")]
    Launch {
        /// The command text of the run.
        command: String,
        /// The error reported by the OS.
        #[source]
        source: io::Error,
    },
    /// Reading the output or waiting for the child failed.
    #[error("Command '{command}' failed while collecting its output: {source}")]
    Runtime {
        /// The command text of the run.
        command: String,
        /// The error reported by the OS.
        #[source]
        source: io::Error,
    },
    /// Standard output was not redirected, so the run was refused before launching.
    #[error("Command '{command}' was asked not to redirect standard output, so there is nothing to capture.")]
    OutputNotCaptured {
        /// The command text of the run.
        command: String,
    },
}

impl RunError {
    /// Which stage of the run failed.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Format { .. } => FailureKind::Format,
            Self::Launch { .. } => FailureKind::Launch,
            Self::Runtime { .. } | Self::OutputNotCaptured { .. } => FailureKind::Runtime,
        }
    }

    /// The command text the failed run was given.
    pub fn command(&self) -> &str {
        match self {
            Self::Format { command, .. }
            | Self::Launch { command, .. }
            | Self::Runtime { command, .. }
            | Self::OutputNotCaptured { command } => command,
        }
    }
}

/// The fully captured result of a finished child process.
///
/// Reading from it (`Read`/`BufRead`) yields the child's standard output from the start.
#[derive(Debug)]
pub struct CommandOutput {
    stdout: Cursor<Vec<u8>>,
    stderr: Option<Vec<u8>>,
    status: ExitStatus,
}

impl CommandOutput {
    /// How the child exited. A non-zero exit is not treated as a failed run.
    pub fn status(&self) -> ExitStatus {
        self.status
    }

    /// Captured standard error, or `None` if it was inherited by the parent.
    pub fn stderr(&self) -> Option<&[u8]> {
        self.stderr.as_deref()
    }

    /// The complete standard output, regardless of how much has been read.
    pub fn as_bytes(&self) -> &[u8] {
        self.stdout.get_ref()
    }

    /// Consumes the output, decoding standard output as UTF-8 (lossily).
    pub fn into_string(self) -> String {
        String::from_utf8_lossy(&self.stdout.into_inner()).into_owned()
    }
}

impl Read for CommandOutput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stdout.read(buf)
    }
}

impl BufRead for CommandOutput {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.stdout.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.stdout.consume(amt);
    }
}

/// Runs commands through a command interpreter and captures what they print.
///
/// A runner owns its configuration and its logger. Changing either requires `&mut self`,
/// while running only needs `&self`, so a runner can be shared across threads behind an
/// `Arc` once it is set up.
pub struct CommandRunner {
    config: RunnerConfig,
    logger: Arc<dyn Logger>,
}

impl fmt::Debug for CommandRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRunner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new(RunnerConfig::default())
    }
}

impl CommandRunner {
    /// Creates a runner with the given configuration and a silent logger.
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            logger: Arc::new(NoopLogger),
        }
    }

    /// Builder-style variant of [`CommandRunner::set_logger`].
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// The configuration used by the next run.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Replaces the logger.
    pub fn set_logger(&mut self, logger: Arc<dyn Logger>) {
        self.logger = logger;
    }

    /// Replaces the interpreter launched by later runs.
    pub fn set_executable_path(&mut self, path: impl Into<PathBuf>) {
        self.config.executable_path = path.into();
    }

    /// Replaces the argument template used by later runs.
    pub fn set_argument_template(&mut self, template: impl Into<String>) {
        self.config.argument_template = template.into();
    }

    /// Runs `command` in `working_directory` with the default flags
    /// (no window, every stream redirected).
    pub fn run(
        &self,
        command: &str,
        working_directory: impl AsRef<Path>,
    ) -> Result<CommandOutput, RunError> {
        self.execute(&Invocation::new(command, working_directory))
    }

    /// Runs an invocation and waits for the child to exit. There is no timeout.
    ///
    /// Logs a start line, the captured output and an end line. On failure the end
    /// line is replaced by an error line naming the command, and the error is returned.
    pub fn execute(&self, invocation: &Invocation) -> Result<CommandOutput, RunError> {
        self.logger.info(
            LOG_TAG,
            &format!(
                "============== Start Executing [{}] ===============",
                invocation.command
            ),
        );

        match self.spawn_and_capture(invocation) {
            Ok(output) => {
                self.logger.info(LOG_TAG, "============== End ===============");
                Ok(output)
            }
            Err(e) => {
                self.logger.error(
                    LOG_TAG,
                    &format!("{} threw an error: {}", invocation.command, e),
                );
                Err(e)
            }
        }
    }

    fn spawn_and_capture(&self, invocation: &Invocation) -> Result<CommandOutput, RunError> {
        let command_text = &invocation.command;

        let args = template::format_arguments(
            &self.config.argument_template,
            command_text,
            Platform::current(),
        )
        .map_err(|source| RunError::Format {
                command: command_text.clone(),
                source,
            })?;

        // Nothing to read back if stdout goes to the parent; refuse before the command has side effects.
        if !invocation.redirect_output {
            return Err(RunError::OutputNotCaptured {
                command: command_text.clone(),
            });
        }

        let clean_cwd = paths::clean_working_dir(&invocation.working_directory);
        log::debug!(
            "Launching {} {} in {}",
            self.config.executable_path.display(),
            shlex::try_join(args.iter().map(String::as_str))
                .unwrap_or_else(|_| format!("{:?}", args)),
            clean_cwd.display()
        );

        let mut command = StdCommand::new(&self.config.executable_path);
        command
            .args(&args)
            .current_dir(clean_cwd)
            .stdin(redirection(invocation.redirect_input))
            .stdout(Stdio::piped())
            .stderr(redirection(invocation.redirect_error));
        apply_window_flag(&mut command, invocation.create_window);

        let child = command.spawn().map_err(|e| RunError::Launch {
            command: command_text.clone(),
            source: e,
        })?;

        // Drains stdout and stderr together and closes a piped stdin before waiting.
        let output = child.wait_with_output().map_err(|e| RunError::Runtime {
            command: command_text.clone(),
            source: e,
        })?;

        self.logger
            .info(LOG_TAG, &String::from_utf8_lossy(&output.stdout));
        if !output.status.success() {
            log::debug!(
                "Command '{}' exited with code: {:?}",
                command_text,
                output.status.code()
            );
        }

        Ok(CommandOutput {
            stdout: Cursor::new(output.stdout),
            stderr: invocation.redirect_error.then_some(output.stderr),
            status: output.status,
        })
    }
}

fn redirection(redirect: bool) -> Stdio {
    if redirect {
        Stdio::piped()
    } else {
        Stdio::inherit()
    }
}

#[cfg(windows)]
fn apply_window_flag(command: &mut StdCommand, create_window: bool) {
    use crate::constants::CREATE_NO_WINDOW;
    use std::os::windows::process::CommandExt;

    if !create_window {
        command.creation_flags(CREATE_NO_WINDOW);
    }
}

#[cfg(not(windows))]
fn apply_window_flag(_command: &mut StdCommand, _create_window: bool) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Platform;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Line {
        Info(String),
        Error(String),
    }

    #[derive(Default)]
    struct RecordingLogger {
        lines: Mutex<Vec<Line>>,
    }

    impl RecordingLogger {
        fn lines(&self) -> Vec<Line> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl Logger for RecordingLogger {
        fn info(&self, tag: &str, message: &str) {
            assert_eq!(tag, LOG_TAG);
            self.lines.lock().unwrap().push(Line::Info(message.to_string()));
        }

        fn error(&self, tag: &str, message: &str) {
            assert_eq!(tag, LOG_TAG);
            self.lines
                .lock()
                .unwrap()
                .push(Line::Error(message.to_string()));
        }
    }

    fn recording_runner(config: RunnerConfig) -> (CommandRunner, Arc<RecordingLogger>) {
        let logger = Arc::new(RecordingLogger::default());
        let runner = CommandRunner::new(config).with_logger(logger.clone());
        (runner, logger)
    }

    fn unix_runner() -> (CommandRunner, Arc<RecordingLogger>) {
        recording_runner(RunnerConfig::for_platform(Platform::Unix))
    }

    #[test]
    fn test_runner_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CommandRunner>();
    }

    #[cfg(unix)]
    #[test]
    fn test_echo_hi() {
        let dir = TempDir::new().unwrap();
        let (runner, _) = unix_runner();

        let mut output = runner.run("echo hi", dir.path()).unwrap();
        let mut text = String::new();
        output.read_to_string(&mut text).unwrap();

        assert_eq!(text, "hi\n");
        assert!(output.status().success());
    }

    #[cfg(unix)]
    #[test]
    fn test_log_order_on_success() {
        let dir = TempDir::new().unwrap();
        let (runner, logger) = unix_runner();

        runner.run("echo hi", dir.path()).unwrap();

        assert_eq!(
            logger.lines(),
            vec![
                Line::Info("============== Start Executing [echo hi] ===============".into()),
                Line::Info("hi\n".into()),
                Line::Info("============== End ===============".into()),
            ]
        );
    }

    #[test]
    fn test_missing_slot_is_a_format_failure() {
        let dir = TempDir::new().unwrap();
        let (mut runner, logger) = unix_runner();
        runner.set_argument_template("-c");

        let err = runner.run("echo hi", dir.path()).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Format);
        assert_eq!(err.command(), "echo hi");

        let lines = logger.lines();
        assert_eq!(lines.len(), 2);
        assert!(matches!(&lines[0], Line::Info(msg) if msg.contains("Start Executing [echo hi]")));
        assert!(matches!(&lines[1], Line::Error(msg) if msg.starts_with("echo hi threw an error")));
    }

    #[test]
    fn test_missing_executable_is_a_launch_failure() {
        let dir = TempDir::new().unwrap();
        let (mut runner, logger) = unix_runner();
        runner.set_executable_path(dir.path().join("no-such-interpreter"));

        let err = runner.run("echo hi", dir.path()).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Launch);

        let lines = logger.lines();
        assert!(matches!(lines.last(), Some(Line::Error(msg)) if msg.contains("echo hi")));
        assert!(!lines.contains(&Line::Info("============== End ===============".into())));
    }

    #[cfg(unix)]
    #[test]
    fn test_invalid_working_directory_is_a_launch_failure() {
        let dir = TempDir::new().unwrap();
        let (runner, _) = unix_runner();

        let err = runner
            .run("echo hi", dir.path().join("does-not-exist"))
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Launch);
    }

    #[cfg(unix)]
    #[test]
    fn test_output_not_redirected_fails_without_running() {
        let dir = TempDir::new().unwrap();
        let (runner, logger) = unix_runner();
        let marker = dir.path().join("marker");

        let invocation =
            Invocation::new("touch marker", dir.path()).redirect_output(false);
        let err = runner.execute(&invocation).unwrap_err();

        assert!(matches!(err, RunError::OutputNotCaptured { .. }));
        assert_eq!(err.kind(), FailureKind::Runtime);
        assert!(!marker.exists());
        assert!(matches!(logger.lines().last(), Some(Line::Error(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_noop_logger_does_not_change_outcome() {
        let dir = TempDir::new().unwrap();
        let silent = CommandRunner::new(RunnerConfig::for_platform(Platform::Unix));

        let output = silent.run("echo hi", dir.path()).unwrap();
        assert_eq!(output.into_string(), "hi\n");

        let mut broken = CommandRunner::new(RunnerConfig::for_platform(Platform::Unix));
        broken.set_argument_template("no slot here");
        assert!(broken.run("echo hi", dir.path()).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_in_working_directory() {
        let dir = TempDir::new().unwrap();
        let (runner, _) = unix_runner();

        runner.run("echo data > created.txt", dir.path()).unwrap();
        let written = std::fs::read_to_string(dir.path().join("created.txt")).unwrap();
        assert_eq!(written, "data\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_quotes_are_preserved() {
        let dir = TempDir::new().unwrap();
        let (runner, _) = unix_runner();

        let output = runner.run("echo \"a  b\"", dir.path()).unwrap();
        assert_eq!(output.into_string(), "a  b\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_stderr_is_captured_separately() {
        let dir = TempDir::new().unwrap();
        let (runner, _) = unix_runner();

        let output = runner.run("echo oops 1>&2", dir.path()).unwrap();
        assert_eq!(output.stderr(), Some(&b"oops\n"[..]));
        assert!(output.as_bytes().is_empty());

        let invocation = Invocation::new("echo hi", dir.path()).redirect_error(false);
        let output = runner.execute(&invocation).unwrap();
        assert_eq!(output.stderr(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_still_a_result() {
        let dir = TempDir::new().unwrap();
        let (runner, _) = unix_runner();

        let output = runner.run("echo partial; exit 3", dir.path()).unwrap();
        assert_eq!(output.status().code(), Some(3));
        assert_eq!(output.into_string(), "partial\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_redirected_stdin_is_closed() {
        let dir = TempDir::new().unwrap();
        let (runner, _) = unix_runner();

        // `cat` would block forever on an open stdin.
        let output = runner.run("cat", dir.path()).unwrap();
        assert!(output.as_bytes().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_setters_affect_later_runs() {
        let dir = TempDir::new().unwrap();
        let (mut runner, _) = unix_runner();
        runner.set_executable_path("/bin/sh");
        runner.set_argument_template("-c 'printf %s {0}'");

        assert_eq!(runner.config().executable_path, PathBuf::from("/bin/sh"));
        let output = runner.run("abc", dir.path()).unwrap();
        assert_eq!(output.into_string(), "abc");
    }

    #[cfg(unix)]
    #[test]
    fn test_hash_word_reaches_the_interpreter() {
        let dir = TempDir::new().unwrap();
        let (mut runner, _) = unix_runner();
        runner.set_argument_template("-c {0} #tag");

        // bash binds the word after the script to $0.
        let output = runner.run("echo \"$0\"", dir.path()).unwrap();
        assert_eq!(output.into_string(), "#tag\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_bufread_lines() {
        let dir = TempDir::new().unwrap();
        let (runner, _) = unix_runner();

        let output = runner.run("printf 'one\\ntwo\\n'", dir.path()).unwrap();
        let lines: Vec<String> = output.lines().collect::<io::Result<_>>().unwrap();
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_shared_runner_across_threads() {
        let dir = TempDir::new().unwrap();
        let runner = Arc::new(CommandRunner::new(RunnerConfig::for_platform(Platform::Unix)));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let runner = Arc::clone(&runner);
                let cwd = dir.path().to_path_buf();
                std::thread::spawn(move || {
                    runner
                        .run(&format!("echo {}", i), &cwd)
                        .map(CommandOutput::into_string)
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap().unwrap(), format!("{}\n", i));
        }
    }
}
