// src/system/logger.rs

/// A sink for the lines a `CommandRunner` emits.
///
/// Every line carries a tag (the category it belongs to) and a message.
/// Implementations must be shareable across threads since one runner may serve several.
pub trait Logger: Send + Sync {
    /// Records an informational line.
    fn info(&self, tag: &str, message: &str);
    /// Records an error line.
    fn error(&self, tag: &str, message: &str);
}

/// Discards everything. This is what a runner uses until a logger is injected.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn info(&self, _tag: &str, _message: &str) {}
    fn error(&self, _tag: &str, _message: &str) {}
}

/// Forwards lines to the `log` facade, using the tag as the log target.
/// Pair it with `env_logger` (or any other `log` backend) in the host application.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCrateLogger;

impl Logger for LogCrateLogger {
    fn info(&self, tag: &str, message: &str) {
        log::info!(target: tag, "{}", message);
    }

    fn error(&self, tag: &str, message: &str) {
        log::error!(target: tag, "{}", message);
    }
}
