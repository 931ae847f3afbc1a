use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Timeout applied when an invocation does not set one.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Classified failure of one external command execution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("Command timeout after {}s", format_secs(.timeout))]
    Timeout { timeout: Duration },

    /// The caller withdrew the request; the child was killed before this was returned.
    #[error("Command cancelled")]
    Cancelled,

    #[error("Command not found: {program}")]
    NotFound { program: String },

    #[error("Command error: {message}")]
    CommandFailed {
        message: String,
        exit_code: Option<i32>,
    },

    #[error("Error running command: {message}")]
    Unexpected { message: String },
}

impl ProcessError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ProcessError::Cancelled)
    }
}

/// Renders `30s` as `30.0` and `1500ms` as `1.5`.
fn format_secs(duration: &Duration) -> String {
    format!("{:?}", duration.as_secs_f64())
}

/// CommandInvocation - One external program call
///
/// Holds the program, its verbatim arguments, the timeout, and an optional
/// working directory. Arguments are never passed through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    program: String,
    args: Vec<String>,
    timeout: Duration,
    working_dir: Option<PathBuf>,
}

impl CommandInvocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout: DEFAULT_COMMAND_TIMEOUT,
            working_dir: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    /// Program followed by its arguments.
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

/// CommandRunner port for executing external programs
///
/// Implementations must be `Send + Sync` so one runner can serve many
/// concurrent tool calls. Cancelling `cancel`, or dropping the returned
/// future, must terminate the child process.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs the invocation to completion and returns its decoded stdout.
    ///
    /// # Errors
    /// Returns a [`ProcessError`] describing why no output was produced.
    async fn run(
        &self,
        invocation: &CommandInvocation,
        cancel: &CancellationToken,
    ) -> Result<String, ProcessError>;
}
