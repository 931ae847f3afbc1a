use async_trait::async_trait;
use conan_mcp::prelude::*;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Mock CommandRunner for testing
///
/// Records every invocation and answers with canned stdout or a canned error.
pub struct MockCommandRunner {
    pub stdout: String,
    pub error: Option<ProcessError>,
    invocations: Mutex<Vec<CommandInvocation>>,
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self::with_stdout("")
    }

    pub fn with_stdout(stdout: &str) -> Self {
        Self {
            stdout: stdout.to_string(),
            error: None,
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub fn with_error(error: ProcessError) -> Self {
        Self {
            stdout: String::new(),
            error: Some(error),
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub fn invocations(&self) -> Vec<CommandInvocation> {
        self.invocations.lock().unwrap().clone()
    }

    /// Full argv of the only recorded invocation, program first.
    pub fn single_argv(&self) -> Vec<String> {
        let invocations = self.invocations();
        assert_eq!(invocations.len(), 1, "expected exactly one invocation");
        invocations[0].argv().into_iter().map(str::to_string).collect()
    }
}

impl Default for MockCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for MockCommandRunner {
    async fn run(
        &self,
        invocation: &CommandInvocation,
        _cancel: &CancellationToken,
    ) -> std::result::Result<String, ProcessError> {
        self.invocations.lock().unwrap().push(invocation.clone());
        match self.error {
            Some(ref error) => Err(error.clone()),
            None => Ok(self.stdout.clone()),
        }
    }
}
