use crate::application::dto::Settings;
use crate::license_compliance::domain::GraphError;
use crate::ports::outbound::{CommandRunner, ProcessError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Failure of one tool call, reported to the client with `isError: true`.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The package manager succeeded but did not print the expected JSON.
    #[error("Invalid output from conan: {0}")]
    InvalidOutput(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl ToolError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ToolError::Process(err) if err.is_cancelled())
    }
}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::Io(err.to_string())
    }
}

/// Text result of a successful tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    text: String,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Everything a tool needs to serve one call.
#[derive(Clone)]
pub struct ToolContext {
    pub runner: Arc<dyn CommandRunner>,
    pub settings: Arc<Settings>,
    pub cancel: CancellationToken,
}

impl ToolContext {
    pub fn new(runner: Arc<dyn CommandRunner>, settings: Arc<Settings>) -> Self {
        Self {
            runner,
            settings,
            cancel: CancellationToken::new(),
        }
    }

    /// Same runner and settings, bound to another call's cancellation token.
    pub fn for_call(&self, cancel: CancellationToken) -> Self {
        Self {
            runner: Arc::clone(&self.runner),
            settings: Arc::clone(&self.settings),
            cancel,
        }
    }
}

/// Tool - Inbound port for one remotely callable operation
///
/// The MCP server drives tools through this trait; each implementation
/// maps JSON arguments onto one package-manager invocation.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name clients use in `tools/call`.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema object describing the accepted arguments.
    fn input_schema(&self) -> Value;

    async fn call(&self, arguments: Value, ctx: &ToolContext) -> Result<ToolOutput, ToolError>;
}
