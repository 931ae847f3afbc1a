use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish a failed license audit
/// from a misconfigured invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - server shut down cleanly, or every audited package is compliant
    Success = 0,
    /// License audit found non-compliant or unknown licenses
    NonCompliant = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (config error, unreadable graph file, I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::NonCompliant => write!(f, "Non-Compliant Licenses (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-level errors raised outside the request path
/// (configuration loading and the offline license audit).
#[derive(Debug, Error)]
pub enum ConanMcpError {
    #[error("Failed to read config file: {path}\nDetails: {details}\n\n💡 Hint: Check that the file exists and is readable.")]
    ConfigReadError { path: PathBuf, details: String },

    #[error("Failed to parse config file: {path}\nDetails: {details}\n\n💡 Hint: Ensure the file contains valid YAML syntax.")]
    ConfigParseError { path: PathBuf, details: String },

    #[error("Invalid config: {message}\n\n💡 Hint: {hint}")]
    InvalidConfig { message: String, hint: String },

    #[error("Failed to read graph file: {path}\nDetails: {details}\n\n💡 Hint: Produce it with `conan graph info <path> --format=json > graph.json`")]
    GraphFileReadError { path: PathBuf, details: String },

    #[error("Failed to parse graph file: {path}\nDetails: {details}")]
    GraphParseError { path: PathBuf, details: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },
}
