//! conan-mcp - Model Context Protocol server for the Conan package manager
//!
//! This library exposes Conan operations as MCP tools spoken over
//! newline-delimited JSON-RPC on stdio, and audits the licenses of a
//! resolved Conan dependency graph, following hexagonal architecture.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`license_compliance`): Dependency graph model, license policy and classifier
//! - **Application Layer** (`application`): Tools, the offline audit use case and DTOs
//! - **Ports** (`ports`): Tool and command-runner interfaces
//! - **Adapters** (`adapters`): MCP server, tokio process runner, report formatters
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use conan_mcp::prelude::*;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> std::io::Result<()> {
//! let context = ToolContext::new(
//!     Arc::new(TokioCommandRunner::new()),
//!     Arc::new(Settings::default()),
//! );
//! let server = McpServer::new(ToolRegistry::with_builtin_tools(), context);
//! server.serve_stdio().await
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod license_compliance;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::inbound::McpServer;
    pub use crate::adapters::outbound::{
        FileSystemGraphReader, JsonReportFormatter, MarkdownReportFormatter, TokioCommandRunner,
    };
    pub use crate::application::dto::{AuditRequest, ReportFormat, Settings, ToolTimeouts};
    pub use crate::application::factories::FormatterFactory;
    pub use crate::application::tools::ToolRegistry;
    pub use crate::application::use_cases::AuditLicensesUseCase;
    pub use crate::license_compliance::domain::{
        ClassificationRecord, ComplianceSummary, Context, DependencyGraph, GraphError,
        LicenseVerdict,
    };
    pub use crate::license_compliance::policies::LicensePolicy;
    pub use crate::license_compliance::services::LicenseClassifier;
    pub use crate::ports::inbound::{Tool, ToolContext, ToolError, ToolOutput};
    pub use crate::ports::outbound::{
        CommandInvocation, CommandRunner, GraphReader, ProcessError, ReportFormatter,
    };
    pub use crate::shared::Result;
}
