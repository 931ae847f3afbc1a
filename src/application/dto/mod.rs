/// Data Transfer Objects for application layer
///
/// DTOs carry resolved configuration from the entry point into the tools
/// and the offline audit, keeping the domain layer unaware of files and flags.
mod audit_request;
mod report_format;
mod settings;

pub use audit_request::AuditRequest;
pub use report_format::ReportFormat;
pub use settings::{Settings, ToolTimeouts};
