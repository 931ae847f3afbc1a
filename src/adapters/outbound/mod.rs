/// Outbound adapters - Infrastructure implementations of outbound ports
pub mod filesystem;
pub mod formatters;
pub mod process;

pub use filesystem::FileSystemGraphReader;
pub use formatters::{JsonReportFormatter, MarkdownReportFormatter};
pub use process::TokioCommandRunner;
