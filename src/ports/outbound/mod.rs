/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// The tools reach the package manager, and the offline audit reads its
/// input and renders its report, exclusively through these ports.
pub mod command_runner;
pub mod graph_reader;
pub mod report_formatter;

pub use command_runner::{CommandInvocation, CommandRunner, ProcessError, DEFAULT_COMMAND_TIMEOUT};
pub use graph_reader::GraphReader;
pub use report_formatter::ReportFormatter;
