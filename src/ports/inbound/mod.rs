/// Inbound ports (Driving ports) - Tool interfaces
///
/// The MCP server adapter uses these ports to list and invoke tools.
pub mod tool_port;

pub use tool_port::{Tool, ToolContext, ToolError, ToolOutput};
