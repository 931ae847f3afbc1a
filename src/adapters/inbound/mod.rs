/// Inbound adapters (Driving adapters) - Protocol front ends
pub mod mcp;

pub use mcp::McpServer;
