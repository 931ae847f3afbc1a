/// Shared kernel - error types, result alias, and filesystem helpers
/// used by every layer.
pub mod error;
pub mod paths;
pub mod result;
pub mod security;

pub use result::Result;
