/// Type alias for Result with anyhow::Error as the error type.
/// Used by the configuration and CLI surfaces; the core components
/// return their own typed errors.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
