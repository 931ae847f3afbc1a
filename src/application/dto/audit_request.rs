use crate::license_compliance::domain::Context;
use std::path::PathBuf;

/// AuditRequest - Input of the offline license audit
#[derive(Debug, Clone)]
pub struct AuditRequest {
    /// Saved output of `conan graph info --format=json`
    pub graph_path: PathBuf,
    /// Context whose packages are classified
    pub context: Context,
    /// Whether root (consumer) nodes are classified too
    pub include_root: bool,
}

impl AuditRequest {
    pub fn new(graph_path: PathBuf, context: Context, include_root: bool) -> Self {
        Self {
            graph_path,
            context,
            include_root,
        }
    }
}
