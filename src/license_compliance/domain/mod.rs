mod compliance;
mod dependency_graph;
mod license_field;

pub use compliance::{ClassificationRecord, ComplianceSummary, LicenseVerdict, UNKNOWN_LICENSE};
pub use dependency_graph::{
    Context, DependencyEdge, DependencyGraph, GraphError, GraphNode, NodeId,
};
pub use license_field::{LicenseField, LICENSE_DISJUNCTION};
