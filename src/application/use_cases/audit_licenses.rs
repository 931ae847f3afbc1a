use crate::application::dto::AuditRequest;
use crate::license_compliance::domain::ComplianceSummary;
use crate::license_compliance::services::LicenseClassifier;
use crate::ports::outbound::GraphReader;
use crate::shared::error::ConanMcpError;
use crate::shared::Result;

/// AuditLicensesUseCase - Classifies a saved dependency graph offline
///
/// Same classification as the `check_conan_dependencies_licenses` tool,
/// but the graph comes from a file instead of a live `conan graph info`.
///
/// # Type Parameters
/// * `GR` - GraphReader implementation
pub struct AuditLicensesUseCase<GR> {
    graph_reader: GR,
    classifier: LicenseClassifier,
}

impl<GR: GraphReader> AuditLicensesUseCase<GR> {
    pub fn new(graph_reader: GR, classifier: LicenseClassifier) -> Self {
        Self {
            graph_reader,
            classifier,
        }
    }

    pub fn execute(&self, request: AuditRequest) -> Result<ComplianceSummary> {
        let content = self.graph_reader.read_graph(&request.graph_path)?;

        let document: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| ConanMcpError::GraphParseError {
                path: request.graph_path.clone(),
                details: e.to_string(),
            })?;

        let summary = self
            .classifier
            .classify_document(document, request.context, request.include_root)
            .map_err(|e| ConanMcpError::GraphParseError {
                path: request.graph_path.clone(),
                details: e.to_string(),
            })?;

        tracing::debug!(
            path = %request.graph_path.display(),
            context = %request.context,
            total = summary.total_packages,
            "graph file classified"
        );

        Ok(summary)
    }
}
