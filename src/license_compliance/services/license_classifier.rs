use crate::license_compliance::domain::{
    ClassificationRecord, ComplianceSummary, Context, DependencyGraph, GraphError, GraphNode,
    UNKNOWN_LICENSE,
};
use crate::license_compliance::policies::LicensePolicy;

/// LicenseClassifier - Produces a compliance summary for one context of a graph
///
/// Works on a validated [`DependencyGraph`], so classification itself cannot
/// fail. Malformed input is rejected earlier by graph construction, which is
/// what [`LicenseClassifier::classify_document`] exposes.
#[derive(Debug, Clone, Default)]
pub struct LicenseClassifier {
    policy: LicensePolicy,
}

impl LicenseClassifier {
    pub fn new(policy: LicensePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &LicensePolicy {
        &self.policy
    }

    /// Classifies every node tagged with `context`, in node-id order.
    ///
    /// Root nodes are classified like any other node. Callers that must not
    /// judge the consumer itself should pass `graph.without_roots()`.
    pub fn classify(&self, graph: &DependencyGraph, context: Context) -> ComplianceSummary {
        let records = graph
            .nodes_in_context(context)
            .map(|node| self.classify_node(node))
            .collect();
        ComplianceSummary::from_records(records)
    }

    /// Parses a `conan graph info --format=json` document and classifies it.
    ///
    /// # Errors
    /// Returns a [`GraphError`] naming the offending node when the document
    /// is malformed; no partial summary is produced.
    pub fn classify_document(
        &self,
        document: serde_json::Value,
        context: Context,
        include_root: bool,
    ) -> Result<ComplianceSummary, GraphError> {
        let graph = DependencyGraph::from_graph_info_value(document)?;
        let graph = if include_root {
            graph
        } else {
            graph.without_roots()
        };
        Ok(self.classify(&graph, context))
    }

    fn classify_node(&self, node: &GraphNode) -> ClassificationRecord {
        let license = node.license().normalized();
        let verdict = self.policy.evaluate(license.as_deref());
        ClassificationRecord::new(
            node.reference(),
            license.unwrap_or_else(|| UNKNOWN_LICENSE.to_string()),
            verdict,
        )
    }
}
