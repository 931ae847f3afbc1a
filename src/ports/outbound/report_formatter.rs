use crate::license_compliance::domain::ComplianceSummary;
use crate::shared::Result;

/// ReportFormatter port for rendering a compliance summary
///
/// Implemented once per output format of the offline audit.
pub trait ReportFormatter {
    /// Renders the summary as text ready to be written to stdout.
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, summary: &ComplianceSummary) -> Result<String>;
}
