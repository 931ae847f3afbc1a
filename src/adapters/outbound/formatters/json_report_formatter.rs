use crate::license_compliance::domain::ComplianceSummary;
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;

/// JsonReportFormatter adapter emitting the compliance summary document
///
/// Output is identical to the `check_conan_dependencies_licenses` tool result.
#[derive(Debug, Default)]
pub struct JsonReportFormatter;

impl JsonReportFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportFormatter for JsonReportFormatter {
    fn format(&self, summary: &ComplianceSummary) -> Result<String> {
        let mut json = summary
            .to_json_pretty()
            .map_err(|e| anyhow::anyhow!("Failed to serialize compliance summary: {}", e))?;
        json.push('\n');
        Ok(json)
    }
}
