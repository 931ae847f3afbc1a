use crate::adapters::outbound::formatters::{JsonReportFormatter, MarkdownReportFormatter};
use crate::application::dto::ReportFormat;
use crate::ports::outbound::ReportFormatter;

/// Factory for creating compliance report formatters
///
/// Selects the outbound formatter adapter for a requested report format.
pub struct FormatterFactory;

impl FormatterFactory {
    /// Creates a formatter instance for the specified report format
    pub fn create(format: ReportFormat) -> Box<dyn ReportFormatter> {
        match format {
            ReportFormat::Json => Box::new(JsonReportFormatter::new()),
            ReportFormat::Markdown => Box::new(MarkdownReportFormatter::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license_compliance::domain::ComplianceSummary;

    #[test]
    fn test_create_json_formatter() {
        let output = FormatterFactory::create(ReportFormat::Json)
            .format(&ComplianceSummary::from_records(vec![]))
            .unwrap();
        assert!(output.trim_start().starts_with('{'));
    }

    #[test]
    fn test_create_markdown_formatter() {
        let output = FormatterFactory::create(ReportFormat::Markdown)
            .format(&ComplianceSummary::from_records(vec![]))
            .unwrap();
        assert!(output.starts_with("# License Compliance Report"));
    }
}
