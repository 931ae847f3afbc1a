use crate::license_compliance::domain::ComplianceSummary;
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;

/// Markdown table header for per-package results
const TABLE_HEADER: &str = "| Package | License | Compliant | Reason |\n";

/// Markdown table separator line
const TABLE_SEPARATOR: &str = "|---------|---------|-----------|--------|\n";

/// MarkdownReportFormatter adapter for a human-readable license report
#[derive(Debug, Default)]
pub struct MarkdownReportFormatter;

impl MarkdownReportFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Escapes pipe characters and newlines for safe Markdown table rendering
    fn escape_markdown_table_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    fn push_package_list(output: &mut String, title: &str, packages: &[String]) {
        if packages.is_empty() {
            return;
        }
        output.push_str(&format!("### {} ({})\n\n", title, packages.len()));
        for package in packages {
            output.push_str(&format!("- {}\n", package));
        }
        output.push('\n');
    }
}

impl ReportFormatter for MarkdownReportFormatter {
    fn format(&self, summary: &ComplianceSummary) -> Result<String> {
        let mut output = String::from("# License Compliance Report\n\n");

        output.push_str(&format!(
            "- Total packages: {}\n- Compliant: {}\n- Non-compliant: {}\n- Unknown license: {}\n- All compliant: {}\n\n",
            summary.total_packages,
            summary.compliant_packages.len(),
            summary.non_compliant_packages.len(),
            summary.unknown_licenses.len(),
            if summary.all_compliant { "yes" } else { "no" },
        ));

        Self::push_package_list(&mut output, "Non-compliant", &summary.non_compliant_packages);
        Self::push_package_list(&mut output, "Unknown license", &summary.unknown_licenses);

        if !summary.details.is_empty() {
            output.push_str("## Packages\n\n");
            output.push_str(TABLE_HEADER);
            output.push_str(TABLE_SEPARATOR);
            for record in &summary.details {
                output.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    Self::escape_markdown_table_cell(record.package()),
                    Self::escape_markdown_table_cell(record.license()),
                    if record.is_compliant() { "yes" } else { "no" },
                    record.reason(),
                ));
            }
        }

        Ok(output)
    }
}
