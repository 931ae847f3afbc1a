use serde::Serialize;

/// Marker shown in place of a license when a package declares none.
pub const UNKNOWN_LICENSE: &str = "unknown";

/// Outcome of checking one license expression against the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseVerdict {
    Permissive,
    Copyleft,
    /// The package declares no license at all.
    Undetermined,
    /// The package declares a license the policy does not list.
    Unrecognized,
}

impl LicenseVerdict {
    pub fn is_compliant(self) -> bool {
        matches!(self, LicenseVerdict::Permissive)
    }

    pub fn is_unknown(self) -> bool {
        matches!(
            self,
            LicenseVerdict::Undetermined | LicenseVerdict::Unrecognized
        )
    }

    pub fn reason(self) -> &'static str {
        match self {
            LicenseVerdict::Permissive => "permissive license",
            LicenseVerdict::Copyleft => "copyleft license requires review",
            LicenseVerdict::Undetermined => "license could not be determined",
            LicenseVerdict::Unrecognized => "license not recognized by policy",
        }
    }
}

/// Per-package classification result, serialized as one `details` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationRecord {
    package: String,
    license: String,
    compliant: bool,
    reason: String,
    #[serde(skip)]
    verdict: LicenseVerdict,
}

impl ClassificationRecord {
    pub fn new(package: impl Into<String>, license: impl Into<String>, verdict: LicenseVerdict) -> Self {
        Self {
            package: package.into(),
            license: license.into(),
            compliant: verdict.is_compliant(),
            reason: verdict.reason().to_string(),
            verdict,
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn license(&self) -> &str {
        &self.license
    }

    pub fn is_compliant(&self) -> bool {
        self.compliant
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn verdict(&self) -> LicenseVerdict {
        self.verdict
    }
}

/// Aggregate compliance report for one classification run.
///
/// Each record lands in exactly one of the three package lists:
/// compliant, copyleft (non-compliant) or unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceSummary {
    pub total_packages: usize,
    pub compliant_packages: Vec<String>,
    pub non_compliant_packages: Vec<String>,
    pub unknown_licenses: Vec<String>,
    pub all_compliant: bool,
    pub details: Vec<ClassificationRecord>,
}

impl ComplianceSummary {
    pub fn from_records(records: Vec<ClassificationRecord>) -> Self {
        let mut compliant_packages = Vec::new();
        let mut non_compliant_packages = Vec::new();
        let mut unknown_licenses = Vec::new();

        for record in &records {
            let bucket = match record.verdict {
                LicenseVerdict::Permissive => &mut compliant_packages,
                LicenseVerdict::Copyleft => &mut non_compliant_packages,
                LicenseVerdict::Undetermined | LicenseVerdict::Unrecognized => {
                    &mut unknown_licenses
                }
            };
            bucket.push(record.package.clone());
        }

        Self {
            total_packages: records.len(),
            all_compliant: records.iter().all(ClassificationRecord::is_compliant),
            compliant_packages,
            non_compliant_packages,
            unknown_licenses,
            details: records,
        }
    }

    /// Pretty-printed JSON document returned to callers.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
