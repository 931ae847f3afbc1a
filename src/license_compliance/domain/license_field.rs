use serde::{Deserialize, Deserializer};

/// Separator used when a package declares several alternative licenses.
pub const LICENSE_DISJUNCTION: &str = " OR ";

/// LicenseField value object for the `license` attribute of a graph node
///
/// Recipes declare either nothing, a single license string, or a list of
/// alternatives. The shape is captured once at ingestion and normalized to
/// a single display string before any policy logic looks at it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LicenseField {
    #[default]
    Absent,
    Single(String),
    Multiple(Vec<String>),
}

impl LicenseField {
    /// Normalizes the field to one license expression.
    ///
    /// Returns `None` when no usable license is declared: the field is
    /// absent, a blank string, or a list without any non-blank entry.
    pub fn normalized(&self) -> Option<String> {
        match self {
            LicenseField::Absent => None,
            LicenseField::Single(license) => {
                let trimmed = license.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            LicenseField::Multiple(licenses) => {
                let parts: Vec<&str> = licenses
                    .iter()
                    .map(|l| l.trim())
                    .filter(|l| !l.is_empty())
                    .collect();
                (!parts.is_empty()).then(|| parts.join(LICENSE_DISJUNCTION))
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLicense {
    Single(String),
    Multiple(Vec<String>),
}

impl<'de> Deserialize<'de> for LicenseField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<RawLicense>::deserialize(deserializer)? {
            None => LicenseField::Absent,
            Some(RawLicense::Single(license)) => LicenseField::Single(license),
            Some(RawLicense::Multiple(licenses)) => LicenseField::Multiple(licenses),
        })
    }
}
