use crate::license_compliance::domain::{LicenseVerdict, LICENSE_DISJUNCTION};
use std::collections::BTreeSet;

const DEFAULT_PERMISSIVE: &[&str] = &[
    "0BSD",
    "Apache-2.0",
    "BSD-2-Clause",
    "BSD-3-Clause",
    "BSL-1.0",
    "CC0-1.0",
    "ISC",
    "MIT",
    "MIT-0",
    "Unlicense",
    "Zlib",
    "curl",
];

const DEFAULT_COPYLEFT: &[&str] = &[
    "AGPL-3.0",
    "AGPL-3.0-only",
    "AGPL-3.0-or-later",
    "GPL-2.0",
    "GPL-2.0-only",
    "GPL-2.0-or-later",
    "GPL-3.0",
    "GPL-3.0-only",
    "GPL-3.0-or-later",
];

/// LicensePolicy decides whether a license expression is acceptable
///
/// The policy is plain data: two sets of canonical identifiers. An
/// expression made of `" OR "` alternatives is compliant as soon as one
/// alternative is permissive, since the consumer may pick that one.
/// Only when no alternative is permissive does a copyleft alternative
/// make the package non-compliant. Identifiers are matched literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicensePolicy {
    permissive: BTreeSet<String>,
    copyleft: BTreeSet<String>,
}

impl Default for LicensePolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_PERMISSIVE.iter().map(|s| s.to_string()),
            DEFAULT_COPYLEFT.iter().map(|s| s.to_string()),
        )
    }
}

impl LicensePolicy {
    pub fn new(
        permissive: impl IntoIterator<Item = String>,
        copyleft: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            permissive: permissive.into_iter().collect(),
            copyleft: copyleft.into_iter().collect(),
        }
    }

    pub fn permissive(&self) -> &BTreeSet<String> {
        &self.permissive
    }

    pub fn copyleft(&self) -> &BTreeSet<String> {
        &self.copyleft
    }

    /// Classifies a normalized license expression.
    ///
    /// # Arguments
    /// * `expression` - Normalized license, or `None` when the package declares none
    pub fn evaluate(&self, expression: Option<&str>) -> LicenseVerdict {
        let Some(expression) = expression else {
            return LicenseVerdict::Undetermined;
        };

        let alternatives: Vec<&str> = expression
            .split(LICENSE_DISJUNCTION)
            .map(str::trim)
            .filter(|alt| !alt.is_empty())
            .collect();

        if alternatives.iter().any(|alt| self.permissive.contains(*alt)) {
            LicenseVerdict::Permissive
        } else if alternatives.iter().any(|alt| self.copyleft.contains(*alt)) {
            LicenseVerdict::Copyleft
        } else {
            LicenseVerdict::Unrecognized
        }
    }
}
