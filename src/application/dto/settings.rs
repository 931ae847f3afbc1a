use crate::license_compliance::policies::LicensePolicy;
use std::time::Duration;

/// Timeouts for the three classes of package-manager calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolTimeouts {
    /// search, list, profile show/list, new
    pub default: Duration,
    /// `graph info`, used by the license check
    pub graph_info: Duration,
    /// `install`, which may build packages from source
    pub install: Duration,
}

impl Default for ToolTimeouts {
    fn default() -> Self {
        Self {
            default: Duration::from_secs(30),
            graph_info: Duration::from_secs(90),
            install: Duration::from_secs(600),
        }
    }
}

/// Settings - Resolved runtime settings shared by every tool call
///
/// Built once at startup from defaults, the config file and CLI flags.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Package-manager executable name or path
    pub conan_path: String,
    pub timeouts: ToolTimeouts,
    pub license_policy: LicensePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            conan_path: "conan".to_string(),
            timeouts: ToolTimeouts::default(),
            license_policy: LicensePolicy::default(),
        }
    }
}

impl Settings {
    pub fn with_conan_path(mut self, conan_path: impl Into<String>) -> Self {
        self.conan_path = conan_path.into();
        self
    }
}
