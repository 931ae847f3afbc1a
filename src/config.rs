//! Configuration file support for conan-mcp.
//!
//! Provides YAML-based configuration through `conan-mcp.config.yml` files,
//! including data structures, file loading, validation, and resolution
//! into runtime [`Settings`].

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::application::dto::{Settings, ToolTimeouts};
use crate::license_compliance::policies::LicensePolicy;
use crate::shared::error::ConanMcpError;
use crate::shared::security::read_regular_file;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "conan-mcp.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub conan_path: Option<String>,
    pub timeouts: Option<TimeoutsConfig>,
    pub license_policy: Option<LicensePolicyConfig>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Per-class timeouts in seconds.
#[derive(Debug, Deserialize, Default)]
pub struct TimeoutsConfig {
    pub default: Option<u64>,
    pub graph_info: Option<u64>,
    pub install: Option<u64>,
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Replacement license sets. Each list given replaces the built-in one.
#[derive(Debug, Deserialize, Default)]
pub struct LicensePolicyConfig {
    pub permissive: Option<Vec<String>>,
    pub copyleft: Option<Vec<String>>,
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content =
        read_regular_file(path, "config file").map_err(|e| ConanMcpError::ConfigReadError {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;

    let config: ConfigFile =
        serde_yaml_ng::from_str(&content).map_err(|e| ConanMcpError::ConfigParseError {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(ref conan_path) = config.conan_path {
        if conan_path.trim().is_empty() {
            return Err(ConanMcpError::InvalidConfig {
                message: "conan_path must not be empty".to_string(),
                hint: "Remove the entry to use `conan` from PATH".to_string(),
            }
            .into());
        }
    }

    if let Some(ref timeouts) = config.timeouts {
        for (name, value) in [
            ("default", timeouts.default),
            ("graph_info", timeouts.graph_info),
            ("install", timeouts.install),
        ] {
            if value == Some(0) {
                return Err(ConanMcpError::InvalidConfig {
                    message: format!("timeouts.{} must be greater than zero", name),
                    hint: "Remove the entry to use the default".to_string(),
                }
                .into());
            }
        }
    }

    if let Some(ref policy) = config.license_policy {
        for (name, list) in [
            ("permissive", &policy.permissive),
            ("copyleft", &policy.copyleft),
        ] {
            let Some(list) = list else { continue };
            if let Some(i) = list.iter().position(|id| id.trim().is_empty()) {
                return Err(ConanMcpError::InvalidConfig {
                    message: format!("license_policy.{}[{}] must not be empty", name, i),
                    hint: "Use license identifiers such as \"MIT\" or \"GPL-3.0-only\"".to_string(),
                }
                .into());
            }
        }
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    let nested = [
        (
            "timeouts.",
            config.timeouts.as_ref().map(|t| &t.unknown_fields),
        ),
        (
            "license_policy.",
            config.license_policy.as_ref().map(|p| &p.unknown_fields),
        ),
    ];

    let top_level = config.unknown_fields.keys().cloned();
    let nested = nested.into_iter().flat_map(|(prefix, fields)| {
        fields
            .into_iter()
            .flat_map(|f| f.keys())
            .map(move |key| format!("{}{}", prefix, key))
    });

    for key in top_level.chain(nested) {
        tracing::warn!("Unknown config field '{}' will be ignored", key);
    }
}

/// Resolves defaults, the optional config file and CLI overrides into [`Settings`].
///
/// Precedence: CLI flag > config file > built-in default.
pub fn resolve_settings(config: Option<&ConfigFile>, conan_path_override: Option<&str>) -> Settings {
    let defaults = Settings::default();
    let Some(config) = config else {
        return match conan_path_override {
            Some(path) => defaults.with_conan_path(path),
            None => defaults,
        };
    };

    let conan_path = conan_path_override
        .map(str::to_string)
        .or_else(|| config.conan_path.clone())
        .unwrap_or(defaults.conan_path);

    let timeouts = match config.timeouts {
        Some(ref t) => ToolTimeouts {
            default: t
                .default
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeouts.default),
            graph_info: t
                .graph_info
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeouts.graph_info),
            install: t
                .install
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeouts.install),
        },
        None => defaults.timeouts,
    };

    let license_policy = match config.license_policy {
        Some(ref p) => {
            let base = &defaults.license_policy;
            LicensePolicy::new(
                p.permissive
                    .clone()
                    .unwrap_or_else(|| base.permissive().iter().cloned().collect()),
                p.copyleft
                    .clone()
                    .unwrap_or_else(|| base.copyleft().iter().cloned().collect()),
            )
        }
        None => defaults.license_policy,
    };

    Settings {
        conan_path,
        timeouts,
        license_policy,
    }
}
