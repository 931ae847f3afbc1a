/// End-to-end tests for config file loading and CLI option merging.
///
/// These tests exercise the full flow from config file on disk through CLI invocation
/// to correct output, using `assert_cmd` and `tempfile` for isolated test environments.
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

/// Write a config file at the specified path.
fn write_config(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn mixed_graph() -> PathBuf {
    fixtures_path().join("graph_mixed.json")
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

// ============================================================================
// Config File Auto-Discovery Tests
// ============================================================================

mod auto_discovery_tests {
    use super::*;

    #[test]
    fn test_auto_discovery_applies_license_policy() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir.path().join("conan-mcp.config.yml"),
            "license_policy:\n  copyleft:\n    - AGPL-3.0-only\n",
        );

        // GPL-3.0-or-later is no longer copyleft, so readline becomes unrecognized
        let output = cargo_bin_cmd!("conan-mcp")
            .current_dir(dir.path())
            .arg("check-licenses")
            .arg(mixed_graph())
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        let summary = stdout_json(&output);
        assert_eq!(summary["non_compliant_packages"], serde_json::json!([]));
        assert_eq!(
            summary["unknown_licenses"],
            serde_json::json!(["readline/8.2", "libmystery/0.1"])
        );
    }

    #[test]
    fn test_no_config_uses_defaults() {
        let dir = TempDir::new().unwrap();

        let output = cargo_bin_cmd!("conan-mcp")
            .current_dir(dir.path())
            .arg("check-licenses")
            .arg(mixed_graph())
            .output()
            .unwrap();

        let summary = stdout_json(&output);
        assert_eq!(summary["non_compliant_packages"], serde_json::json!(["readline/8.2"]));
    }

    #[test]
    fn test_permissive_override_makes_graph_compliant() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir.path().join("conan-mcp.config.yml"),
            r#"
license_policy:
  permissive:
    - Apache-2.0
    - GPL-3.0-or-later
    - LicenseRef-Mystery
"#,
        );
        let graph = dir.path().join("graph.json");
        fs::write(
            &graph,
            r#"{"graph": {"nodes": {
                "1": {"ref": "openssl/3.2.0", "context": "host", "license": "Apache-2.0"},
                "2": {"ref": "readline/8.2", "context": "host", "license": "GPL-3.0-or-later"}
            }}}"#,
        )
        .unwrap();

        cargo_bin_cmd!("conan-mcp")
            .current_dir(dir.path())
            .arg("check-licenses")
            .arg(&graph)
            .assert()
            .code(0);
    }
}

// ============================================================================
// Explicit --config Tests
// ============================================================================

mod explicit_config_tests {
    use super::*;

    #[test]
    fn test_explicit_config_path() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("custom.yml");
        write_config(&config, "license_policy:\n  permissive: [Apache-2.0, GPL-3.0-or-later]\n");

        let output = cargo_bin_cmd!("conan-mcp")
            .args(["--config"])
            .arg(&config)
            .arg("check-licenses")
            .arg(mixed_graph())
            .output()
            .unwrap();

        let summary = stdout_json(&output);
        assert_eq!(
            summary["compliant_packages"],
            serde_json::json!(["openssl/3.2.0", "readline/8.2"])
        );
    }

    #[test]
    fn test_explicit_config_missing_file() {
        cargo_bin_cmd!("conan-mcp")
            .args(["--config", "/nonexistent/conan-mcp.config.yml", "check-licenses"])
            .arg(mixed_graph())
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Failed to read config file"));
    }

    #[test]
    fn test_invalid_yaml_is_application_error() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("bad.yml");
        write_config(&config, "timeouts: [[[broken");

        cargo_bin_cmd!("conan-mcp")
            .arg("--config")
            .arg(&config)
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Failed to parse config file"));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.yml");
        write_config(&config, "timeouts:\n  install: 0\n");

        cargo_bin_cmd!("conan-mcp")
            .arg("--config")
            .arg(&config)
            .assert()
            .code(3)
            .stderr(predicate::str::contains("timeouts.install must be greater than zero"));
    }

    #[test]
    fn test_unknown_field_is_warned_and_ignored() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.yml");
        write_config(&config, "colour: blue\n");

        cargo_bin_cmd!("conan-mcp")
            .arg("--config")
            .arg(&config)
            .arg("check-licenses")
            .arg(fixtures_path().join("graph_compliant.json"))
            .assert()
            .code(0)
            .stderr(predicate::str::contains("Unknown config field 'colour' will be ignored"));
    }
}

// ============================================================================
// conan_path Precedence Tests
// ============================================================================

#[cfg(unix)]
mod conan_path_tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn write_fake_conan(path: &Path, marker: &str) {
        fs::write(path, format!("#!/bin/sh\necho {}\n", marker)).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// Calls `list_conan_profiles` once and returns the tool's text output.
    fn profiles_output(cmd: &mut assert_cmd::Command) -> String {
        let request = r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"list_conan_profiles","arguments":{}}}"#;
        let output = cmd.write_stdin(format!("{}\n", request)).output().unwrap();
        assert!(output.status.success());

        let response: Value = serde_json::from_slice(&output.stdout).unwrap();
        response["result"]["content"][0]["text"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_conan_path_from_config_file() {
        let dir = TempDir::new().unwrap();
        let fake = dir.path().join("fake-conan");
        write_fake_conan(&fake, "from-config");
        write_config(
            &dir.path().join("conan-mcp.config.yml"),
            &format!("conan_path: {}\n", fake.display()),
        );

        let mut cmd = cargo_bin_cmd!("conan-mcp");
        cmd.current_dir(dir.path()).env_remove("CONAN_MCP_CONAN_PATH");
        assert_eq!(profiles_output(&mut cmd), "from-config\n");
    }

    #[test]
    fn test_cli_conan_path_overrides_config_file() {
        let dir = TempDir::new().unwrap();
        let from_config = dir.path().join("conan-a");
        let from_cli = dir.path().join("conan-b");
        write_fake_conan(&from_config, "from-config");
        write_fake_conan(&from_cli, "from-cli");
        write_config(
            &dir.path().join("conan-mcp.config.yml"),
            &format!("conan_path: {}\n", from_config.display()),
        );

        let mut cmd = cargo_bin_cmd!("conan-mcp");
        cmd.current_dir(dir.path()).arg("--conan-path").arg(&from_cli);
        assert_eq!(profiles_output(&mut cmd), "from-cli\n");
    }

    #[test]
    fn test_env_conan_path_overrides_config_file() {
        let dir = TempDir::new().unwrap();
        let from_config = dir.path().join("conan-a");
        let from_env = dir.path().join("conan-b");
        write_fake_conan(&from_config, "from-config");
        write_fake_conan(&from_env, "from-env");
        write_config(
            &dir.path().join("conan-mcp.config.yml"),
            &format!("conan_path: {}\n", from_config.display()),
        );

        let mut cmd = cargo_bin_cmd!("conan-mcp");
        cmd.current_dir(dir.path()).env("CONAN_MCP_CONAN_PATH", &from_env);
        assert_eq!(profiles_output(&mut cmd), "from-env\n");
    }
}
