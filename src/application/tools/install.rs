use super::arguments::{
    conan_invocation, parse_arguments, push_optional, push_repeated, require_non_empty, run_conan,
};
use crate::ports::inbound::{Tool, ToolContext, ToolError, ToolOutput};
use crate::shared::paths::resolve_in_work_dir;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InstallArguments {
    path: String,
    #[serde(default)]
    work_dir: Option<PathBuf>,
    #[serde(default)]
    remote: Option<String>,
    #[serde(default)]
    build_profile: Option<String>,
    #[serde(default)]
    host_profile: Option<String>,
    #[serde(default)]
    build_missing: bool,
    #[serde(default)]
    settings: Vec<String>,
    #[serde(default)]
    options: Vec<String>,
}

/// `conan install <path> --format=json [--remote R] [-pr:b B] [-pr:h H] [--build=missing] [-s S]... [-o O]...`
#[derive(Debug, Default)]
pub struct InstallPackagesTool;

impl InstallPackagesTool {
    fn build_args(args: &InstallArguments) -> Vec<String> {
        let target = resolve_in_work_dir(args.work_dir.as_deref(), args.path.trim());
        let mut argv = vec![
            "install".to_string(),
            target.to_string_lossy().into_owned(),
            "--format=json".to_string(),
        ];
        push_optional(&mut argv, "--remote", args.remote.as_deref());
        push_optional(&mut argv, "-pr:b", args.build_profile.as_deref());
        push_optional(&mut argv, "-pr:h", args.host_profile.as_deref());
        if args.build_missing {
            argv.push("--build=missing".to_string());
        }
        push_repeated(&mut argv, "-s", &args.settings);
        push_repeated(&mut argv, "-o", &args.options);
        argv
    }
}

#[async_trait]
impl Tool for InstallPackagesTool {
    fn name(&self) -> &str {
        "install_conan_packages"
    }

    fn description(&self) -> &str {
        "Install the dependencies of a conanfile.py or conanfile.txt. \
         Can build missing binaries from source, which may take several minutes."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the conanfile, relative to work_dir when given"
                },
                "work_dir": {"type": "string", "description": "Project directory"},
                "remote": {"type": "string", "description": "Remote to resolve packages from"},
                "build_profile": {"type": "string", "description": "Profile for the build context"},
                "host_profile": {"type": "string", "description": "Profile for the host context"},
                "build_missing": {
                    "type": "boolean",
                    "description": "Build packages from source when no binary is available",
                    "default": false
                },
                "settings": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Settings overrides, e.g. [\"build_type=Debug\"]",
                    "default": []
                },
                "options": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Options overrides, e.g. [\"*:shared=True\"]",
                    "default": []
                }
            },
            "required": ["path"],
            "additionalProperties": false
        })
    }

    async fn call(&self, arguments: Value, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let args: InstallArguments = parse_arguments(arguments)?;
        require_non_empty("path", &args.path)?;

        let invocation = conan_invocation(ctx, Self::build_args(&args), ctx.settings.timeouts.install);
        Ok(ToolOutput::text(run_conan(ctx, invocation).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_install() {
        let args: InstallArguments = parse_arguments(json!({"path": "."})).unwrap();
        assert_eq!(
            InstallPackagesTool::build_args(&args),
            vec!["install", ".", "--format=json"]
        );
    }

    #[test]
    fn test_full_install() {
        let args: InstallArguments = parse_arguments(json!({
            "path": "conanfile.py",
            "work_dir": "/home/user/project",
            "remote": "conancenter",
            "build_profile": "default",
            "host_profile": "armv8",
            "build_missing": true,
            "settings": ["build_type=Debug"],
            "options": ["*:shared=True", "fmt/*:header_only=True"]
        }))
        .unwrap();

        assert_eq!(
            InstallPackagesTool::build_args(&args),
            vec![
                "install",
                "/home/user/project/conanfile.py",
                "--format=json",
                "--remote",
                "conancenter",
                "-pr:b",
                "default",
                "-pr:h",
                "armv8",
                "--build=missing",
                "-s",
                "build_type=Debug",
                "-o",
                "*:shared=True",
                "-o",
                "fmt/*:header_only=True"
            ]
        );
    }
}
