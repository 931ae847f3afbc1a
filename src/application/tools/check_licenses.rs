use super::arguments::{conan_invocation, parse_arguments, push_optional, require_non_empty, run_conan};
use crate::license_compliance::domain::Context;
use crate::license_compliance::services::LicenseClassifier;
use crate::ports::inbound::{Tool, ToolContext, ToolError, ToolOutput};
use crate::shared::paths::resolve_in_work_dir;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;

fn default_context() -> String {
    "host".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CheckLicensesArguments {
    path: String,
    #[serde(default)]
    work_dir: Option<PathBuf>,
    #[serde(default)]
    remote: Option<String>,
    #[serde(default)]
    build_profile: Option<String>,
    #[serde(default)]
    host_profile: Option<String>,
    #[serde(default = "default_context")]
    context: String,
}

/// Audits dependency licenses of a project via `conan graph info`.
///
/// The root node (the project itself) is excluded from the summary.
#[derive(Debug, Default)]
pub struct CheckLicensesTool;

impl CheckLicensesTool {
    fn build_args(args: &CheckLicensesArguments) -> Vec<String> {
        let target = resolve_in_work_dir(args.work_dir.as_deref(), args.path.trim());
        let mut argv = vec![
            "graph".to_string(),
            "info".to_string(),
            target.to_string_lossy().into_owned(),
            "--format=json".to_string(),
        ];
        push_optional(&mut argv, "--remote", args.remote.as_deref());
        push_optional(&mut argv, "-pr:b", args.build_profile.as_deref());
        push_optional(&mut argv, "-pr:h", args.host_profile.as_deref());
        argv
    }
}

#[async_trait]
impl Tool for CheckLicensesTool {
    fn name(&self) -> &str {
        "check_conan_dependencies_licenses"
    }

    fn description(&self) -> &str {
        "Collect the licenses of every dependency of a Conan project and check them \
         for commercial compliance. Permissive licenses (MIT, Apache-2.0, BSD, Zlib, BSL) \
         are compliant, copyleft licenses (GPL, AGPL) need review, anything else is unknown."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to conanfile.py or conanfile.txt, relative to work_dir when given"
                },
                "work_dir": {"type": "string", "description": "Project directory"},
                "remote": {"type": "string", "description": "Remote to resolve packages from"},
                "build_profile": {"type": "string", "description": "Profile for the build context"},
                "host_profile": {"type": "string", "description": "Profile for the host context"},
                "context": {
                    "type": "string",
                    "enum": ["host", "build"],
                    "description": "Which dependencies to audit: linked (host) or tools (build)",
                    "default": "host"
                }
            },
            "required": ["path"],
            "additionalProperties": false
        })
    }

    async fn call(&self, arguments: Value, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let args: CheckLicensesArguments = parse_arguments(arguments)?;
        require_non_empty("path", &args.path)?;
        let context: Context = args.context.parse().map_err(ToolError::InvalidArguments)?;

        let invocation = conan_invocation(ctx, Self::build_args(&args), ctx.settings.timeouts.graph_info);
        let stdout = run_conan(ctx, invocation).await?;

        let document: Value =
            serde_json::from_str(&stdout).map_err(|e| ToolError::InvalidOutput(e.to_string()))?;

        let classifier = LicenseClassifier::new(ctx.settings.license_policy.clone());
        let summary = classifier.classify_document(document, context, false)?;

        tracing::info!(
            total = summary.total_packages,
            non_compliant = summary.non_compliant_packages.len(),
            unknown = summary.unknown_licenses.len(),
            "license check finished"
        );

        let rendered = summary
            .to_json_pretty()
            .map_err(|e| ToolError::InvalidOutput(e.to_string()))?;
        Ok(ToolOutput::text(rendered))
    }
}
