use super::arguments::{conan_invocation, parse_arguments, require_non_empty, run_conan};
use crate::ports::inbound::{Tool, ToolContext, ToolError, ToolOutput};
use crate::shared::paths::normalize_lexically;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NewProjectArguments {
    template: String,
    name: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    requires: Vec<String>,
    #[serde(default)]
    work_dir: Option<PathBuf>,
    #[serde(default)]
    force: bool,
}

impl NewProjectArguments {
    fn requirements(&self) -> Vec<&str> {
        self.requires
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .collect()
    }

    fn output_dir(&self) -> Option<PathBuf> {
        self.work_dir.as_deref().map(normalize_lexically)
    }
}

/// Note appended to the output when requirements were injected into a template.
fn requirements_warning(requirements: &[&str]) -> String {
    format!(
        "WARNING: the generated recipe requires {}. \
         Verify that these versions exist in your remotes (for example with \
         list_conan_packages) before building.",
        requirements.join(", ")
    )
}

/// `conan new <template> -d name=N [-d version=V] [-d requires=R]... [--output DIR] [--force]`
#[derive(Debug, Default)]
pub struct NewProjectTool;

impl NewProjectTool {
    fn build_args(args: &NewProjectArguments) -> Vec<String> {
        let mut argv = vec![
            "new".to_string(),
            args.template.trim().to_string(),
            "-d".to_string(),
            format!("name={}", args.name.trim()),
        ];

        if let Some(version) = args.version.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            argv.push("-d".to_string());
            argv.push(format!("version={}", version));
        }

        for requirement in args.requirements() {
            argv.push("-d".to_string());
            argv.push(format!("requires={}", requirement));
        }

        if let Some(dir) = args.output_dir() {
            argv.push("--output".to_string());
            argv.push(dir.to_string_lossy().into_owned());
        }

        if args.force {
            argv.push("--force".to_string());
        }

        argv
    }
}

#[async_trait]
impl Tool for NewProjectTool {
    fn name(&self) -> &str {
        "conan_new"
    }

    fn description(&self) -> &str {
        "Create a new Conan project from a predefined template such as cmake_lib, \
         cmake_exe, header_lib, meson_lib or autotools_lib. Dependencies can be \
         injected into the generated recipe."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "template": {
                    "type": "string",
                    "description": "Template name, e.g. cmake_lib or cmake_exe"
                },
                "name": {"type": "string", "description": "Project name"},
                "version": {"type": "string", "description": "Project version"},
                "requires": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Requirements to add, e.g. [\"fmt/12.0.0\"]",
                    "default": []
                },
                "work_dir": {
                    "type": "string",
                    "description": "Directory to generate the project in; created if missing"
                },
                "force": {
                    "type": "boolean",
                    "description": "Overwrite existing files",
                    "default": false
                }
            },
            "required": ["template", "name"],
            "additionalProperties": false
        })
    }

    async fn call(&self, arguments: Value, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let args: NewProjectArguments = parse_arguments(arguments)?;
        require_non_empty("template", &args.template)?;
        require_non_empty("name", &args.name)?;

        if let Some(dir) = args.output_dir() {
            tokio::fs::create_dir_all(&dir).await.map_err(|e| {
                ToolError::Io(format!("cannot create {}: {}", dir.display(), e))
            })?;
        }

        let invocation = conan_invocation(ctx, Self::build_args(&args), ctx.settings.timeouts.default);
        let mut output = run_conan(ctx, invocation).await?;

        let requirements = args.requirements();
        if !requirements.is_empty() {
            tracing::debug!(requirements = ?requirements, "template generated with requirements");
            if !output.is_empty() && !output.ends_with('\n') {
                output.push('\n');
            }
            output.push('\n');
            output.push_str(&requirements_warning(&requirements));
        }

        Ok(ToolOutput::text(output))
    }
}
