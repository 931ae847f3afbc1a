use super::arguments::{
    conan_invocation, parse_arguments, push_repeated, require_non_empty, run_conan, split_list,
};
use crate::ports::inbound::{Tool, ToolContext, ToolError, ToolOutput};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

fn default_version() -> String {
    "*".to_string()
}

fn default_remote() -> String {
    "*".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListArguments {
    name: String,
    #[serde(default = "default_version")]
    version: String,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    recipe_revision: Option<String>,
    #[serde(default)]
    package_id: Option<String>,
    #[serde(default)]
    package_revision: Option<String>,
    #[serde(default)]
    filter_settings: Option<String>,
    #[serde(default)]
    filter_options: Option<String>,
    #[serde(default = "default_remote")]
    remote: String,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ListArguments {
    /// Composes `name/version[@user/channel][#rrev][:pid][#prev]`.
    ///
    /// Filters and package revisions only apply to package binaries, so
    /// either one forces a package id, `*` when none was given.
    fn reference(&self, has_filters: bool) -> String {
        let mut reference = format!("{}/{}", self.name.trim(), self.version.trim());

        let user = non_blank(&self.user);
        let channel = non_blank(&self.channel);
        if user.is_some() || channel.is_some() {
            reference.push_str(&format!(
                "@{}/{}",
                user.unwrap_or("_"),
                channel.unwrap_or("_")
            ));
        }

        if let Some(rrev) = non_blank(&self.recipe_revision) {
            reference.push_str(&format!("#{}", rrev));
        }

        let package_revision = non_blank(&self.package_revision);
        let package_id = non_blank(&self.package_id)
            .or_else(|| (has_filters || package_revision.is_some()).then_some("*"));
        if let Some(pid) = package_id {
            reference.push_str(&format!(":{}", pid));
        }

        if let Some(prev) = package_revision {
            reference.push_str(&format!("#{}", prev));
        }

        reference
    }
}

/// `conan list <reference> --format=json --remote R [-fs S]... [-fo O]...`
#[derive(Debug, Default)]
pub struct ListPackagesTool;

impl ListPackagesTool {
    fn build_args(args: &ListArguments) -> Vec<String> {
        let settings = args
            .filter_settings
            .as_deref()
            .map(split_list)
            .unwrap_or_default();
        let options = args
            .filter_options
            .as_deref()
            .map(split_list)
            .unwrap_or_default();
        let has_filters = !settings.is_empty() || !options.is_empty();

        let remote = match args.remote.trim() {
            "" => "*".to_string(),
            remote => remote.to_string(),
        };

        let mut argv = vec![
            "list".to_string(),
            args.reference(has_filters),
            "--format=json".to_string(),
            "--remote".to_string(),
            remote,
        ];
        push_repeated(&mut argv, "-fs", &settings);
        push_repeated(&mut argv, "-fo", &options);
        argv
    }
}

#[async_trait]
impl Tool for ListPackagesTool {
    fn name(&self) -> &str {
        "list_conan_packages"
    }

    fn description(&self) -> &str {
        "List the available versions of Conan packages using a fine-grained query. \
         Supports version ranges, user/channel, recipe and package revisions, package ids, \
         and filtering binaries by settings or options. Only the name is required."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Library name or pattern: \"fmt\", \"fmt*\", \"*fmt*\""
                },
                "version": {
                    "type": "string",
                    "description": "Version or Conan 2 version range, e.g. \"[>=1.0 <2]\"",
                    "default": "*"
                },
                "user": {"type": "string", "description": "User name"},
                "channel": {"type": "string", "description": "Channel name"},
                "recipe_revision": {
                    "type": "string",
                    "description": "Recipe revision (rrev); \"latest\" or \"!latest\" accepted"
                },
                "package_id": {"type": "string", "description": "Package ID"},
                "package_revision": {
                    "type": "string",
                    "description": "Package revision (prev)"
                },
                "filter_settings": {
                    "type": "string",
                    "description": "Comma-separated settings filters, e.g. \"arch=armv8,os=Linux\""
                },
                "filter_options": {
                    "type": "string",
                    "description": "Comma-separated options filters, e.g. \"*:fPIC=True,*:shared=False\""
                },
                "remote": {
                    "type": "string",
                    "description": "Remote name. Omit to search all remotes.",
                    "default": "*"
                }
            },
            "required": ["name"],
            "additionalProperties": false
        })
    }

    async fn call(&self, arguments: Value, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let args: ListArguments = parse_arguments(arguments)?;
        require_non_empty("name", &args.name)?;

        let invocation = conan_invocation(ctx, Self::build_args(&args), ctx.settings.timeouts.default);
        let stdout = run_conan(ctx, invocation).await?;
        Ok(ToolOutput::text(stdout))
    }
}
