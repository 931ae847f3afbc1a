use super::arguments::{conan_invocation, parse_arguments, push_optional, run_conan};
use crate::ports::inbound::{Tool, ToolContext, ToolError, ToolOutput};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileShowArguments {
    #[serde(default)]
    profile: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoArguments {}

/// `conan profile show --format=json [--profile P]`
#[derive(Debug, Default)]
pub struct GetProfileTool;

#[async_trait]
impl Tool for GetProfileTool {
    fn name(&self) -> &str {
        "get_conan_profile"
    }

    fn description(&self) -> &str {
        "Show the settings, options and configuration of a Conan profile. \
         Without a profile name the default profile is shown."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "profile": {
                    "type": "string",
                    "description": "Profile name. Omit for the default profile."
                }
            },
            "additionalProperties": false
        })
    }

    async fn call(&self, arguments: Value, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let args: ProfileShowArguments = parse_arguments(arguments)?;

        let mut argv = vec![
            "profile".to_string(),
            "show".to_string(),
            "--format=json".to_string(),
        ];
        push_optional(&mut argv, "--profile", args.profile.as_deref());

        let invocation = conan_invocation(ctx, argv, ctx.settings.timeouts.default);
        Ok(ToolOutput::text(run_conan(ctx, invocation).await?))
    }
}

/// `conan profile list --format=json`
#[derive(Debug, Default)]
pub struct ListProfilesTool;

#[async_trait]
impl Tool for ListProfilesTool {
    fn name(&self) -> &str {
        "list_conan_profiles"
    }

    fn description(&self) -> &str {
        "List the Conan profiles available on this machine."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        })
    }

    async fn call(&self, arguments: Value, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let _: NoArguments = parse_arguments(arguments)?;

        let argv = vec![
            "profile".to_string(),
            "list".to_string(),
            "--format=json".to_string(),
        ];
        let invocation = conan_invocation(ctx, argv, ctx.settings.timeouts.default);
        Ok(ToolOutput::text(run_conan(ctx, invocation).await?))
    }
}
