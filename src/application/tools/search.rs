use super::arguments::{conan_invocation, parse_arguments, push_optional, require_non_empty, run_conan};
use crate::ports::inbound::{Tool, ToolContext, ToolError, ToolOutput};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SearchArguments {
    query: String,
    #[serde(default)]
    remote: Option<String>,
}

/// `conan search <query> --format=json [--remote R]`
#[derive(Debug, Default)]
pub struct SearchPackagesTool;

impl SearchPackagesTool {
    fn build_args(args: &SearchArguments) -> Vec<String> {
        let mut argv = vec![
            "search".to_string(),
            args.query.clone(),
            "--format=json".to_string(),
        ];
        push_optional(&mut argv, "--remote", args.remote.as_deref());
        argv
    }
}

#[async_trait]
impl Tool for SearchPackagesTool {
    fn name(&self) -> &str {
        "search_conan_packages"
    }

    fn description(&self) -> &str {
        "Search for Conan packages matching a name pattern across remotes. \
         Supports wildcards such as \"fmt/*\", \"boost\" or \"*ssl*\"."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search pattern for package names, wildcards allowed"
                },
                "remote": {
                    "type": "string",
                    "description": "Remote name. Omit to search all remotes."
                }
            },
            "required": ["query"],
            "additionalProperties": false
        })
    }

    async fn call(&self, arguments: Value, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let args: SearchArguments = parse_arguments(arguments)?;
        require_non_empty("query", &args.query)?;

        let invocation = conan_invocation(ctx, Self::build_args(&args), ctx.settings.timeouts.default);
        let stdout = run_conan(ctx, invocation).await?;
        Ok(ToolOutput::text(stdout))
    }
}
