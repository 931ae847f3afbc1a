use crate::ports::inbound::{ToolContext, ToolError};
use crate::ports::outbound::CommandInvocation;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Deserializes tool arguments; a missing arguments object counts as `{}`.
pub fn parse_arguments<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Splits a comma-separated filter list, dropping blank entries.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Appends `flag value` once per value.
pub fn push_repeated(args: &mut Vec<String>, flag: &str, values: &[String]) {
    for value in values {
        args.push(flag.to_string());
        args.push(value.clone());
    }
}

/// Appends `flag value` when a non-blank value is present.
pub fn push_optional(args: &mut Vec<String>, flag: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        args.push(flag.to_string());
        args.push(value.to_string());
    }
}

/// Rejects blank required string arguments.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), ToolError> {
    if value.trim().is_empty() {
        return Err(ToolError::InvalidArguments(format!(
            "'{}' must not be empty",
            field
        )));
    }
    Ok(())
}

/// Builds a package-manager invocation using the configured executable.
pub fn conan_invocation(ctx: &ToolContext, args: Vec<String>, timeout: Duration) -> CommandInvocation {
    CommandInvocation::new(ctx.settings.conan_path.clone(), args).with_timeout(timeout)
}

/// Runs the invocation under the call's cancellation token.
pub async fn run_conan(ctx: &ToolContext, invocation: CommandInvocation) -> Result<String, ToolError> {
    Ok(ctx.runner.run(&invocation, &ctx.cancel).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Sample {
        name: String,
        #[serde(default)]
        remote: Option<String>,
    }

    #[test]
    fn test_parse_arguments() {
        let sample: Sample = parse_arguments(json!({"name": "fmt"})).unwrap();
        assert_eq!(sample.name, "fmt");
        assert!(sample.remote.is_none());
    }

    #[test]
    fn test_parse_arguments_reports_missing_field() {
        let err = parse_arguments::<Sample>(Value::Null).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(ref m) if m.contains("name")));
    }

    #[test]
    fn test_parse_arguments_rejects_unknown_field() {
        let err = parse_arguments::<Sample>(json!({"name": "fmt", "colour": "red"})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("arch=armv8, os=Linux,,"),
            vec!["arch=armv8".to_string(), "os=Linux".to_string()]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_push_helpers() {
        let mut args = Vec::new();
        push_optional(&mut args, "--remote", Some("conancenter"));
        push_optional(&mut args, "-pr:b", Some("  "));
        push_optional(&mut args, "-pr:h", None);
        push_repeated(&mut args, "-s", &["build_type=Release".to_string()]);
        assert_eq!(args, vec!["--remote", "conancenter", "-s", "build_type=Release"]);
    }

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("query", "zlib").is_ok());
        assert!(require_non_empty("query", " ").is_err());
    }
}
