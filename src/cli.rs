use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::application::dto::ReportFormat;
use crate::license_compliance::domain::Context;

/// Expose the Conan package manager as MCP tools over stdio
#[derive(Parser, Debug)]
#[command(name = "conan-mcp")]
#[command(version)]
#[command(
    about = "Expose the Conan package manager as MCP tools over stdio",
    long_about = "Runs a Model Context Protocol server on stdin/stdout that exposes \
                  Conan search, list, install, profile, project scaffolding and \
                  dependency-license auditing as tools. Logs go to stderr."
)]
pub struct Args {
    /// Path to a conan-mcp.config.yml file (defaults to ./conan-mcp.config.yml if present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Conan executable to run (overrides the config file)
    #[arg(long, global = true, env = "CONAN_MCP_CONAN_PATH", value_name = "PATH")]
    pub conan_path: Option<String>,

    /// Log level used when RUST_LOG is not set: error, warn, info, debug or trace
    #[arg(long, global = true, default_value = "info", value_name = "LEVEL")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the MCP server on stdin/stdout (default)
    Serve,

    /// Classify the licenses of a saved `conan graph info --format=json` document
    CheckLicenses(CheckLicensesArgs),
}

#[derive(ClapArgs, Debug)]
pub struct CheckLicensesArgs {
    /// Graph document produced by `conan graph info <path> --format=json`
    #[arg(value_name = "GRAPH_JSON")]
    pub graph: PathBuf,

    /// Dependency context to audit: host or build
    #[arg(long, default_value = "host")]
    pub context: Context,

    /// Also classify the root (consumer) node
    #[arg(long)]
    pub include_root: bool,

    /// Output format: json or markdown
    #[arg(short, long, default_value = "json")]
    pub format: ReportFormat,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
