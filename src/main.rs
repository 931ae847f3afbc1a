use conan_mcp::adapters::inbound::McpServer;
use conan_mcp::adapters::outbound::{FileSystemGraphReader, TokioCommandRunner};
use conan_mcp::application::dto::{AuditRequest, Settings};
use conan_mcp::application::factories::FormatterFactory;
use conan_mcp::application::tools::ToolRegistry;
use conan_mcp::application::use_cases::AuditLicensesUseCase;
use conan_mcp::cli::{Args, CheckLicensesArgs, Command};
use conan_mcp::config::{discover_config, load_config_from_path, resolve_settings, ConfigFile};
use conan_mcp::license_compliance::domain::ComplianceSummary;
use conan_mcp::license_compliance::services::LicenseClassifier;
use conan_mcp::ports::inbound::ToolContext;
use conan_mcp::shared::error::ExitCode;
use conan_mcp::shared::Result;
use owo_colors::OwoColorize;
use std::io::{IsTerminal, Write};
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() {
    // clap reports its own errors and exits with code 2
    let args = Args::parse_args();
    init_tracing(&args.log_level);

    match run(args) {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

/// Logs always go to stderr; stdout carries protocol traffic or the report.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<ExitCode> {
    let config = load_config(&args)?;
    let settings = resolve_settings(config.as_ref(), args.conan_path.as_deref());

    match args.command {
        None | Some(Command::Serve) => serve(settings),
        Some(Command::CheckLicenses(check)) => check_licenses(check, settings),
    }
}

fn load_config(args: &Args) -> Result<Option<ConfigFile>> {
    match args.config {
        Some(ref path) => Ok(Some(load_config_from_path(path)?)),
        None => {
            let cwd = std::env::current_dir()?;
            discover_config(&cwd)
        }
    }
}

fn serve(settings: Settings) -> Result<ExitCode> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    tracing::info!(conan = %settings.conan_path, "Starting MCP server on stdio");

    let registry = ToolRegistry::with_builtin_tools();
    let context = ToolContext::new(Arc::new(TokioCommandRunner::new()), Arc::new(settings));
    runtime.block_on(McpServer::new(registry, context).serve_stdio())?;

    Ok(ExitCode::Success)
}

fn check_licenses(check: CheckLicensesArgs, settings: Settings) -> Result<ExitCode> {
    let use_case = AuditLicensesUseCase::new(
        FileSystemGraphReader::new(),
        LicenseClassifier::new(settings.license_policy),
    );
    let request = AuditRequest::new(check.graph, check.context, check.include_root);
    let summary = use_case.execute(request)?;

    let formatter = FormatterFactory::create(check.format);
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(formatter.format(&summary)?.as_bytes())?;
    stdout.flush()?;

    if std::io::stderr().is_terminal() {
        print_verdict(&summary);
    }

    Ok(if summary.all_compliant {
        ExitCode::Success
    } else {
        ExitCode::NonCompliant
    })
}

fn print_verdict(summary: &ComplianceSummary) {
    if summary.all_compliant {
        eprintln!(
            "{} {} of {} packages compliant",
            "✔".green(),
            summary.compliant_packages.len(),
            summary.total_packages
        );
    } else {
        eprintln!(
            "{} {} non-compliant, {} with unknown license",
            "✘".red().bold(),
            summary.non_compliant_packages.len(),
            summary.unknown_licenses.len()
        );
    }
}
