//! suitex CLI — driving adapter for the suitex resolver.
//!
//! Subcommands:
//! - `resolve --platform-version X [--root DIR] [--config FILE | --manifest FILE] [--format text|json]`
//!   — print every suite with its files
//! - `check --platform-version X [...]` — validate that configuration loads and resolves

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use suitex::{ProjectFiles, Resolver, ResolverBuilder, SuiteError, SuiteResolver, TestSuitesConfig};
use tracing::{debug, Level};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "suitex")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Resolve PHPUnit test suites into files", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve every suite and print its files
    Resolve {
        #[command(flatten)]
        source: SourceArgs,

        /// Only print suites with this name
        #[arg(long)]
        suite: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Validate that the configuration loads and resolves
    Check {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Project root
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// PHPUnit configuration file, relative to the root (default: phpunit.xml, then phpunit.xml.dist)
    #[arg(long, conflicts_with = "manifest")]
    config: Option<PathBuf>,

    /// YAML/JSON suite manifest, relative to the root
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Platform version that version constraints are checked against
    #[arg(long, env = "SUITEX_PLATFORM_VERSION")]
    platform_version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Suite(#[from] SuiteError),
    #[error("cannot encode output: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("no suite named \"{0}\"")]
    UnknownSuite(String),
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.json, if cli.verbose { Level::DEBUG } else { Level::WARN });

    let result = match cli.command {
        Command::Resolve {
            source,
            suite,
            format,
        } => cmd_resolve(&source, suite.as_deref(), format),
        Command::Check { source } => cmd_check(&source),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_resolve(source: &SourceArgs, suite: Option<&str>, format: Format) -> Result<(), CliError> {
    let suites = build_resolver(source)?.resolve()?;
    let suites = select_suite(suites, suite)?;
    print!("{}", render(&suites, format)?);
    Ok(())
}

fn cmd_check(source: &SourceArgs) -> Result<(), CliError> {
    let suites = build_resolver(source)?.resolve()?;
    let files = suites.iter().map(|s| s.source.len()).sum::<usize>();
    println!("Configuration valid: {} suites, {files} files", suites.len());
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Resolver assembly (composition root)
// ═══════════════════════════════════════════════════════════════════════════════

fn build_resolver(source: &SourceArgs) -> Result<Resolver<ProjectFiles>, SuiteError> {
    let builder = ResolverBuilder::for_project(
        ProjectFiles::new(&source.root),
        source.platform_version.as_str(),
    );
    let builder = match (&source.manifest, &source.config) {
        (Some(manifest), _) => builder.using_manifest(manifest),
        (None, Some(config)) => builder.using_phpunit_file(config),
        (None, None) => builder.using_phpunit(),
    };
    debug!(root = %source.root.display(), "resolving suites");
    builder.build()
}

fn select_suite(suites: TestSuitesConfig, name: Option<&str>) -> Result<TestSuitesConfig, CliError> {
    let Some(name) = name else {
        return Ok(suites);
    };
    let selected: TestSuitesConfig = suites.into_iter().filter(|s| s.name == name).collect();
    if selected.is_empty() {
        return Err(CliError::UnknownSuite(name.to_string()));
    }
    Ok(selected)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Output
// ═══════════════════════════════════════════════════════════════════════════════

fn render(suites: &TestSuitesConfig, format: Format) -> Result<String, CliError> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(suites)? + "\n"),
        Format::Text => {
            let mut out = String::new();
            for suite in suites {
                out.push_str(&format!("{} ({} files)\n", suite.name, suite.source.len()));
                for path in suite.source.paths() {
                    out.push_str(&format!("  {path}\n"));
                }
            }
            Ok(out)
        }
    }
}

/// Initialise the global tracing subscriber.
///
/// `RUST_LOG` wins over `level` when set.
fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr).json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
            .ok();
    }
}
