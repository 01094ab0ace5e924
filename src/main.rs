use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use gha_versioning::config::{self, LogConfig};
use gha_versioning::versioning::{GitHubActionsVersioning, VersioningApi, api};

#[derive(Parser)]
#[command(name = "gha-versioning")]
#[command(version, about = "Precision-aware version comparison for GitHub Actions tags")]
struct Cli {
    /// Path to a JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare two versions, printing -1, 0 or 1
    Compare { a: String, b: String },
    /// Print versions in ascending order
    Sort {
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Check whether a version carries no trailing qualifier
    Stable { tag: String },
    /// Check whether the input is a valid version or range
    Valid { input: String },
    /// Check whether a version may replace the current pin
    Compatible {
        tag: String,
        #[arg(long)]
        current: Option<String>,
    },
    /// Check whether a version satisfies a range
    Matches { tag: String, range: String },
    /// Print the highest (or lowest) version satisfying a range
    Satisfying {
        range: String,
        #[arg(required = true)]
        tags: Vec<String>,
        #[arg(long)]
        min: bool,
    },
    /// Print versioning scheme metadata
    Info,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let _guard = init_logging(&config.log)?;

    run(cli.command, &GitHubActionsVersioning::new())
}

/// Install the global subscriber. RUST_LOG takes precedence over the configured level.
///
/// The returned guard must be held until exit so buffered file logs are flushed.
fn init_logging(config: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .with_context(|| format!("Invalid log level: {}", config.level))?;

    let (writer, guard) = match &config.file {
        Some(path) => {
            let file_name = path
                .file_name()
                .with_context(|| format!("Invalid log file path: {}", path.display()))?;
            let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(config.file.is_none());
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to install logger: {e}"))?;

    Ok(guard)
}

fn run(command: Command, versioning: &impl VersioningApi) -> anyhow::Result<ExitCode> {
    match command {
        Command::Compare { a, b } => {
            let ordering = versioning.sort_versions(&a, &b)?;
            println!("{}", ordering as i8);
        }
        Command::Sort { mut tags } => {
            api::sort(versioning, &mut tags)?;
            for tag in tags {
                println!("{tag}");
            }
        }
        Command::Stable { tag } => println!("{}", versioning.is_stable(&tag)),
        Command::Valid { input } => println!("{}", versioning.is_valid(&input)),
        Command::Compatible { tag, current } => {
            println!("{}", versioning.is_compatible(&tag, current.as_deref()))
        }
        Command::Matches { tag, range } => println!("{}", versioning.matches(&tag, &range)),
        Command::Satisfying { range, tags, min } => {
            let found = if min {
                versioning.min_satisfying_version(&tags, &range)
            } else {
                versioning.get_satisfying_version(&tags, &range)
            };
            match found {
                Some(tag) => println!("{tag}"),
                None => {
                    eprintln!("No version satisfies {range}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Info => {
            println!("id: {}", versioning.id());
            println!("name: {}", versioning.display_name());
            println!("supports ranges: {}", versioning.supports_ranges());
        }
    }

    Ok(ExitCode::SUCCESS)
}
