use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use manifest_libs::config::Config;
use manifest_libs::file_types::ConfigFormat;
use manifest_libs::processor::{ConfigFile, ParseOutcome};
use manifest_libs::registry::Registry;
use manifest_libs::reports::{
    Report, generate_json_report, generate_markdown_report, generate_summary,
};
use manifest_libs::scan;

#[derive(Parser)]
#[command(name = "manifest-libs")]
#[command(about = "Extract declared libraries from dependency manifests", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML, or JSON when named `*.json`)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
    Summary,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a directory for manifests and extract their libraries
    Scan {
        /// Repository root to scan
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "summary")]
        output: OutputFormat,

        /// Owning project id attached to log events
        #[arg(long)]
        project_id: Option<String>,

        /// Exit with code 1 if any manifest fails to parse
        #[arg(long)]
        fail_on_errors: bool,
    },
    /// Parse a single manifest file
    Parse {
        /// Path to the manifest
        file: PathBuf,

        /// Format id; detected from the file name when omitted
        #[arg(short, long)]
        format: Option<ConfigFormat>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        output: OutputFormat,
    },
    /// List supported manifest formats in dispatch order
    Formats,
    /// Profile manifest parsing (for use with cargo-flamegraph)
    ProfileParse {
        /// Path to the manifest
        #[arg(short, long)]
        file: PathBuf,

        /// Format id; detected from the file name when omitted
        #[arg(long)]
        format: Option<ConfigFormat>,

        /// Number of iterations (for meaningful profiling)
        #[arg(short, long, default_value = "1000")]
        iterations: usize,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match load_config(cli.config.as_deref()) {
        Ok(config) => match cli.command {
            Commands::Scan {
                dir,
                output,
                project_id,
                fail_on_errors,
            } => run_scan(dir, output, project_id, fail_on_errors, config).await,
            Commands::Parse {
                file,
                format,
                output,
            } => run_parse(file, format, output, config).await,
            Commands::Formats => run_formats(&config),
            Commands::ProfileParse {
                file,
                format,
                iterations,
            } => run_profile_parse(file, format, iterations, config).await,
        },
        Err(e) => Err(e),
    };

    result.unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        ExitCode::FAILURE
    })
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    }
}

fn render(root: &str, outcomes: &[ParseOutcome], output: OutputFormat) -> anyhow::Result<String> {
    let report = Report::from_outcomes(outcomes);
    Ok(match output {
        OutputFormat::Json => {
            generate_json_report(&report).context("failed to serialize report")?
        }
        OutputFormat::Markdown => generate_markdown_report(root, &report),
        OutputFormat::Summary => generate_summary(&report),
    })
}

async fn run_scan(
    dir: PathBuf,
    output: OutputFormat,
    project_id: Option<String>,
    fail_on_errors: bool,
    mut config: Config,
) -> anyhow::Result<ExitCode> {
    anyhow::ensure!(dir.is_dir(), "{} is not a directory", dir.display());
    if project_id.is_some() {
        config.scan.project_id = project_id;
    }

    let start = Instant::now();
    let outcomes = scan::scan_directory(&dir, &config).await;
    tracing::info!(
        "Parsed {} manifests in {:?}",
        outcomes.len(),
        start.elapsed()
    );

    println!("{}", render(&dir.display().to_string(), &outcomes, output)?);

    if fail_on_errors && outcomes.iter().any(|outcome| !outcome.is_valid()) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

async fn run_parse(
    file: PathBuf,
    format: Option<ConfigFormat>,
    output: OutputFormat,
    config: Config,
) -> anyhow::Result<ExitCode> {
    let outcome = scan::parse_file(&file, format, &config)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?
        .with_context(|| format!("no manifest format matches {}", file.display()))?;

    let exit = if outcome.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    };
    let root = file.parent().map(|p| p.display().to_string()).unwrap_or_default();
    println!("{}", render(&root, &[outcome], output)?);
    Ok(exit)
}

fn run_formats(config: &Config) -> anyhow::Result<ExitCode> {
    let registry = Registry::with_config(config);

    println!(
        "{:<22} {:<11} {:<10} {:<20} multi-file",
        "id", "lang", "purl", "glob"
    );
    for format in registry.formats() {
        println!(
            "{:<22} {:<11} {:<10} {:<20} {}",
            format.id(),
            format.lang_name(),
            format.purl_type(),
            format.file_name_glob(),
            if format.supports_multiple_files() { "yes" } else { "no" }
        );
    }

    Ok(ExitCode::SUCCESS)
}

async fn run_profile_parse(
    file: PathBuf,
    format: Option<ConfigFormat>,
    iterations: usize,
    config: Config,
) -> anyhow::Result<ExitCode> {
    let raw = tokio::fs::read(&file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let path = file.to_string_lossy().replace('\\', "/");
    let format = format
        .or_else(|| Registry::with_config(&config).format_for_path(&path))
        .with_context(|| format!("no manifest format matches {}", file.display()))?;

    eprintln!("Profiling parse operations for: {} ({format})", file.display());
    eprintln!("Iterations: {iterations}");
    eprintln!("File size: {} bytes", raw.len());

    let start = Instant::now();

    for _ in 0..iterations {
        let config_file = ConfigFile::new(format, path.as_str(), &raw);
        std::hint::black_box(config_file.parse());
    }

    let elapsed = start.elapsed();
    eprintln!("\nProfiling complete!");
    eprintln!("Total time: {elapsed:?}");
    eprintln!(
        "Average per iteration: {:?}",
        elapsed / iterations.max(1) as u32
    );

    Ok(ExitCode::SUCCESS)
}
