//! table-crawler main entry point
//!
//! This is the command-line interface for exporting API tables as linked data.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use table_crawler::config::{load_config_with_hash, validate, Config};
use table_crawler::crawler::{crawl, export_all_pages, ApiClient, Cancellation};
use table_crawler::output::{print_summary, FileArtifactWriter};
use table_crawler::OutputFormat;
use tracing_subscriber::EnvFilter;

/// table-crawler: export a table API as linked data
///
/// Starting from one table, table-crawler follows the `relatedTables` links
/// published by the API and writes every reachable table as a JSON-LD or
/// Turtle document.
#[derive(Parser, Debug)]
#[command(name = "table-crawler")]
#[command(version)]
#[command(about = "Export a table API as JSON-LD or Turtle", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a table and every table reachable through relatedTables
    Crawl {
        /// Table to start from; must be listed by the API root
        table: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Collect every page of a paginated endpoint into one artifact
    Pages {
        /// Endpoint path under the API base URL
        endpoint: String,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output format: "json-ld" or "ttl"
    #[arg(short, long)]
    format: Option<String>,

    /// API base URL (overrides the config file)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Directory to write artifacts into (overrides the config file)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Per-request timeout in seconds (overrides the config file)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("table_crawler=info,warn"),
            1 => EnvFilter::new("table_crawler=debug,info"),
            2 => EnvFilter::new("table_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let (target, output) = match &cli.command {
        Command::Crawl { table, output } => (table.as_str(), output),
        Command::Pages { endpoint, output } => (endpoint.as_str(), output),
    };

    // Input is validated before any network activity
    let format = OutputFormat::from_arg(output.format.as_deref())?;
    let config = load_effective_config(cli.config.as_deref(), output)?;

    let cancellation = Cancellation::new();
    let trigger = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling");
            trigger.cancel();
        }
    });

    match &cli.command {
        Command::Crawl { .. } => {
            handle_crawl(&config, target, format, cancellation, cli.quiet).await
        }
        Command::Pages { .. } => handle_pages(&config, target, format, cancellation).await,
    }
}

/// Loads the config file (if any) and layers command-line overrides on top
fn load_effective_config(path: Option<&Path>, overrides: &OutputArgs) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(base_url) = &overrides.base_url {
        config.api.base_url = base_url.clone();
    }
    if let Some(dir) = &overrides.output_dir {
        config.output.directory = dir.to_string_lossy().into_owned();
    }
    if let Some(timeout) = overrides.timeout {
        config.api.request_timeout_secs = timeout;
    }

    validate(&config)?;
    Ok(config)
}

/// Handles the `crawl` subcommand
async fn handle_crawl(
    config: &Config,
    table: &str,
    format: OutputFormat,
    cancellation: Cancellation,
    quiet: bool,
) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} from table {} into {}",
        config.api.base_url,
        table,
        config.output.directory
    );

    let summary = crawl(config, table, format, cancellation).await?;

    if !quiet {
        print_summary(&summary);
        println!("\nCrawling completed.");
    }
    Ok(())
}

/// Handles the `pages` subcommand
async fn handle_pages(
    config: &Config,
    endpoint: &str,
    format: OutputFormat,
    cancellation: Cancellation,
) -> anyhow::Result<()> {
    let client = ApiClient::new(config)?;
    let mut writer = FileArtifactWriter::new(&config.output.directory);

    let path = cancellation
        .guard(export_all_pages(&client, &mut writer, format, endpoint))
        .await?;

    tracing::info!("Pagination export written to {}", path.display());
    Ok(())
}
