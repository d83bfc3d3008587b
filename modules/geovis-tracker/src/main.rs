use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use geovis_common::{load_config, Config, ConfigOverrides, FileConfig, GeoVisError, DEFAULT_CONFIG_FILE};
use geovis_tracker::input::read_query_file;
use geovis_tracker::output::write_outcome;
use geovis_tracker::VisibilityPipeline;

/// Check how visible a domain is in OpenAI and Gemini answers.
#[derive(Parser, Debug)]
#[command(name = "geovis", version)]
struct Cli {
    /// Query list, one query per line.
    #[arg(short, long)]
    input: PathBuf,

    /// Write results as JSON here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Domain to look for.
    #[arg(short, long)]
    domain: Option<String>,

    /// User location, "City, Country".
    #[arg(short, long)]
    location: Option<String>,

    /// Answer language (ISO 639-1).
    #[arg(long)]
    language: Option<String>,

    /// Log full prompts and raw provider replies.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "info" };
    // stdout is reserved for the results document.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("geovis={level}").parse()?)
                .add_directive(format!("ai_client={level}").parse()?),
        )
        .init();

    let file_config = read_file_config(cli.config.as_deref())?;
    let overrides = ConfigOverrides {
        target_domain: cli.domain,
        user_location: cli.location,
        language: cli.language,
        debug: cli.debug,
        ..ConfigOverrides::default()
    };
    let config = Config::from_env(file_config, overrides)?;
    config.log_redacted();

    let rows = read_query_file(&cli.input, &config.query_rules)?;
    info!(rows = rows.len(), input = %cli.input.display(), "Loaded queries");

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current row");
            ctrl_c.cancel();
        }
    });

    let mut pipeline = VisibilityPipeline::from_config(Arc::new(config)).with_progress(
        |index, total, query| eprintln!("[{index}/{total}] {query}"),
    );
    let outcome = pipeline.run_with_cancel(&rows, &cancel).await;

    match &cli.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                GeoVisError::Output(format!("failed to write {}: {e}", path.display()))
            })?;
            write_outcome(&outcome, BufWriter::new(file))?;
            info!(output = %path.display(), "Results written");
        }
        None => write_outcome(&outcome, std::io::stdout().lock())?,
    }

    eprintln!("{}", outcome.stats);
    Ok(())
}

/// Explicit path must exist; the default file is optional.
fn read_file_config(path: Option<&Path>) -> Result<FileConfig> {
    match path {
        Some(path) => load_config(path),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                load_config(default)
            } else {
                Ok(FileConfig::default())
            }
        }
    }
}
