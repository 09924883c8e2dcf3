//! BFG statistics harvester.
//!
//! Reads a harvest request (YAML or JSON), computes the requested
//! area-weighted statistics over the listed forecast files and prints one
//! record per variable and statistic.

mod input;

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use bfg_dataset::NetCdfOpener;
use clap::Parser;
use harvester::{HarvestConfig, HarvestSettings, Harvester};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use input::{load_request, write_records, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "bfg-harvest")]
#[command(about = "Area-weighted statistics from background-forecast files")]
struct Args {
    /// Harvest request file (.yaml or .json)
    #[arg(short, long)]
    config: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Write records to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Grid-geometry reference file
    #[arg(long, env = "HARVEST_GRIDCELL_AREA_PATH")]
    gridcell_area: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_json)?;

    let request = load_request(&args.config)?;
    let config = HarvestConfig::try_from(request)
        .with_context(|| format!("invalid harvest request {}", args.config.display()))?;

    let mut settings = HarvestSettings::from_env();
    if let Some(path) = args.gridcell_area {
        settings.gridcell_area_path = path;
    }
    info!(
        gridcell_area = %settings.gridcell_area_path.display(),
        "Loaded settings"
    );

    let harvester = Harvester::new(NetCdfOpener, settings);
    let records = harvester.harvest(&config).context("harvest failed")?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_records(BufWriter::new(file), &records, args.format)?;
            info!(path = %path.display(), records = records.len(), "Wrote records");
        }
        None => write_records(io::stdout().lock(), &records, args.format)?,
    }

    Ok(())
}

/// Logs go to stderr so stdout only carries records.
fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}
