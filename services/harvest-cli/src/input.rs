//! Reading harvest requests and writing harvested records.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use harvester::{HarvestRecord, HarvestRequest};

/// Serialization format of the harvested records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// Load a request from a `.json` file, or YAML for any other extension.
pub fn load_request(path: &Path) -> Result<HarvestRequest> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read harvest request {}", path.display()))?;

    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let request = if is_json {
        serde_json::from_str(&text)
            .with_context(|| format!("invalid JSON request in {}", path.display()))?
    } else {
        serde_yaml::from_str(&text)
            .with_context(|| format!("invalid YAML request in {}", path.display()))?
    };
    Ok(request)
}

pub fn write_records<W: Write>(
    mut out: W,
    records: &[HarvestRecord],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, records)?;
            writeln!(out)?;
        }
        OutputFormat::Yaml => serde_yaml::to_writer(&mut out, records)?,
    }
    Ok(())
}
