//! Places-of-worship download pipeline.
//!
//! Queries the Overpass API for each configured area, normalizes the
//! elements into point features, deduplicates them, and appends one
//! GeoPackage layer per area.

mod codes;
mod config;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use katapult::dataset::DatasetWriter;
use katapult::models::{Area, AreaSelector};
use katapult::overpass::OverpassClient;
use katapult::pipeline;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "ingest")]
#[command(about = "Download places of worship into a GeoPackage")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, default_value = "katapult.toml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Katapult download pipeline");

    let config = Config::load_from_file(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;

    let areas = build_areas(&config)?;
    let client = OverpassClient::new(&config.global.overpass_url)?;
    let mut writer = DatasetWriter::create_or_open(&config.global.output)
        .with_context(|| format!("Failed to open {}", config.global.output.display()))?;

    if let Err(err) = pipeline::run(&areas, &client, &mut writer, &config.global.cache_dir) {
        if let Some(raw_body) = err.raw_body() {
            error!("offending response body: {}", raw_body);
        }
        return Err(err.into());
    }

    info!(
        "Wrote {} layers to {}",
        areas.len(),
        config.global.output.display()
    );

    Ok(())
}

/// Build area definitions from configuration, reading the municipality
/// code list where an area is defined as a union of municipalities.
fn build_areas(config: &Config) -> Result<Vec<Area>> {
    config
        .areas
        .iter()
        .map(|area| {
            let selector = match (&area.iso, &area.insee_csv) {
                (Some(code), None) => AreaSelector::Iso(code.clone()),
                (None, Some(path)) => AreaSelector::Insee(codes::load_insee_codes(path)?),
                _ => bail!("area '{}' has no usable selector", area.name),
            };
            Ok(Area::new(area.name.clone(), selector))
        })
        .collect()
}
