//! Hotspot Viewer - Main entry point
//!
//! Opens a window with the interactive hotspot field, or with `--check`
//! resolves every hotspot's asset from disk and prints the outcome.

mod app;
mod check;
mod config;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "hotspot-viewer")]
#[command(about = "Interactive 3D hotspot field viewer")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "hotspots.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Asset root directory (overrides assets.root)
    #[arg(short, long)]
    assets: Option<PathBuf>,

    /// Resolve all hotspot assets headlessly and exit
    #[arg(long)]
    check: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Hotspot viewer v{}", env!("CARGO_PKG_VERSION"));

    let mut config = config::load_config(&args.config)?;

    if let Some(assets) = args.assets {
        config.assets.root = assets;
    }

    info!(
        hotspots = config.field.hotspots.len(),
        assets = %config.assets.root.display(),
        "Configuration loaded"
    );

    if args.check {
        check::run(&config)
    } else {
        app::run(config)
    }
}
