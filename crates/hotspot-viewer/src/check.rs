//! Headless check - resolve every hotspot from disk and report the result

use anyhow::Result;
use hotspot_core::{FsAssetLoader, HotspotField, HotspotFrame, ModelBytes, ResolvedVisual};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::config::Config;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Drive a field until every hotspot settles or the timeout passes
pub fn resolve_all(config: &Config, timeout: Duration) -> Result<Vec<HotspotFrame<ModelBytes>>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let registry = config.field.registry()?;
    let loader = FsAssetLoader::new(&config.assets.root, runtime.handle().clone());
    let mut field = HotspotField::new(registry, loader, config.field.animation.clone());

    let started = Instant::now();
    let mut frames = field.frame(0.0);
    while frames.iter().any(|f| f.visual.is_none()) {
        if started.elapsed() >= timeout {
            warn!(
                timeout_secs = timeout.as_secs_f32(),
                "Timed out waiting for asset loads"
            );
            break;
        }
        std::thread::sleep(POLL_INTERVAL);
        frames = field.frame(started.elapsed().as_secs_f32());
    }

    info!(elapsed_ms = started.elapsed().as_millis() as u64, "Hotspots resolved");
    Ok(frames)
}

pub fn describe(visual: Option<&ResolvedVisual<ModelBytes>>) -> String {
    match visual {
        None => "pending".to_string(),
        Some(ResolvedVisual::LoadedAsset(model)) => {
            format!("model {} ({} bytes)", model.asset_ref, model.len())
        }
        Some(ResolvedVisual::Procedural(shape)) => format!("procedural {}", shape),
    }
}

pub fn run(config: &Config) -> Result<()> {
    info!(root = %config.assets.root.display(), "Checking hotspot assets");
    let frames = resolve_all(config, CHECK_TIMEOUT)?;

    println!("Resolved {} hotspots:", frames.len());
    for frame in &frames {
        println!("  - {}: {}", frame.id, describe(frame.visual.as_ref()));
    }
    Ok(())
}
