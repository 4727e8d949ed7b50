//! Hotspot Core - Registry, asset resolution, and interaction state
//!
//! This crate provides the engine-agnostic pieces of an interactive hotspot field:
//! - Hotspot definitions and the read-only registry built from configuration
//! - Asset resolution with a deterministic procedural fallback for every hotspot
//! - Hover/selection state and per-frame animation (bobbing, eased scale)
//! - `HotspotField`, which ties them together and produces per-frame output
//!   for whatever renderer draws the scene

pub mod animation;
pub mod asset;
pub mod config;
pub mod field;
pub mod hotspot;
pub mod interaction;
pub mod loader;
pub mod registry;

pub use animation::{AnimationSettings, DampingMode};
pub use asset::{
    AssetCache, AssetLoadFailure, AssetLoader, AssetResolver, FnLoader, LoadFuture, LoadState,
    Resolution, ResolvedVisual,
};
pub use config::{ConfigError, FieldConfig};
pub use field::{DetailPanel, HotspotField, HotspotFrame};
pub use hotspot::{Hotspot, IconKind, ProceduralShape};
pub use interaction::{AnimatedTransform, InteractionState, PointerEvent, PointerEventKind};
pub use loader::{FsAssetLoader, ModelBytes};
pub use registry::{HotspotRegistry, RegistryError};
