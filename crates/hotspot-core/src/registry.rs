//! Hotspot registry - the read-only set of hotspots a field is built from

use std::collections::HashMap;
use thiserror::Error;

use crate::hotspot::{Hotspot, IconKind};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Hotspot id must not be empty")]
    EmptyId,
    #[error("Duplicate hotspot id: {0}")]
    DuplicateId(String),
}

/// Immutable collection of hotspots, kept in configuration order
#[derive(Debug, Clone, Default)]
pub struct HotspotRegistry {
    hotspots: Vec<Hotspot>,
    index: HashMap<String, usize>,
}

impl HotspotRegistry {
    /// Build a registry, rejecting empty or duplicate ids
    pub fn new(hotspots: Vec<Hotspot>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(hotspots.len());
        for (i, hotspot) in hotspots.iter().enumerate() {
            if hotspot.id.trim().is_empty() {
                return Err(RegistryError::EmptyId);
            }
            if index.insert(hotspot.id.clone(), i).is_some() {
                return Err(RegistryError::DuplicateId(hotspot.id.clone()));
            }
        }
        Ok(Self { hotspots, index })
    }

    /// The three practice hotspots shown on the portfolio hero
    pub fn portfolio() -> Self {
        let hotspots = default_hotspots();
        let index = hotspots
            .iter()
            .enumerate()
            .map(|(i, h)| (h.id.clone(), i))
            .collect();
        Self { hotspots, index }
    }

    pub fn get(&self, id: &str) -> Option<&Hotspot> {
        self.index.get(id).map(|&i| &self.hotspots[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hotspot> {
        self.hotspots.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.hotspots.iter().map(|h| h.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.hotspots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hotspots.is_empty()
    }
}

/// Default hotspot set used when no configuration file provides one
pub fn default_hotspots() -> Vec<Hotspot> {
    let entry = |id: &str, position: [f32; 3], title: &str, description: &str, icon: IconKind| {
        let hotspot = Hotspot::new(id, position, icon).with_text(title, description);
        match icon.default_model_path() {
            Some(path) => hotspot.with_asset(path),
            None => hotspot,
        }
    };

    vec![
        entry(
            "panchakarma",
            [0.9, 0.1, 0.05],
            "Panchakarma",
            "Personalized detox protocols: Vamana, Virechana, Basti, Nasya. Typical course length, expected outcomes, and pre/post care.",
            IconKind::Mortar,
        ),
        entry(
            "herbal",
            [-0.9, 0.05, 0.08],
            "Herbal Medicine",
            "Custom formulations, sourcing policy, safety notes, and common formulations for digestion and immunity.",
            IconKind::Leaf,
        ),
        entry(
            "lifestyle",
            [0.0, 0.9, 0.0],
            "Lifestyle & Diet",
            "Dinacharya routines, seasonal adjustments, dietary tips and brief sample meal plans.",
            IconKind::Calendar,
        ),
    ]
}
