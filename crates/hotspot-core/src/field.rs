//! HotspotField - the per-instance owner of registry, resolver and interaction state
//!
//! A rendering framework drives the field with pointer events and one
//! `frame(elapsed)` call per rendered frame, and draws whatever the returned
//! `HotspotFrame`s describe.

use crate::animation::AnimationSettings;
use crate::asset::{AssetCache, AssetLoader, AssetResolver, Resolution, ResolvedVisual};
use crate::interaction::{InteractionState, PointerEvent, PointerEventKind};
use crate::registry::HotspotRegistry;

/// Everything needed to draw one hotspot this frame
#[derive(Debug, Clone, PartialEq)]
pub struct HotspotFrame<H> {
    pub id: String,
    /// `None` while the hotspot's asset is still loading
    pub visual: Option<ResolvedVisual<H>>,
    /// (x, animated y, z)
    pub position: [f32; 3],
    pub scale: f32,
    pub is_active: bool,
    pub is_hovered: bool,
}

/// Text of the active hotspot, for a detail panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPanel {
    pub id: String,
    pub title: String,
    pub description: String,
}

pub struct HotspotField<L: AssetLoader> {
    registry: HotspotRegistry,
    resolver: AssetResolver<L>,
    interaction: InteractionState,
}

impl<L: AssetLoader> HotspotField<L> {
    pub fn new(registry: HotspotRegistry, loader: L, settings: AnimationSettings) -> Self {
        Self::with_cache(registry, loader, settings, AssetCache::new())
    }

    /// Field whose loads are shared with every other holder of `cache`
    pub fn with_cache(
        registry: HotspotRegistry,
        loader: L,
        settings: AnimationSettings,
        cache: AssetCache<L::Handle>,
    ) -> Self {
        let interaction = InteractionState::new(&registry, settings);
        Self {
            registry,
            resolver: AssetResolver::with_cache(loader, cache),
            interaction,
        }
    }

    pub fn registry(&self) -> &HotspotRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &AssetResolver<L> {
        &self.resolver
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn pointer_event(&mut self, event: &PointerEvent) {
        self.interaction.apply(event);
    }

    pub fn on_pointer_enter(&mut self, id: &str) {
        self.interaction.on_pointer_enter(id);
    }

    pub fn on_pointer_leave(&mut self, id: &str) {
        self.interaction.on_pointer_leave(id);
    }

    pub fn click(&mut self, id: &str) {
        self.interaction
            .apply(&PointerEvent::new(id, PointerEventKind::Click));
    }

    pub fn activate(&mut self, id: &str) {
        self.interaction.activate(id);
    }

    pub fn deactivate(&mut self) {
        self.interaction.deactivate();
    }

    /// Current resolution for `id`; `None` for unknown ids
    pub fn resolve(&self, id: &str) -> Option<Resolution<L::Handle>> {
        self.registry.get(id).map(|h| self.resolver.resolve(h))
    }

    /// Drop a settled load for `id` so the next frame retries it
    pub fn invalidate(&self, id: &str) -> bool {
        self.registry
            .get(id)
            .map(|h| self.resolver.invalidate(h))
            .unwrap_or(false)
    }

    /// True when no hotspot is waiting on a load
    pub fn is_settled(&self) -> bool {
        self.registry
            .iter()
            .all(|h| !self.resolver.resolve(h).is_pending())
    }

    /// Advance every hotspot to `elapsed` seconds and describe what to draw
    pub fn frame(&mut self, elapsed: f32) -> Vec<HotspotFrame<L::Handle>> {
        let mut frames = Vec::with_capacity(self.registry.len());

        for hotspot in self.registry.iter() {
            let visual = self.resolver.resolve(hotspot).into_visual();
            let Some(transform) = self.interaction.tick(elapsed, &hotspot.id) else {
                continue;
            };

            frames.push(HotspotFrame {
                id: hotspot.id.clone(),
                visual,
                position: [hotspot.position[0], transform.y, hotspot.position[2]],
                scale: transform.scale,
                is_active: self.interaction.is_active(&hotspot.id),
                is_hovered: self.interaction.is_hovered(&hotspot.id),
            });
        }

        frames
    }

    pub fn detail_panel(&self) -> Option<DetailPanel> {
        let id = self.interaction.active_id()?;
        let hotspot = self.registry.get(id)?;
        Some(DetailPanel {
            id: hotspot.id.clone(),
            title: hotspot.title.clone(),
            description: hotspot.description.clone(),
        })
    }

    /// Report the detail panel once after each activation change
    ///
    /// The inner `None` means the panel should close.
    pub fn take_detail_change(&mut self) -> Option<Option<DetailPanel>> {
        if self.interaction.take_activation_change() {
            Some(self.detail_panel())
        } else {
            None
        }
    }
}
