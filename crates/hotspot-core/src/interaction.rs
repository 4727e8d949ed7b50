//! Hover/selection state and per-hotspot animated transforms
//!
//! Hovered and active are independent flags. Either one raises the scale
//! target to `hover_scale`; only the active hotspot drives the detail panel.
//! At most one hotspot is active at a time.

use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::animation::{ease_toward, AnimationSettings};
use crate::registry::HotspotRegistry;

/// Animated values for one hotspot, updated by `InteractionState::tick`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedTransform {
    pub base_y: f32,
    pub y: f32,
    pub scale: f32,
    last_elapsed: Option<f32>,
}

impl AnimatedTransform {
    fn new(base_y: f32, scale: f32) -> Self {
        Self {
            base_y,
            y: base_y,
            scale,
            last_elapsed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Enter,
    Leave,
    Click,
}

/// Pointer input from the rendering framework, addressed by hotspot id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerEvent {
    pub id: String,
    pub kind: PointerEventKind,
}

impl PointerEvent {
    pub fn new(id: impl Into<String>, kind: PointerEventKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

/// Selection and animation state, exclusively owned by one field
#[derive(Debug, Clone)]
pub struct InteractionState {
    settings: AnimationSettings,
    hovered: HashSet<String>,
    active: Option<String>,
    transforms: HashMap<String, AnimatedTransform>,
    activation_changed: bool,
}

impl InteractionState {
    pub fn new(registry: &HotspotRegistry, settings: AnimationSettings) -> Self {
        let transforms = registry
            .iter()
            .map(|h| {
                (
                    h.id.clone(),
                    AnimatedTransform::new(h.base_y(), settings.initial_scale),
                )
            })
            .collect();

        Self {
            settings,
            hovered: HashSet::new(),
            active: None,
            transforms,
            activation_changed: false,
        }
    }

    pub fn settings(&self) -> &AnimationSettings {
        &self.settings
    }

    pub fn on_pointer_enter(&mut self, id: &str) {
        if self.transforms.contains_key(id) {
            self.hovered.insert(id.to_string());
        }
    }

    pub fn on_pointer_leave(&mut self, id: &str) {
        self.hovered.remove(id);
    }

    /// Make `id` the active hotspot, replacing any previous one
    pub fn activate(&mut self, id: &str) {
        if !self.transforms.contains_key(id) {
            return;
        }
        if self.active.as_deref() == Some(id) {
            return;
        }
        debug!(previous = ?self.active, id = %id, "Hotspot activated");
        self.active = Some(id.to_string());
        self.activation_changed = true;
    }

    pub fn deactivate(&mut self) {
        if let Some(previous) = self.active.take() {
            debug!(previous = %previous, "Hotspot deactivated");
            self.activation_changed = true;
        }
    }

    /// Route a framework pointer event to the matching operation
    pub fn apply(&mut self, event: &PointerEvent) {
        match event.kind {
            PointerEventKind::Enter => self.on_pointer_enter(&event.id),
            PointerEventKind::Leave => self.on_pointer_leave(&event.id),
            PointerEventKind::Click => self.activate(&event.id),
        }
    }

    /// Advance the animated transform of `id` to `elapsed` seconds
    pub fn tick(&mut self, elapsed: f32, id: &str) -> Option<AnimatedTransform> {
        let target = self.target_scale(id);
        let settings = &self.settings;
        let transform = self.transforms.get_mut(id)?;

        let dt = transform.last_elapsed.map(|last| elapsed - last);
        let factor = settings.damping_mode.factor(settings.damping, dt);

        transform.y = settings.bob_y(transform.base_y, elapsed);
        transform.scale = ease_toward(transform.scale, target, factor);
        transform.last_elapsed = Some(elapsed);

        Some(*transform)
    }

    pub fn is_hovered(&self, id: &str) -> bool {
        self.hovered.contains(id)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.as_deref() == Some(id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn hovered_ids(&self) -> impl Iterator<Item = &str> {
        self.hovered.iter().map(String::as_str)
    }

    pub fn transform(&self, id: &str) -> Option<&AnimatedTransform> {
        self.transforms.get(id)
    }

    pub fn target_scale(&self, id: &str) -> f32 {
        self.settings
            .target_scale(self.is_hovered(id) || self.is_active(id))
    }

    /// True once after each change of the active hotspot
    pub fn take_activation_change(&mut self) -> bool {
        std::mem::take(&mut self.activation_changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::DampingMode;

    fn state() -> InteractionState {
        InteractionState::new(&HotspotRegistry::portfolio(), AnimationSettings::default())
    }

    fn active_count(state: &InteractionState) -> usize {
        ["panchakarma", "herbal", "lifestyle"]
            .iter()
            .filter(|id| state.is_active(id))
            .count()
    }

    #[test]
    fn test_activate_replaces_previous() {
        let mut state = state();
        state.activate("panchakarma");
        assert!(state.is_active("panchakarma"));

        state.activate("herbal");
        assert_eq!(state.active_id(), Some("herbal"));
        assert!(!state.is_active("panchakarma"));
        assert_eq!(active_count(&state), 1);
    }

    #[test]
    fn test_at_most_one_active_for_any_sequence() {
        let mut state = state();
        assert_eq!(active_count(&state), 0);
        for id in ["herbal", "lifestyle", "herbal", "missing", "panchakarma", "panchakarma"] {
            state.activate(id);
            assert!(active_count(&state) <= 1);
        }
        assert_eq!(state.active_id(), Some("panchakarma"));

        state.deactivate();
        assert_eq!(active_count(&state), 0);
    }

    #[test]
    fn test_hover_is_idempotent() {
        let mut once = state();
        once.on_pointer_enter("herbal");

        let mut twice = state();
        twice.on_pointer_enter("herbal");
        twice.on_pointer_enter("herbal");

        assert_eq!(once.hovered_ids().count(), twice.hovered_ids().count());
        assert!(twice.is_hovered("herbal"));

        twice.on_pointer_leave("herbal");
        twice.on_pointer_leave("herbal");
        assert!(!twice.is_hovered("herbal"));
        assert_eq!(twice.hovered_ids().count(), 0);
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let mut state = state();
        state.on_pointer_enter("nope");
        state.activate("nope");
        state.on_pointer_leave("nope");

        assert_eq!(state.hovered_ids().count(), 0);
        assert!(state.active_id().is_none());
        assert!(!state.take_activation_change());
        assert!(state.tick(1.0, "nope").is_none());
    }

    #[test]
    fn test_hover_and_active_share_scale_target() {
        let mut state = state();
        assert_eq!(state.target_scale("herbal"), 0.95);

        state.on_pointer_enter("herbal");
        assert_eq!(state.target_scale("herbal"), 1.15);

        state.on_pointer_leave("herbal");
        state.activate("herbal");
        assert_eq!(state.target_scale("herbal"), 1.15);
        assert!(!state.is_hovered("herbal"));
    }

    #[test]
    fn test_scale_converges_without_overshoot() {
        let mut state = state();
        state.on_pointer_enter("lifestyle");

        let target = 1.15;
        let mut previous = state.transform("lifestyle").unwrap().scale;
        for frame in 0..40 {
            let scale = state.tick(frame as f32 / 60.0, "lifestyle").unwrap().scale;
            assert!(scale >= previous, "frame {} went backwards", frame);
            assert!(scale <= target, "frame {} overshot: {}", frame, scale);
            previous = scale;
        }
        assert!((target - previous).abs() < 0.01);

        // Shrinks back toward idle the same way
        state.on_pointer_leave("lifestyle");
        for frame in 40..80 {
            let scale = state.tick(frame as f32 / 60.0, "lifestyle").unwrap().scale;
            assert!(scale <= previous);
            assert!(scale >= 0.95);
            previous = scale;
        }
        assert!((previous - 0.95).abs() < 0.01);
    }

    #[test]
    fn test_bob_is_independent_of_selection() {
        let mut idle = state();
        let mut hovered = state();
        hovered.on_pointer_enter("panchakarma");
        hovered.activate("panchakarma");

        let period = AnimationSettings::default().bob_period();
        let a = idle.tick(0.8, "panchakarma").unwrap().y;
        let b = hovered.tick(0.8, "panchakarma").unwrap().y;
        let c = idle.tick(0.8 + period, "panchakarma").unwrap().y;
        assert_eq!(a, b);
        assert!((a - c).abs() < 1e-4);
        assert!((a - 0.1).abs() <= 0.02 + 1e-6);
    }

    #[test]
    fn test_time_normalized_scale_is_rate_independent() {
        let settings = AnimationSettings {
            damping_mode: DampingMode::TimeNormalized { reference_fps: 60.0 },
            ..AnimationSettings::default()
        };
        let registry = HotspotRegistry::portfolio();
        let mut fast = InteractionState::new(&registry, settings.clone());
        let mut slow = InteractionState::new(&registry, settings);
        fast.on_pointer_enter("herbal");
        slow.on_pointer_enter("herbal");

        // Same first tick at t=0, then one second of frames at 120 and 30 fps
        for i in 0..=120 {
            fast.tick(i as f32 / 120.0, "herbal");
        }
        for i in 0..=30 {
            slow.tick(i as f32 / 30.0, "herbal");
        }

        let a = fast.transform("herbal").unwrap().scale;
        let b = slow.transform("herbal").unwrap().scale;
        assert!((a - b).abs() < 1e-3, "fast={} slow={}", a, b);
    }

    #[test]
    fn test_pointer_events_and_activation_change() {
        let mut state = state();
        state.apply(&PointerEvent::new("herbal", PointerEventKind::Enter));
        assert!(state.is_hovered("herbal"));
        assert!(!state.take_activation_change());

        state.apply(&PointerEvent::new("herbal", PointerEventKind::Click));
        assert!(state.is_active("herbal"));
        assert!(state.take_activation_change());
        assert!(!state.take_activation_change());

        // Re-clicking the active hotspot is not a change
        state.apply(&PointerEvent::new("herbal", PointerEventKind::Click));
        assert!(!state.take_activation_change());

        state.apply(&PointerEvent::new("herbal", PointerEventKind::Leave));
        assert!(!state.is_hovered("herbal"));
        assert!(state.is_active("herbal"));
    }
}
