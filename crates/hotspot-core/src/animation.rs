//! Animation parameters and the per-frame math behind hotspot motion
//!
//! Two motions are applied to every hotspot:
//! - a vertical bob, purely a function of elapsed time
//! - a scale that eases toward a target chosen by hover/selection state
//!
//! The scale ease is a first-order low-pass filter applied once per tick.
//! With `DampingMode::PerTick` the filter runs with a fixed factor, so the
//! wall-clock convergence speed depends on how often `tick` is called.
//! `DampingMode::TimeNormalized` rescales the factor by the time between
//! ticks so that the ease looks the same at any frame rate.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// How the damping factor relates to frame timing
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DampingMode {
    /// Apply `damping` once per tick regardless of elapsed time
    #[default]
    PerTick,
    /// Scale `damping` so it matches `PerTick` at `reference_fps`
    TimeNormalized {
        #[serde(default = "default_reference_fps")]
        reference_fps: f32,
    },
}

impl DampingMode {
    /// Effective interpolation factor for one tick
    ///
    /// `dt` is the time since the previous tick of the same hotspot, or
    /// `None` on its first tick.
    pub fn factor(&self, damping: f32, dt: Option<f32>) -> f32 {
        let factor = match (*self, dt) {
            (DampingMode::PerTick, _) => damping,
            (DampingMode::TimeNormalized { .. }, None) => damping,
            (DampingMode::TimeNormalized { reference_fps }, Some(dt)) => {
                if dt <= 0.0 {
                    0.0
                } else {
                    1.0 - (1.0 - damping).powf(dt * reference_fps)
                }
            }
        };
        factor.clamp(0.0, 1.0)
    }
}

fn default_reference_fps() -> f32 {
    60.0
}

/// Tunables shared by every hotspot in a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationSettings {
    /// Bob angular frequency in rad/s
    #[serde(default = "default_bob_frequency")]
    pub bob_frequency: f32,
    /// Bob amplitude in world units
    #[serde(default = "default_bob_amplitude")]
    pub bob_amplitude: f32,
    /// Fraction of the remaining distance to the target scale covered per tick
    #[serde(default = "default_damping")]
    pub damping: f32,
    /// Target scale while hovered or active
    #[serde(default = "default_hover_scale")]
    pub hover_scale: f32,
    /// Target scale otherwise
    #[serde(default = "default_idle_scale")]
    pub idle_scale: f32,
    /// Scale before the first tick
    #[serde(default = "default_initial_scale")]
    pub initial_scale: f32,
    #[serde(default)]
    pub damping_mode: DampingMode,
}

fn default_bob_frequency() -> f32 {
    1.2
}

fn default_bob_amplitude() -> f32 {
    0.02
}

fn default_damping() -> f32 {
    0.12
}

fn default_hover_scale() -> f32 {
    1.15
}

fn default_idle_scale() -> f32 {
    0.95
}

fn default_initial_scale() -> f32 {
    1.0
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            bob_frequency: default_bob_frequency(),
            bob_amplitude: default_bob_amplitude(),
            damping: default_damping(),
            hover_scale: default_hover_scale(),
            idle_scale: default_idle_scale(),
            initial_scale: default_initial_scale(),
            damping_mode: DampingMode::default(),
        }
    }
}

impl AnimationSettings {
    /// Reject values that would break the no-overshoot or periodicity guarantees
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "animation.damping must be in (0, 1], got {}",
                self.damping
            )));
        }
        if !(self.bob_frequency.is_finite() && self.bob_frequency > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "animation.bob_frequency must be positive, got {}",
                self.bob_frequency
            )));
        }
        if !(self.bob_amplitude.is_finite() && self.bob_amplitude >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "animation.bob_amplitude must be non-negative, got {}",
                self.bob_amplitude
            )));
        }
        for (name, value) in [
            ("hover_scale", self.hover_scale),
            ("idle_scale", self.idle_scale),
            ("initial_scale", self.initial_scale),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "animation.{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if let DampingMode::TimeNormalized { reference_fps } = self.damping_mode {
            if !(reference_fps.is_finite() && reference_fps > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "animation.damping_mode.reference_fps must be positive, got {}",
                    reference_fps
                )));
            }
        }
        Ok(())
    }

    /// Bobbed height at `elapsed` seconds for a hotspot resting at `base_y`
    pub fn bob_y(&self, base_y: f32, elapsed: f32) -> f32 {
        base_y + (elapsed * self.bob_frequency).sin() * self.bob_amplitude
    }

    /// Bob period in seconds
    pub fn bob_period(&self) -> f32 {
        std::f32::consts::TAU / self.bob_frequency
    }

    pub fn target_scale(&self, highlighted: bool) -> f32 {
        if highlighted {
            self.hover_scale
        } else {
            self.idle_scale
        }
    }
}

/// Move `current` a fraction `factor` of the way toward `target`
pub fn ease_toward(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}
