//! Maya Visuals - animated background theme engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, physics, pool lifecycle, effect tiers)
//! - `themes`: Theme variants (entity factories and motion policies)
//! - `engine`: A live theme instance driven by host frames
//! - `manager`: Session orchestrator fed by correct/wrong/skip answers
//! - `hint`: Progress hints derived from counters and pool state
//! - `config`: Data-driven tunables
//! - `web`: Browser bindings (wasm32 only)

pub mod config;
pub mod engine;
pub mod error;
pub mod hint;
pub mod manager;
pub mod sim;
pub mod themes;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{EngineConfig, ThemeTuning};
pub use engine::{FrameSnapshot, ThemeEngine};
pub use error::ConfigError;
pub use hint::{Hint, HintKind};
pub use manager::{Counts, Mode, ThemeObserver, VisualManager};
pub use themes::ThemeKind;

use glam::Vec2;

/// Engine configuration constants
pub mod consts {
    /// Correct answers an entity must witness before it ages into color
    pub const DEFAULT_THRESHOLD_X: u32 = 5;
    /// Largest accepted X
    pub const MAX_THRESHOLD_X: u32 = 1000;
    /// Pool cap = multiplier * X
    pub const MAX_CAPACITY_MULTIPLIER: u32 = 3;

    /// Tier thresholds (multiples of X)
    pub const COLOR_THRESHOLD_MULTIPLIER: u32 = 2;
    pub const PULSE_THRESHOLD_MULTIPLIER: u32 = 3;
    pub const COLOR_WAVE_THRESHOLD_MULTIPLIER: u32 = 4;
    /// Upper bound for the capacity and tier multipliers
    pub const MAX_MULTIPLIER: u32 = 100;

    /// Opacity of colored elements
    pub const COLORED_PRIMARY_OPACITY: f32 = 0.85;
    pub const COLORED_SECONDARY_OPACITY: f32 = 0.9;

    /// Timings (milliseconds)
    pub const FADE_OUT_MS: f64 = 1500.0;
    pub const RESET_FADE_MS: f64 = 500.0;
    pub const CASCADE_STAGGER_MS: f64 = 50.0;
    pub const WAVE_PULSE_MS: f64 = 800.0;
    pub const RIPPLE_STAGGER_MS: f64 = 150.0;
    pub const RIPPLE_BASE_DURATION_MS: f64 = 1400.0;

    /// Entry animation: scale gained per frame (~0.5s at 60 Hz)
    pub const APPEAR_RATE: f32 = 1.0 / 30.0;

    /// Sample mode element count
    pub const SAMPLE_COUNT_MIN: u32 = 1;
    pub const SAMPLE_COUNT_DEFAULT: u32 = 5;

    /// Base velocity multiplier for the generic bubble
    pub const BASE_VELOCITY_MULTIPLIER: f32 = 0.8;
    /// Orbit speed of satellite elements (radians per frame)
    pub const ORBIT_SPEED: f32 = 0.008;
}

/// Keep an angle in degrees inside (-360, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    if angle.abs() > 360.0 {
        angle % 360.0
    } else {
        angle
    }
}

/// Clamp a scalar into [-limit, limit]
#[inline]
pub fn clamp_abs(value: f32, limit: f32) -> f32 {
    value.clamp(-limit, limit)
}

/// Center of an axis-aligned box given its top-left corner and size
#[inline]
pub fn box_center(top_left: Vec2, size: Vec2) -> Vec2 {
    top_left + size * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(45.0), 45.0);
        assert!((wrap_degrees(370.0) - 10.0).abs() < 1e-4);
        assert!((wrap_degrees(-725.0) + 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_box_center() {
        let c = box_center(Vec2::new(10.0, 20.0), Vec2::new(4.0, 6.0));
        assert_eq!(c, Vec2::new(12.0, 23.0));
    }
}
