//! Engine tunables
//!
//! Every value has a default so a host can pass an empty JSON object.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::themes::ThemeKind;

/// Size, speed and rotation ranges for one theme
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThemeTuning {
    /// Representative size range (px)
    pub size_min: f32,
    pub size_max: f32,
    /// Velocity spread per axis (px/frame); velocity = (rand - 0.5) * spread
    pub velocity_x: f32,
    pub velocity_y: f32,
    /// Rotation speed range (degrees/frame)
    pub rotation_min: f32,
    pub rotation_max: f32,
    /// Glow/shadow extent rendered beyond the nominal box (px)
    pub extent_padding: f32,
}

impl ThemeTuning {
    const fn new(size: (f32, f32), velocity: (f32, f32), rotation: (f32, f32), padding: f32) -> Self {
        Self {
            size_min: size.0,
            size_max: size.1,
            velocity_x: velocity.0,
            velocity_y: velocity.1,
            rotation_min: rotation.0,
            rotation_max: rotation.1,
            extent_padding: padding,
        }
    }

    /// Swap inverted ranges and drop negative extents
    fn sanitized(mut self) -> Self {
        if self.size_min > self.size_max {
            std::mem::swap(&mut self.size_min, &mut self.size_max);
        }
        if self.rotation_min > self.rotation_max {
            std::mem::swap(&mut self.rotation_min, &mut self.rotation_max);
        }
        self.size_min = self.size_min.max(1.0);
        self.size_max = self.size_max.max(self.size_min);
        self.velocity_x = self.velocity_x.abs();
        self.velocity_y = self.velocity_y.abs();
        self.extent_padding = self.extent_padding.max(0.0);
        self
    }
}

/// Per-theme tuning table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeTunings {
    pub aurora: ThemeTuning,
    pub jellyfish: ThemeTuning,
    pub firefly: ThemeTuning,
    pub pearl: ThemeTuning,
    pub mushroom: ThemeTuning,
    pub maple: ThemeTuning,
}

impl Default for ThemeTunings {
    fn default() -> Self {
        Self {
            aurora: ThemeTuning::new(
                (30.0, 130.0),
                (BASE_VELOCITY_MULTIPLIER, BASE_VELOCITY_MULTIPLIER),
                (0.0, 0.0),
                0.0,
            ),
            jellyfish: ThemeTuning::new((25.0, 55.0), (0.8, 0.6), (0.1, 0.3), 120.0),
            firefly: ThemeTuning::new((8.0, 20.0), (1.5, 1.3), (0.0, 0.0), 110.0),
            pearl: ThemeTuning::new((25.0, 60.0), (1.6, 1.6), (0.4, 1.2), 35.0),
            mushroom: ThemeTuning::new((30.0, 80.0), (0.6, 0.6), (0.0, 0.0), 90.0),
            maple: ThemeTuning::new((40.0, 95.0), (0.7, 0.7), (0.4, 1.6), 20.0),
        }
    }
}

impl ThemeTunings {
    pub fn get(&self, kind: ThemeKind) -> &ThemeTuning {
        match kind {
            ThemeKind::Aurora => &self.aurora,
            ThemeKind::Jellyfish => &self.jellyfish,
            ThemeKind::Firefly => &self.firefly,
            ThemeKind::Pearl => &self.pearl,
            ThemeKind::Mushroom => &self.mushroom,
            ThemeKind::Maple => &self.maple,
        }
    }

    fn sanitized(self) -> Self {
        Self {
            aurora: self.aurora.sanitized(),
            jellyfish: self.jellyfish.sanitized(),
            firefly: self.firefly.sanitized(),
            pearl: self.pearl.sanitized(),
            mushroom: self.mushroom.sanitized(),
            maple: self.maple.sanitized(),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Entities age after this many correct answers since birth; also paces tiers
    pub threshold_x: u32,
    /// Pool cap = capacity_multiplier * threshold_x
    pub capacity_multiplier: u32,

    // === Tier thresholds (multiples of X) ===
    pub color_multiplier: u32,
    pub pulse_multiplier: u32,
    pub wave_multiplier: u32,

    // === Visual treatment ===
    pub colored_primary_opacity: f32,
    pub colored_secondary_opacity: f32,
    /// Full-screen ripple before a color wave
    pub ripple_enabled: bool,

    // === Timings (ms) ===
    pub fade_out_ms: f64,
    pub reset_fade_ms: f64,
    pub cascade_stagger_ms: f64,
    pub wave_pulse_ms: f64,

    /// Elements created/treated per sample-mode trigger
    pub sample_count: u32,

    /// RNG seed for entity placement and effects
    pub seed: u64,

    pub themes: ThemeTunings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threshold_x: DEFAULT_THRESHOLD_X,
            capacity_multiplier: MAX_CAPACITY_MULTIPLIER,

            color_multiplier: COLOR_THRESHOLD_MULTIPLIER,
            pulse_multiplier: PULSE_THRESHOLD_MULTIPLIER,
            wave_multiplier: COLOR_WAVE_THRESHOLD_MULTIPLIER,

            colored_primary_opacity: COLORED_PRIMARY_OPACITY,
            colored_secondary_opacity: COLORED_SECONDARY_OPACITY,
            ripple_enabled: true,

            fade_out_ms: FADE_OUT_MS,
            reset_fade_ms: RESET_FADE_MS,
            cascade_stagger_ms: CASCADE_STAGGER_MS,
            wave_pulse_ms: WAVE_PULSE_MS,

            sample_count: SAMPLE_COUNT_DEFAULT,

            seed: 0x6d61_7961,

            themes: ThemeTunings::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON config and clamp it into range
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Clamp every tunable into its valid range
    pub fn sanitized(mut self) -> Self {
        if self.threshold_x == 0 {
            log::warn!("threshold_x of 0 is invalid, using {}", DEFAULT_THRESHOLD_X);
            self.threshold_x = DEFAULT_THRESHOLD_X;
        }
        if self.threshold_x > MAX_THRESHOLD_X {
            log::warn!("threshold_x of {} is too large, using {}", self.threshold_x, MAX_THRESHOLD_X);
            self.threshold_x = MAX_THRESHOLD_X;
        }
        self.capacity_multiplier = self.capacity_multiplier.clamp(1, MAX_MULTIPLIER);

        // Tiers must be strictly ordered and leave room for the two above
        self.color_multiplier = self.color_multiplier.clamp(1, MAX_MULTIPLIER - 2);
        if self.pulse_multiplier <= self.color_multiplier {
            log::warn!("pulse_multiplier must exceed color_multiplier, adjusting");
            self.pulse_multiplier = self.color_multiplier + 1;
        }
        self.pulse_multiplier = self.pulse_multiplier.min(MAX_MULTIPLIER - 1);
        if self.wave_multiplier <= self.pulse_multiplier {
            log::warn!("wave_multiplier must exceed pulse_multiplier, adjusting");
            self.wave_multiplier = self.pulse_multiplier + 1;
        }
        self.wave_multiplier = self.wave_multiplier.min(MAX_MULTIPLIER);

        self.colored_primary_opacity = self.colored_primary_opacity.clamp(0.0, 1.0);
        self.colored_secondary_opacity = self.colored_secondary_opacity.clamp(0.0, 1.0);

        self.fade_out_ms = self.fade_out_ms.max(0.0);
        self.reset_fade_ms = self.reset_fade_ms.max(0.0);
        self.cascade_stagger_ms = self.cascade_stagger_ms.max(0.0);
        self.wave_pulse_ms = self.wave_pulse_ms.max(0.0);

        self.sample_count = self.sample_count.clamp(SAMPLE_COUNT_MIN, self.max_capacity());
        self.themes = self.themes.sanitized();
        self
    }

    /// Maximum simultaneous live entities
    pub fn max_capacity(&self) -> u32 {
        self.capacity_multiplier.saturating_mul(self.threshold_x)
    }

    /// Change X; zero falls back to the default and oversized values are capped
    pub fn set_threshold(&mut self, x: u32) {
        self.threshold_x = match x {
            0 => DEFAULT_THRESHOLD_X,
            x => x.min(MAX_THRESHOLD_X),
        };
        self.sample_count = self.sample_count.clamp(SAMPLE_COUNT_MIN, self.max_capacity());
    }
}
