//! Shape sets and viewport
//!
//! A shape set is one animated unit: a primary element plus the auxiliary
//! elements bound to it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::palette::ColorTreatment;
use crate::box_center;
use crate::consts::APPEAR_RATE;
use crate::themes::ThemeKind;

/// Rendering surface size in px
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Zero, negative or non-finite extent
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// The dominant visual element; owns position and size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primary {
    /// Top-left corner
    pub pos: Vec2,
    /// Nominal box (before entry scale)
    pub width: f32,
    pub height: f32,
}

/// An auxiliary element positioned relative to the primary each tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Secondary {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Host animation period override (seconds)
    pub animation_duration: Option<f32>,
}

impl Secondary {
    pub fn new(size: Vec2) -> Self {
        Self {
            pos: Vec2::ZERO,
            size,
            animation_duration: None,
        }
    }
}

/// Presentation state the effect controller mutates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    pub grayscale: bool,
    pub opacity: f32,
    pub secondary_opacity: f32,
    /// Entry animation scale, 0 at birth growing to 1
    pub scale: f32,
    pub color: Option<ColorTreatment>,
    /// Attention animation from the pulse tier
    pub pulsing: bool,
    /// Temporary pulse while a color wave passes
    pub wave_pulse: bool,
}

impl Default for VisualState {
    fn default() -> Self {
        Self {
            grayscale: true,
            opacity: 0.0,
            secondary_opacity: 0.0,
            scale: 0.0,
            color: None,
            pulsing: false,
            wave_pulse: false,
        }
    }
}

/// Pearl surface pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PearlKind {
    Solid,
    Swirl,
    Catseye,
}

/// Theme-specific shape and motion parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ThemeParams {
    Aurora {
        orbit_radius: f32,
    },
    Jellyfish {
        bell_size: f32,
        /// Horizontal offset of each tentacle from the bell center
        tentacle_offsets: Vec<f32>,
        tentacle_lengths: Vec<f32>,
    },
    Firefly {
        orbit_radius: f32,
        /// Glow cycle length (seconds)
        pulse_speed: f32,
        pulse_offset: f32,
        /// Current glow intensity in [0, 1]
        glow: f32,
        frame: u32,
    },
    Pearl {
        kind: PearlKind,
    },
    Mushroom {
        stem_size: Vec2,
        /// Spot centers relative to the cap center
        spot_offsets: Vec<Vec2>,
    },
    Maple {
        rotation_accel: f32,
        flutter_timer: f32,
        flutter_intensity: f32,
        breeze_phase: f32,
        breeze_speed: f32,
    },
}

/// One animated unit managed by the pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeSet {
    pub id: u32,
    pub kind: ThemeKind,
    pub primary: Primary,
    pub secondaries: Vec<Secondary>,
    /// px per frame
    pub vel: Vec2,
    /// Degrees for rotating themes, radians of orbit for satellite themes
    pub angle: f32,
    pub rotation_speed: f32,
    /// Representative linear dimension
    pub size: f32,
    /// Correct-answer count when created
    pub birth_tick: u32,
    pub visual: VisualState,
    pub params: ThemeParams,
}

impl ShapeSet {
    /// Answers witnessed since birth
    #[inline]
    pub fn age(&self, current_tick: u32) -> u32 {
        current_tick.saturating_sub(self.birth_tick)
    }

    /// Eligible for color/pulse treatment
    #[inline]
    pub fn is_aged(&self, current_tick: u32, threshold_x: u32) -> bool {
        self.age(current_tick) >= threshold_x
    }

    pub fn is_colored(&self) -> bool {
        !self.visual.grayscale
    }

    /// Nominal primary box
    pub fn box_size(&self) -> Vec2 {
        Vec2::new(self.primary.width, self.primary.height)
    }

    /// Box as currently rendered (includes entry scale)
    pub fn measured_size(&self) -> Vec2 {
        self.box_size() * self.visual.scale
    }

    /// Measured geometry is usable for boundary and collision checks
    pub fn has_geometry(&self) -> bool {
        let m = self.measured_size();
        m.x > 0.0 && m.y > 0.0 && m.is_finite() && self.primary.pos.is_finite()
    }

    /// Center of the rendered box (scale is applied about the box center)
    pub fn center(&self) -> Vec2 {
        box_center(self.primary.pos, self.box_size())
    }

    /// Bounding radius used for collisions
    pub fn collision_radius(&self) -> f32 {
        let m = self.measured_size();
        m.x.max(m.y) / 2.0
    }

    /// Advance the entry animation by one frame
    pub fn advance_appear(&mut self) {
        if self.visual.scale < 1.0 {
            self.visual.scale = (self.visual.scale + APPEAR_RATE).min(1.0);
            if self.visual.grayscale {
                self.visual.opacity = self.visual.opacity.max(self.visual.scale);
                self.visual.secondary_opacity = self.visual.opacity;
            }
        }
    }

    /// Skip the entry animation
    pub fn finish_appear(&mut self) {
        self.visual.scale = 1.0;
        if self.visual.grayscale {
            self.visual.opacity = 1.0;
            self.visual.secondary_opacity = 1.0;
        }
    }
}
