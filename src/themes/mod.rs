//! Theme variants
//!
//! Each theme is a strategy object implementing [`ThemeVariant`]: it builds
//! shape sets and supplies the motion policy the shared physics loop calls.
//! The collision/boundary core in `sim::physics` never matches on theme kind.

pub mod aurora;
pub mod firefly;
pub mod jellyfish;
pub mod maple;
pub mod mushroom;
pub mod pearl;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::ThemeTuning;
use crate::consts::{COLORED_PRIMARY_OPACITY, COLORED_SECONDARY_OPACITY, ORBIT_SPEED};
use crate::sim::entity::{ShapeSet, Viewport};
use crate::sim::palette::{ColorTreatment, DEFAULT_PALETTE, PaletteEntry};

/// Closed set of themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ThemeKind {
    /// Generic glowing bubble with orbiting sparkles
    Aurora,
    #[default]
    Jellyfish,
    Firefly,
    Pearl,
    Mushroom,
    Maple,
}

impl ThemeKind {
    pub const ALL: [ThemeKind; 6] = [
        ThemeKind::Aurora,
        ThemeKind::Jellyfish,
        ThemeKind::Firefly,
        ThemeKind::Pearl,
        ThemeKind::Mushroom,
        ThemeKind::Maple,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeKind::Aurora => "aurora",
            ThemeKind::Jellyfish => "jellyfish",
            ThemeKind::Firefly => "firefly",
            ThemeKind::Pearl => "pearl",
            ThemeKind::Mushroom => "mushroom",
            ThemeKind::Maple => "maple",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "aurora" | "bubble" => Some(ThemeKind::Aurora),
            "jellyfish" => Some(ThemeKind::Jellyfish),
            "firefly" => Some(ThemeKind::Firefly),
            "pearl" => Some(ThemeKind::Pearl),
            "mushroom" => Some(ThemeKind::Mushroom),
            "maple" => Some(ThemeKind::Maple),
            _ => None,
        }
    }

    /// Strategy object for this theme
    pub fn variant(self) -> &'static dyn ThemeVariant {
        match self {
            ThemeKind::Aurora => &aurora::Aurora,
            ThemeKind::Jellyfish => &jellyfish::Jellyfish,
            ThemeKind::Firefly => &firefly::Firefly,
            ThemeKind::Pearl => &pearl::Pearl,
            ThemeKind::Mushroom => &mushroom::Mushroom,
            ThemeKind::Maple => &maple::Maple,
        }
    }
}

/// What happens when an entity's effective box crosses the viewport edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryMode {
    /// Reflect the velocity component
    Bounce,
    /// Re-enter from the opposite edge once `margin` px outside
    Wrap { margin: f32 },
}

/// Inputs to an entity factory
#[derive(Debug, Clone, Copy)]
pub struct SpawnContext<'a> {
    pub id: u32,
    pub birth_tick: u32,
    /// `None` when no rendering surface is attached
    pub viewport: Option<Viewport>,
    pub tuning: &'a ThemeTuning,
}

/// Opacities a color treatment applies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColoredOpacity {
    pub primary: f32,
    pub secondary: f32,
}

impl Default for ColoredOpacity {
    fn default() -> Self {
        Self {
            primary: COLORED_PRIMARY_OPACITY,
            secondary: COLORED_SECONDARY_OPACITY,
        }
    }
}

/// Shared capability interface every theme implements
pub trait ThemeVariant: Sync {
    fn kind(&self) -> ThemeKind;

    /// Build a new desaturated shape set
    fn create_entity(&self, ctx: &SpawnContext<'_>, rng: &mut Pcg32) -> ShapeSet;

    fn boundary_mode(&self) -> BoundaryMode {
        BoundaryMode::Bounce
    }

    /// Box used for boundary checks; `None` skips the entity this tick
    fn boundary_box(&self, set: &ShapeSet) -> Option<Vec2> {
        set.has_geometry().then(|| set.measured_size())
    }

    /// Visual extent rendered beyond the boundary box
    fn extent_padding(&self, tuning: &ThemeTuning) -> f32 {
        tuning.extent_padding
    }

    /// Theme-specific motion after integration and boundary handling
    fn apply_motion_overlay(&self, _set: &mut ShapeSet, _viewport: Option<Viewport>, _rng: &mut Pcg32) {}

    /// Re-anchor secondaries to the primary's current position
    fn place_secondaries(&self, _set: &mut ShapeSet) {}

    fn palette(&self) -> &'static [PaletteEntry] {
        DEFAULT_PALETTE
    }

    /// Colors for `set` drawn from `entry`
    fn color_treatment(&self, set: &ShapeSet, entry: &PaletteEntry) -> ColorTreatment {
        let stops = entry.stops();
        ColorTreatment {
            palette: entry.name.to_string(),
            primary: stops,
            secondaries: vec![stops.0; set.secondaries.len()],
        }
    }

    /// Extra work when a pulse lands on `set`
    fn on_pulse(&self, _set: &mut ShapeSet, _rng: &mut Pcg32) {}
}

/// Remove grayscale and apply a random palette color
pub fn apply_color(set: &mut ShapeSet, opacity: ColoredOpacity, rng: &mut Pcg32) {
    let variant = set.kind.variant();
    let palette = variant.palette();
    if palette.is_empty() {
        return;
    }
    let entry = palette[rng.random_range(0..palette.len())];
    let treatment = variant.color_treatment(set, &entry);
    set.visual.grayscale = false;
    set.visual.opacity = opacity.primary;
    set.visual.secondary_opacity = opacity.secondary;
    set.visual.color = Some(treatment);
}

/// Uniform sample from [min, max); returns `min` for an empty range
pub(crate) fn sample_range(rng: &mut Pcg32, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// `(rand - 0.5) * spread`
pub(crate) fn spread(rng: &mut Pcg32, spread: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * spread
}

/// Random direction sign
pub(crate) fn direction(rng: &mut Pcg32) -> f32 {
    if rng.random_bool(0.5) { -1.0 } else { 1.0 }
}

/// Random top-left inside the viewport, keeping `padding` clear on every side.
/// Degenerate or missing viewports place at the origin.
pub(crate) fn random_position(
    viewport: Option<Viewport>,
    padding: f32,
    footprint: Vec2,
    rng: &mut Pcg32,
) -> Vec2 {
    let Some(vp) = viewport.filter(|v| !v.is_degenerate()) else {
        return Vec2::ZERO;
    };
    let free_w = (vp.width - padding * 2.0 - footprint.x).max(0.0);
    let free_h = (vp.height - padding * 2.0 - footprint.y).max(0.0);
    let pad_x = padding.min(vp.width / 2.0);
    let pad_y = padding.min(vp.height / 2.0);
    Vec2::new(
        pad_x + rng.random::<f32>() * free_w,
        pad_y + rng.random::<f32>() * free_h,
    )
}

/// Spread secondaries evenly on a circle around the primary and advance the orbit
pub(crate) fn orbit_secondaries(set: &mut ShapeSet, radius: f32) {
    if set.secondaries.is_empty() {
        return;
    }
    set.angle += ORBIT_SPEED;
    let center = set.center();
    let step = std::f32::consts::TAU / set.secondaries.len() as f32;
    for (i, secondary) in set.secondaries.iter_mut().enumerate() {
        let a = set.angle + step * i as f32;
        let on_circle = center + Vec2::new(a.cos(), a.sin()) * radius;
        secondary.pos = on_circle - secondary.size / 2.0;
    }
}
