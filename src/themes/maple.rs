//! Maple leaves: drifting, fluttering leaves that wrap around the screen
//!
//! Leaves never bounce. Motion is a layered breeze field: slow global sway,
//! per-leaf flutter, position-dependent turbulence and occasional gusts,
//! with weak gravity pulling them down.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{BoundaryMode, SpawnContext, ThemeKind, ThemeVariant, direction, random_position, sample_range, spread};
use crate::clamp_abs;
use crate::sim::entity::{Primary, ShapeSet, ThemeParams, Viewport, VisualState};
use crate::sim::palette::{AUTUMN_PALETTE, ColorTreatment, PaletteEntry};
use crate::wrap_degrees;

/// Leaf box width relative to size
const LEAF_WIDTH: f32 = 1.2;
/// Off-screen distance before a leaf re-enters from the opposite edge
pub const WRAP_MARGIN: f32 = 100.0;
const GRAVITY: f32 = 0.002;
const MAX_SPIN: f32 = 2.0;
const MAX_VX: f32 = 0.6;
const MAX_VY: f32 = 0.7;
/// Gust strength and how often one blows (sine above threshold)
const GUST: f32 = 0.1;
const GUST_THRESHOLD: f32 = 0.85;
/// Leaves below this fraction of the height get an updraft
const LIFT_START: f32 = 0.67;
/// Autumn colors are lifted toward white so leaves read on dark backgrounds
const LIGHTEN: f32 = 0.2;

pub struct Maple;

impl ThemeVariant for Maple {
    fn kind(&self) -> ThemeKind {
        ThemeKind::Maple
    }

    fn create_entity(&self, ctx: &SpawnContext<'_>, rng: &mut Pcg32) -> ShapeSet {
        let tuning = ctx.tuning;
        let size = sample_range(rng, tuning.size_min, tuning.size_max);
        let width = size * LEAF_WIDTH;
        let pos = random_position(ctx.viewport, tuning.extent_padding, Vec2::new(width, size), rng);

        // Mostly downward drift with a little sideways wander
        let vel = Vec2::new(
            spread(rng, tuning.velocity_x) * 0.8,
            (rng.random::<f32>() * 0.4 + 0.1) * tuning.velocity_y,
        );

        ShapeSet {
            id: ctx.id,
            kind: ThemeKind::Maple,
            primary: Primary {
                pos,
                width,
                height: size,
            },
            secondaries: Vec::new(),
            vel,
            angle: rng.random::<f32>() * 360.0,
            rotation_speed: sample_range(rng, tuning.rotation_min, tuning.rotation_max) * direction(rng),
            size,
            birth_tick: ctx.birth_tick,
            visual: VisualState::default(),
            params: ThemeParams::Maple {
                rotation_accel: spread(rng, 0.008),
                flutter_timer: rng.random::<f32>() * 100.0,
                flutter_intensity: sample_range(rng, 0.4, 0.8),
                breeze_phase: rng.random::<f32>() * TAU,
                breeze_speed: sample_range(rng, 0.006, 0.014),
            },
        }
    }

    fn boundary_mode(&self) -> BoundaryMode {
        BoundaryMode::Wrap { margin: WRAP_MARGIN }
    }

    fn apply_motion_overlay(&self, set: &mut ShapeSet, viewport: Option<Viewport>, _rng: &mut Pcg32) {
        let ThemeParams::Maple {
            rotation_accel,
            flutter_timer,
            flutter_intensity,
            breeze_phase,
            breeze_speed,
        } = &mut set.params
        else {
            return;
        };

        *flutter_timer += 1.0;
        let t = *flutter_timer;
        let flutter = (t * 0.12).sin() * *flutter_intensity * 0.15;
        let breeze = (t * 0.015).sin() * 0.04;
        set.rotation_speed = clamp_abs(set.rotation_speed + *rotation_accel, MAX_SPIN);
        set.angle = wrap_degrees(set.angle + set.rotation_speed + flutter);

        *flutter_timer += 1.0;
        let t = *flutter_timer;

        // Currents depend on where the leaf is; without a surface use the center
        let (norm, height) = match viewport.filter(|v| !v.is_degenerate()) {
            Some(vp) => (
                Vec2::new(set.primary.pos.x / vp.width, set.primary.pos.y / vp.height),
                vp.height,
            ),
            None => (Vec2::splat(0.5), 0.0),
        };
        let birth = set.birth_tick as f32;

        let mut vy = set.vel.y + GRAVITY;
        vy += (t * 0.005).sin() * 0.1;
        vy += (t * *breeze_speed + *breeze_phase).sin() * 0.15;
        vy += (t * 0.018 + birth * 0.3).sin() * 0.08;
        vy += (norm.x * TAU + t * 0.003).sin() * 0.06;
        vy += (norm.y * PI + t * 0.004).cos() * 0.05;
        let lower = height * LIFT_START;
        if height > 0.0 && set.primary.pos.y > lower {
            let ratio = (set.primary.pos.y - lower) / (height - lower);
            vy -= ratio * 0.2 * (t * 0.01).sin();
        }
        set.vel.y = clamp_abs(vy, MAX_VY);

        let mut vx = set.vel.x;
        vx += (t * 0.004).cos() * 0.06;
        vx += (t * *breeze_speed * 1.5 + *breeze_phase + FRAC_PI_2).sin() * 0.12;
        vx += (norm.y * 1.5 * PI + t * 0.005).cos() * 0.07;
        vx += (norm.x * 3.0 * PI + t * 0.008).sin() * 0.05;
        if (t * 0.015 + birth).sin() > GUST_THRESHOLD {
            vx += GUST * (t * 0.02).cos();
        }
        vx += breeze;
        set.vel.x = clamp_abs(vx, MAX_VX);
    }

    fn palette(&self) -> &'static [PaletteEntry] {
        AUTUMN_PALETTE
    }

    fn color_treatment(&self, _set: &ShapeSet, entry: &PaletteEntry) -> ColorTreatment {
        let (a, b) = entry.stops();
        ColorTreatment {
            palette: entry.name.to_string(),
            primary: (a.lighten(LIGHTEN), b.lighten(LIGHTEN)),
            secondaries: Vec::new(),
        }
    }
}
