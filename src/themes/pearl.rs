//! Pearls: rolling beads without satellites

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{SpawnContext, ThemeKind, ThemeVariant, direction, random_position, sample_range, spread};
use crate::sim::entity::{PearlKind, Primary, ShapeSet, ThemeParams, Viewport, VisualState};
use crate::wrap_degrees;

pub struct Pearl;

impl ThemeVariant for Pearl {
    fn kind(&self) -> ThemeKind {
        ThemeKind::Pearl
    }

    fn create_entity(&self, ctx: &SpawnContext<'_>, rng: &mut Pcg32) -> ShapeSet {
        let tuning = ctx.tuning;
        let size = sample_range(rng, tuning.size_min, tuning.size_max);
        let kind = match rng.random_range(0..3) {
            0 => PearlKind::Solid,
            1 => PearlKind::Swirl,
            _ => PearlKind::Catseye,
        };
        let pos = random_position(ctx.viewport, tuning.extent_padding, Vec2::splat(size), rng);
        let rotation_speed = sample_range(rng, tuning.rotation_min, tuning.rotation_max) * direction(rng);

        ShapeSet {
            id: ctx.id,
            kind: ThemeKind::Pearl,
            primary: Primary {
                pos,
                width: size,
                height: size,
            },
            secondaries: Vec::new(),
            vel: Vec2::new(spread(rng, tuning.velocity_x), spread(rng, tuning.velocity_y)),
            angle: rng.random::<f32>() * 360.0,
            rotation_speed,
            size,
            birth_tick: ctx.birth_tick,
            visual: VisualState::default(),
            params: ThemeParams::Pearl { kind },
        }
    }

    fn apply_motion_overlay(&self, set: &mut ShapeSet, _viewport: Option<Viewport>, _rng: &mut Pcg32) {
        set.angle = wrap_degrees(set.angle + set.rotation_speed);
    }
}
