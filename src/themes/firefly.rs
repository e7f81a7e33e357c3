//! Fireflies: small darting glows with one or two trailing motes

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{SpawnContext, ThemeKind, ThemeVariant, orbit_secondaries, random_position, sample_range, spread};
use crate::sim::entity::{Primary, Secondary, ShapeSet, ThemeParams, Viewport, VisualState};

/// Glow cycle length range (seconds)
const PULSE_SPEED: (f32, f32) = (1.5, 3.5);
/// Slight upward tendency
const UPWARD_BIAS: f32 = 0.15;
/// Nominal host frame rate used to turn frames into seconds
const FRAME_RATE: f32 = 60.0;

pub struct Firefly;

impl ThemeVariant for Firefly {
    fn kind(&self) -> ThemeKind {
        ThemeKind::Firefly
    }

    fn create_entity(&self, ctx: &SpawnContext<'_>, rng: &mut Pcg32) -> ShapeSet {
        let tuning = ctx.tuning;
        let size = sample_range(rng, tuning.size_min, tuning.size_max);
        let trails: usize = rng.random_range(1..=2);

        let pos = random_position(ctx.viewport, tuning.extent_padding, Vec2::splat(size), rng);
        let secondaries = (0..trails)
            .map(|i| Secondary::new(Vec2::splat(size * (0.4 + i as f32 * 0.2))))
            .collect();

        let vel = Vec2::new(
            spread(rng, tuning.velocity_x),
            spread(rng, tuning.velocity_y) - UPWARD_BIAS,
        );

        let mut set = ShapeSet {
            id: ctx.id,
            kind: ThemeKind::Firefly,
            primary: Primary {
                pos,
                width: size,
                height: size,
            },
            secondaries,
            vel,
            // Trails start behind the direction of travel
            angle: vel.y.atan2(vel.x) + PI,
            rotation_speed: 0.0,
            size,
            birth_tick: ctx.birth_tick,
            visual: VisualState::default(),
            params: ThemeParams::Firefly {
                orbit_radius: size * (1.5 + trails as f32 * 0.5),
                pulse_speed: sample_range(rng, PULSE_SPEED.0, PULSE_SPEED.1),
                pulse_offset: rng.random::<f32>() * TAU,
                glow: 0.0,
                frame: 0,
            },
        };
        self.place_secondaries(&mut set);
        set
    }

    fn apply_motion_overlay(&self, set: &mut ShapeSet, _viewport: Option<Viewport>, _rng: &mut Pcg32) {
        if let ThemeParams::Firefly {
            pulse_speed,
            pulse_offset,
            glow,
            frame,
            ..
        } = &mut set.params
        {
            *frame = frame.wrapping_add(1);
            let secs = *frame as f32 / FRAME_RATE;
            *glow = 0.5 + 0.5 * (secs * TAU / *pulse_speed + *pulse_offset).sin();
        }
    }

    fn place_secondaries(&self, set: &mut ShapeSet) {
        if let ThemeParams::Firefly { orbit_radius, .. } = set.params {
            orbit_secondaries(set, orbit_radius);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThemeTunings;
    use rand::SeedableRng;

    #[test]
    fn test_glow_stays_in_unit_range() {
        let tunings = ThemeTunings::default();
        let mut rng = Pcg32::seed_from_u64(21);
        let ctx = SpawnContext {
            id: 1,
            birth_tick: 0,
            viewport: Some(Viewport::new(900.0, 700.0)),
            tuning: &tunings.firefly,
        };
        let mut set = Firefly.create_entity(&ctx, &mut rng);
        assert!((1..=2).contains(&set.secondaries.len()));
        for _ in 0..500 {
            Firefly.apply_motion_overlay(&mut set, None, &mut rng);
            let ThemeParams::Firefly { glow, .. } = set.params else {
                panic!("wrong params");
            };
            assert!((0.0..=1.0).contains(&glow));
        }
    }
}
