//! Generic glowing bubble with orbiting sparkles

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{SpawnContext, ThemeKind, ThemeVariant, orbit_secondaries, random_position, sample_range, spread};
use crate::sim::entity::{Primary, Secondary, ShapeSet, ThemeParams, VisualState};

/// Sparkle edge length (px)
const SPARKLE_SIZE: f32 = 8.0;
/// Sparkles orbit this far outside the bubble edge
const ORBIT_GAP: f32 = 15.0;

pub struct Aurora;

impl ThemeVariant for Aurora {
    fn kind(&self) -> ThemeKind {
        ThemeKind::Aurora
    }

    fn create_entity(&self, ctx: &SpawnContext<'_>, rng: &mut Pcg32) -> ShapeSet {
        let tuning = ctx.tuning;
        let size = sample_range(rng, tuning.size_min, tuning.size_max);
        let sparkles = rng.random_range(2..=4);

        let pos = random_position(ctx.viewport, tuning.extent_padding, Vec2::splat(size), rng);
        let secondaries = (0..sparkles)
            .map(|_| Secondary::new(Vec2::splat(SPARKLE_SIZE)))
            .collect();

        let mut set = ShapeSet {
            id: ctx.id,
            kind: ThemeKind::Aurora,
            primary: Primary {
                pos,
                width: size,
                height: size,
            },
            secondaries,
            vel: Vec2::new(spread(rng, tuning.velocity_x), spread(rng, tuning.velocity_y)),
            angle: 0.0,
            rotation_speed: 0.0,
            size,
            birth_tick: ctx.birth_tick,
            visual: VisualState::default(),
            params: ThemeParams::Aurora {
                orbit_radius: size / 2.0 + ORBIT_GAP,
            },
        };
        self.place_secondaries(&mut set);
        set
    }

    fn place_secondaries(&self, set: &mut ShapeSet) {
        if let ThemeParams::Aurora { orbit_radius } = set.params {
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
    fn test_sparkles_orbit_at_radius() {
        let tunings = ThemeTunings::default();
        let mut rng = Pcg32::seed_from_u64(11);
        let ctx = SpawnContext {
            id: 1,
            birth_tick: 0,
            viewport: None,
            tuning: &tunings.aurora,
        };
        let mut set = Aurora.create_entity(&ctx, &mut rng);
        assert!((2..=4).contains(&set.secondaries.len()));

        let before = set.angle;
        Aurora.place_secondaries(&mut set);
        assert!(set.angle > before);

        let center = set.center();
        let expected = set.size / 2.0 + ORBIT_GAP;
        for s in &set.secondaries {
            let d = (s.pos + s.size / 2.0 - center).length();
            assert!((d - expected).abs() < 1e-3);
        }
    }
}
