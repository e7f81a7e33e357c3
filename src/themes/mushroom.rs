//! Mushrooms: a cap with a stem anchored below and spots fixed on its surface

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{SpawnContext, ThemeKind, ThemeVariant, random_position, sample_range, spread};
use crate::sim::entity::{Primary, Secondary, ShapeSet, ThemeParams, VisualState};
use crate::sim::palette::{ColorTreatment, MUSHROOM_SPOT, MUSHROOM_STEM, PaletteEntry};

/// Cap is slightly flattened
const CAP_HEIGHT: f32 = 0.7;
const STEM_WIDTH: f32 = 0.3;
const STEM_HEIGHT: f32 = 0.8;
/// Cap plus stem extends this far below the cap top, relative to cap size
const TOTAL_HEIGHT: f32 = 1.5;

pub struct Mushroom;

/// Spot size as a fraction of the cap: a few large, some medium, many small
fn spot_fraction(rng: &mut Pcg32) -> f32 {
    let roll = rng.random::<f32>();
    if roll > 0.7 {
        sample_range(rng, 0.12, 0.20)
    } else if roll > 0.4 {
        sample_range(rng, 0.08, 0.12)
    } else {
        sample_range(rng, 0.04, 0.08)
    }
}

impl ThemeVariant for Mushroom {
    fn kind(&self) -> ThemeKind {
        ThemeKind::Mushroom
    }

    fn create_entity(&self, ctx: &SpawnContext<'_>, rng: &mut Pcg32) -> ShapeSet {
        let tuning = ctx.tuning;
        let cap = sample_range(rng, tuning.size_min, tuning.size_max);
        let spots: usize = rng.random_range(2..=5);

        let pos = random_position(
            ctx.viewport,
            tuning.extent_padding,
            Vec2::new(cap, cap * TOTAL_HEIGHT),
            rng,
        );

        let stem_size = Vec2::new(cap * STEM_WIDTH, cap * STEM_HEIGHT);
        let mut secondaries = Vec::with_capacity(spots + 1);
        secondaries.push(Secondary::new(stem_size));
        let mut spot_offsets = Vec::with_capacity(spots);
        for _ in 0..spots {
            secondaries.push(Secondary::new(Vec2::splat(cap * spot_fraction(rng))));
            spot_offsets.push(Vec2::new(spread(rng, cap * 0.6), spread(rng, cap * 0.4)));
        }

        let mut set = ShapeSet {
            id: ctx.id,
            kind: ThemeKind::Mushroom,
            primary: Primary {
                pos,
                width: cap,
                height: cap * CAP_HEIGHT,
            },
            secondaries,
            vel: Vec2::new(spread(rng, tuning.velocity_x), spread(rng, tuning.velocity_y)),
            angle: 0.0,
            rotation_speed: 0.0,
            size: cap,
            birth_tick: ctx.birth_tick,
            visual: VisualState::default(),
            params: ThemeParams::Mushroom {
                stem_size,
                spot_offsets,
            },
        };
        self.place_secondaries(&mut set);
        set
    }

    fn place_secondaries(&self, set: &mut ShapeSet) {
        let ThemeParams::Mushroom { spot_offsets, .. } = &set.params else {
            return;
        };
        let center = set.center();
        let cap_bottom = center.y + set.measured_size().y / 2.0;
        let Some((stem, spots)) = set.secondaries.split_first_mut() else {
            return;
        };
        stem.pos = Vec2::new(center.x - stem.size.x / 2.0, cap_bottom);
        for (spot, offset) in spots.iter_mut().zip(spot_offsets) {
            spot.pos = center + *offset - spot.size / 2.0;
        }
    }

    /// Cap takes the palette; stem stays light and spots stay dark
    fn color_treatment(&self, set: &ShapeSet, entry: &PaletteEntry) -> ColorTreatment {
        let secondaries = (0..set.secondaries.len())
            .map(|i| if i == 0 { MUSHROOM_STEM } else { MUSHROOM_SPOT })
            .collect();
        ColorTreatment {
            palette: entry.name.to_string(),
            primary: entry.stops(),
            secondaries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThemeTunings;
    use crate::sim::palette::DEFAULT_PALETTE;
    use rand::SeedableRng;

    fn spawn() -> ShapeSet {
        let tunings = ThemeTunings::default();
        let mut rng = Pcg32::seed_from_u64(13);
        let ctx = SpawnContext {
            id: 1,
            birth_tick: 0,
            viewport: None,
            tuning: &tunings.mushroom,
        };
        Mushroom.create_entity(&ctx, &mut rng)
    }

    #[test]
    fn test_stem_and_spots_follow_cap() {
        let mut set = spawn();
        assert!((3..=6).contains(&set.secondaries.len()));
        set.finish_appear();
        set.primary.pos += Vec2::new(40.0, 25.0);
        Mushroom.place_secondaries(&mut set);

        let center = set.center();
        let stem = &set.secondaries[0];
        assert!((stem.pos.y - (set.primary.pos.y + set.primary.height)).abs() < 1e-3);
        assert!((stem.pos.x + stem.size.x / 2.0 - center.x).abs() < 1e-3);

        let ThemeParams::Mushroom { spot_offsets, .. } = &set.params else {
            panic!("wrong params");
        };
        for (spot, offset) in set.secondaries[1..].iter().zip(spot_offsets) {
            let spot_center = spot.pos + spot.size / 2.0;
            assert!((spot_center - (center + *offset)).length() < 1e-3);
        }
    }

    #[test]
    fn test_color_keeps_stem_light_and_spots_dark() {
        let set = spawn();
        let treatment = Mushroom.color_treatment(&set, &DEFAULT_PALETTE[0]);
        assert_eq!(treatment.secondaries[0], MUSHROOM_STEM);
        assert!(treatment.secondaries[1..].iter().all(|c| *c == MUSHROOM_SPOT));
    }
}
