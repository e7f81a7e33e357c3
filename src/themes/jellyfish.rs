//! Jellyfish: a dome bell trailing 4-8 tentacles
//!
//! The host animates rotation and the float/pulse scale, so the bell has no
//! motion overlay. Boundary checks use the unscaled bell so pulse scaling
//! does not shrink the swim range.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{SpawnContext, ThemeKind, ThemeVariant, direction, random_position, sample_range, spread};
use crate::sim::entity::{Primary, Secondary, ShapeSet, ThemeParams, VisualState};

/// Bell box relative to bell size
const BELL_WIDTH: f32 = 1.2;
const BELL_HEIGHT: f32 = 0.7;
/// Largest pulse scale the host applies
const PULSE_SCALE_MAX: f32 = 1.3;
const TENTACLE_WIDTH: f32 = 3.0;
const TENTACLE_LENGTH: (f32, f32) = (60.0, 140.0);
/// Host animation period range for pulsing tentacles (seconds)
const TENTACLE_PERIOD: (f32, f32) = (4.5, 5.5);
/// Slight upward tendency
const UPWARD_BIAS: f32 = 0.15;

pub struct Jellyfish;

impl ThemeVariant for Jellyfish {
    fn kind(&self) -> ThemeKind {
        ThemeKind::Jellyfish
    }

    fn create_entity(&self, ctx: &SpawnContext<'_>, rng: &mut Pcg32) -> ShapeSet {
        let tuning = ctx.tuning;
        let bell_size = sample_range(rng, tuning.size_min, tuning.size_max);
        let tentacles: usize = rng.random_range(4..=8);
        let bell_w = bell_size * BELL_WIDTH;
        let bell_h = bell_size * BELL_HEIGHT;

        let tentacle_lengths: Vec<f32> = (0..tentacles)
            .map(|_| sample_range(rng, TENTACLE_LENGTH.0, TENTACLE_LENGTH.1))
            .collect();
        let spacing = bell_w / (tentacles + 1) as f32;
        let tentacle_offsets: Vec<f32> = (0..tentacles)
            .map(|i| (i + 1) as f32 * spacing - bell_w / 2.0)
            .collect();
        let longest = tentacle_lengths.iter().copied().fold(0.0_f32, f32::max);

        // Keep room for the fully pulsed bell plus its tentacles
        let footprint = Vec2::new(bell_w, bell_h + longest) * PULSE_SCALE_MAX;
        let pos = random_position(ctx.viewport, tuning.extent_padding, footprint, rng);

        let secondaries = tentacle_lengths
            .iter()
            .map(|&len| {
                let mut tentacle = Secondary::new(Vec2::new(TENTACLE_WIDTH, len));
                tentacle.animation_duration = Some(sample_range(rng, TENTACLE_PERIOD.0, TENTACLE_PERIOD.1));
                tentacle
            })
            .collect();

        let rotation_speed = sample_range(rng, tuning.rotation_min, tuning.rotation_max) * direction(rng);

        let mut set = ShapeSet {
            id: ctx.id,
            kind: ThemeKind::Jellyfish,
            primary: Primary {
                pos,
                width: bell_w,
                height: bell_h,
            },
            secondaries,
            vel: Vec2::new(
                spread(rng, tuning.velocity_x),
                spread(rng, tuning.velocity_y) - UPWARD_BIAS,
            ),
            angle: spread(rng, 30.0),
            rotation_speed,
            size: bell_size,
            birth_tick: ctx.birth_tick,
            visual: VisualState::default(),
            params: ThemeParams::Jellyfish {
                bell_size,
                tentacle_offsets,
                tentacle_lengths,
            },
        };
        self.place_secondaries(&mut set);
        set
    }

    fn boundary_box(&self, set: &ShapeSet) -> Option<Vec2> {
        set.has_geometry().then(|| set.box_size())
    }

    fn place_secondaries(&self, set: &mut ShapeSet) {
        // Bell still at scale 0: leave tentacles where they are
        if !set.has_geometry() {
            return;
        }
        let ThemeParams::Jellyfish { tentacle_offsets, .. } = &set.params else {
            return;
        };
        let center = set.center();
        let bell_bottom = center.y + set.measured_size().y / 2.0;
        for (tentacle, offset) in set.secondaries.iter_mut().zip(tentacle_offsets) {
            tentacle.pos = Vec2::new(center.x + offset - TENTACLE_WIDTH / 2.0, bell_bottom);
        }
    }

    fn on_pulse(&self, set: &mut ShapeSet, rng: &mut Pcg32) {
        for tentacle in &mut set.secondaries {
            tentacle.animation_duration = Some(sample_range(rng, TENTACLE_PERIOD.0, TENTACLE_PERIOD.1));
        }
    }
}
