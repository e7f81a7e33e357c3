//! A live theme instance
//!
//! Owns the entity pool, the fading entities, the deferred task queue and the
//! RNG for one theme. The host drives it with [`ThemeEngine::frame`] once per
//! display frame and stops calling when it returns `false`.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::consts::{RIPPLE_BASE_DURATION_MS, RIPPLE_STAGGER_MS};
use crate::sim::entity::{ShapeSet, Viewport};
use crate::sim::palette::{DEFAULT_PALETTE, Rgb};
use crate::sim::physics;
use crate::sim::pool::{ColorCount, ShapePool};
use crate::sim::scheduler::{Scheduler, Task};
use crate::themes::{ColoredOpacity, SpawnContext, ThemeKind, apply_color};

/// Ripple radius relative to the larger viewport side
const RIPPLE_RADIUS_FRACTION: f32 = 0.8;

/// An entity removed from the pool, shown while it fades out
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FadingSet {
    pub set: ShapeSet,
    pub started_at: f64,
    pub duration_ms: f64,
}

impl FadingSet {
    /// Remaining opacity factor in [0, 1]
    pub fn remaining(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 0.0;
        }
        (1.0 - (now_ms - self.started_at) / self.duration_ms).clamp(0.0, 1.0) as f32
    }
}

/// One expanding ring of a ripple
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RippleRing {
    pub delay_ms: f64,
    pub duration_ms: f64,
}

/// Full-screen cue shown before a color wave cascade
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ripple {
    pub id: u32,
    pub center: Vec2,
    pub color: Rgb,
    pub max_radius: f32,
    pub started_at: f64,
    pub rings: Vec<RippleRing>,
}

impl Ripple {
    /// Time from start until the last ring finishes
    pub fn total_ms(&self) -> f64 {
        self.rings
            .iter()
            .map(|r| r.delay_ms + r.duration_ms)
            .fold(0.0, f64::max)
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub now_ms: f64,
    pub theme: ThemeKind,
    pub live: Vec<ShapeSet>,
    pub fading: Vec<FadingView>,
    pub ripples: Vec<Ripple>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FadingView {
    pub set: ShapeSet,
    /// Multiplier on the set's own opacity
    pub fade: f32,
}

pub struct ThemeEngine {
    kind: ThemeKind,
    config: EngineConfig,
    pool: ShapePool,
    fading: Vec<FadingSet>,
    ripples: Vec<Ripple>,
    scheduler: Scheduler,
    rng: Pcg32,
    viewport: Option<Viewport>,
    now_ms: f64,
    /// Physics loop is running
    animating: bool,
    colors_activated: bool,
    next_ripple: u32,
    warned_no_viewport: bool,
    waves: u32,
}

impl ThemeEngine {
    pub fn new(kind: ThemeKind, config: EngineConfig, seed: u64) -> Self {
        Self {
            kind,
            config,
            pool: ShapePool::new(),
            fading: Vec::new(),
            ripples: Vec::new(),
            scheduler: Scheduler::new(),
            rng: Pcg32::seed_from_u64(seed),
            viewport: None,
            now_ms: 0.0,
            animating: false,
            colors_activated: false,
            next_ripple: 0,
            warned_no_viewport: false,
            waves: 0,
        }
    }

    pub fn kind(&self) -> ThemeKind {
        self.kind
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Swap in new tunables; live entities keep their current geometry
    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Live entities, oldest first
    pub fn sets(&self) -> impl Iterator<Item = &ShapeSet> {
        self.pool.iter()
    }

    pub fn birth_ticks(&self) -> Vec<u32> {
        self.pool.birth_ticks()
    }

    pub fn fading(&self) -> &[FadingSet] {
        &self.fading
    }

    pub fn ripples(&self) -> &[Ripple] {
        &self.ripples
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn colors_activated(&self) -> bool {
        self.colors_activated
    }

    /// Color waves started since creation
    pub fn waves_triggered(&self) -> u32 {
        self.waves
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    fn opacity(&self) -> ColoredOpacity {
        ColoredOpacity {
            primary: self.config.colored_primary_opacity,
            secondary: self.config.colored_secondary_opacity,
        }
    }

    /// Attach (or replace) the rendering surface and pull entities back inside it
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
        if viewport.is_degenerate() {
            log::warn!("Ignoring degenerate viewport {}x{}", viewport.width, viewport.height);
            return;
        }
        for set in self.pool.iter_mut() {
            let variant = set.kind.variant();
            let padding = variant.extent_padding(self.config.themes.get(set.kind));
            physics::clamp_into(set, viewport, padding);
        }
    }

    // === Lifecycle ===

    /// Spawn `count` entities tagged with `tick`, evicting the oldest beyond `capacity`
    pub fn birth(&mut self, count: u32, tick: u32, capacity: u32) {
        let count = count.min(capacity);
        if count == 0 {
            return;
        }
        if self.viewport.is_none() && !self.warned_no_viewport {
            log::warn!("No viewport attached, placing {} entities at the origin", self.kind.as_str());
            self.warned_no_viewport = true;
        }

        let evicted = self.pool.make_room(count as usize, capacity as usize);
        self.fade_out(evicted, self.config.fade_out_ms);

        let variant = self.kind.variant();
        let tuning = *self.config.themes.get(self.kind);
        for _ in 0..count {
            let ctx = SpawnContext {
                id: self.pool.next_id(),
                birth_tick: tick,
                viewport: self.viewport,
                tuning: &tuning,
            };
            let set = variant.create_entity(&ctx, &mut self.rng);
            self.pool.push(set);
        }
        self.animating = true;
    }

    /// Show every live entity at full size right away
    pub fn skip_entry_animation(&mut self) {
        for set in self.pool.iter_mut() {
            set.finish_appear();
        }
    }

    /// Fade out up to `count` oldest entities; returns how many were removed
    pub fn end(&mut self, count: u32) -> usize {
        let removed = self.pool.evict_oldest(count as usize);
        let n = removed.len();
        self.fade_out(removed, self.config.fade_out_ms);
        n
    }

    /// Fade out everything and stop the physics loop
    pub fn reset(&mut self) {
        let removed = self.pool.drain_all();
        self.fade_out(removed, self.config.reset_fade_ms);
        self.animating = false;
        self.colors_activated = false;
    }

    fn fade_out(&mut self, sets: Vec<ShapeSet>, duration_ms: f64) {
        if sets.is_empty() {
            return;
        }
        let ids: Vec<u32> = sets.iter().map(|s| s.id).collect();
        self.scheduler.cancel_for(&ids);
        for set in sets {
            self.scheduler.schedule(self.now_ms + duration_ms, Task::Dispose { id: set.id });
            self.fading.push(FadingSet {
                set,
                started_at: self.now_ms,
                duration_ms,
            });
        }
    }

    // === Effects ===

    /// Color every entity whose age reached `x`; returns how many flipped
    pub fn update_shape_aging(&mut self, tick: u32, x: u32) -> usize {
        let opacity = self.opacity();
        self.pool.update_aging(tick, x, opacity, &mut self.rng)
    }

    /// Color `count` aged entities, or start a color wave
    pub fn color(&mut self, count: ColorCount, tick: u32, x: u32) -> usize {
        match count {
            ColorCount::Some(n) => {
                let opacity = self.opacity();
                self.pool.color_aged(n, tick, x, opacity, &mut self.rng)
            }
            ColorCount::Wave => self.color_wave(tick, x),
        }
    }

    /// First entry into the colors tier
    pub fn remove_grayscale_from_all(&mut self, tick: u32, x: u32) -> usize {
        self.colors_activated = true;
        let opacity = self.opacity();
        self.pool.color_all_aged(tick, x, opacity, &mut self.rng)
    }

    pub fn pulse(&mut self, count: u32, tick: u32, x: u32) -> usize {
        self.pool.pulse_aged(count, tick, x, &mut self.rng)
    }

    /// Queue a staggered recolor of every aged entity in random order.
    ///
    /// With a viewport and ripples enabled the cascade waits for the ripple
    /// to finish. Returns the number of entities in the cascade.
    pub fn color_wave(&mut self, tick: u32, x: u32) -> usize {
        let mut targets = self.pool.aged_ids(tick, x);
        targets.shuffle(&mut self.rng);
        self.waves += 1;

        let surface = self.viewport.filter(|v| !v.is_degenerate());
        let start = match surface {
            Some(vp) if self.config.ripple_enabled => self.now_ms + self.spawn_ripple(vp),
            _ => self.now_ms,
        };
        for (i, id) in targets.iter().enumerate() {
            let due = start + i as f64 * self.config.cascade_stagger_ms;
            self.scheduler.schedule(due, Task::CascadeColor { id: *id });
        }

        log::debug!(
            "Color wave {} over {} entities, cascade at {:.0}ms",
            self.waves,
            targets.len(),
            start
        );
        targets.len()
    }

    /// Returns the ripple's total duration
    fn spawn_ripple(&mut self, vp: Viewport) -> f64 {
        let count: u32 = self.rng.random_range(3..=4);
        let color = DEFAULT_PALETTE[self.rng.random_range(0..DEFAULT_PALETTE.len())].stops().0;
        let rings = (0..count)
            .map(|i| RippleRing {
                delay_ms: i as f64 * RIPPLE_STAGGER_MS,
                duration_ms: RIPPLE_BASE_DURATION_MS + i as f64 * RIPPLE_STAGGER_MS,
            })
            .collect();

        let ripple = Ripple {
            id: self.next_ripple,
            center: vp.center(),
            color,
            max_radius: vp.width.max(vp.height) * RIPPLE_RADIUS_FRACTION,
            started_at: self.now_ms,
            rings,
        };
        self.next_ripple = self.next_ripple.wrapping_add(1);

        let total = ripple.total_ms();
        self.scheduler.schedule(self.now_ms + total, Task::RippleCleanup { ripple: ripple.id });
        self.ripples.push(ripple);
        total
    }

    // === Frame loop ===

    /// Run due tasks and one physics step. Returns whether another frame is needed.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        self.now_ms = self.now_ms.max(now_ms);
        self.run_due_tasks();

        if self.animating {
            let tunings = &self.config.themes;
            self.animating = physics::step(self.pool.as_mut_slice(), self.viewport, tunings, &mut self.rng);
        }
        self.needs_frame()
    }

    /// Physics is running or deferred work is pending
    pub fn needs_frame(&self) -> bool {
        self.animating || !self.scheduler.is_empty()
    }

    /// When the next deferred task is due, so an idle host can sleep until then
    pub fn next_wakeup(&self) -> Option<f64> {
        self.scheduler.next_due()
    }

    fn run_due_tasks(&mut self) {
        // Tasks may queue follow-ups that are already due
        loop {
            let due = self.scheduler.pop_due(self.now_ms);
            if due.is_empty() {
                break;
            }
            for (at, task) in due {
                self.run_task(at, task);
            }
        }
    }

    fn run_task(&mut self, at: f64, task: Task) {
        match task {
            Task::Dispose { id } => self.fading.retain(|f| f.set.id != id),
            Task::CascadeColor { id } => {
                let opacity = self.opacity();
                // The entity may have been evicted since the wave started
                let Some(set) = self.pool.get_mut(id) else {
                    return;
                };
                apply_color(set, opacity, &mut self.rng);
                set.visual.wave_pulse = true;
                self.scheduler.schedule(at + self.config.wave_pulse_ms, Task::EndWavePulse { id });
            }
            Task::EndWavePulse { id } => {
                if let Some(set) = self.pool.get_mut(id) {
                    set.visual.wave_pulse = false;
                }
            }
            Task::RippleCleanup { ripple } => self.ripples.retain(|r| r.id != ripple),
        }
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            now_ms: self.now_ms,
            theme: self.kind,
            live: self.pool.iter().cloned().collect(),
            fading: self
                .fading
                .iter()
                .map(|f| FadingView {
                    set: f.set.clone(),
                    fade: f.remaining(self.now_ms),
                })
                .collect(),
            ripples: self.ripples.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(kind: ThemeKind) -> ThemeEngine {
        let mut e = ThemeEngine::new(kind, EngineConfig::default(), 42);
        e.resize(Viewport::new(1280.0, 800.0));
        e
    }

    /// Run frames at 16ms until the engine goes idle or `until` is reached
    fn run_until(e: &mut ThemeEngine, until: f64) {
        let mut t = e.now_ms();
        while t < until {
            t += 16.0;
            e.frame(t);
        }
    }

    #[test]
    fn test_birth_respects_capacity() {
        let mut e = engine(ThemeKind::Pearl);
        e.birth(4, 1, 3);
        assert_eq!(e.len(), 3);
        e.birth(2, 2, 3);
        assert_eq!(e.len(), 3);
        assert_eq!(e.fading().len(), 2);
        assert!(e.is_animating());
    }

    #[test]
    fn test_end_clamps_and_fades() {
        let mut e = engine(ThemeKind::Firefly);
        e.birth(2, 0, 15);
        assert_eq!(e.end(5), 2);
        assert!(e.is_empty());
        assert_eq!(e.fading().len(), 2);
        assert_eq!(e.next_wakeup(), Some(1500.0));
        run_until(&mut e, 1600.0);
        assert!(e.fading().is_empty());
        assert!(!e.needs_frame());
        assert_eq!(e.next_wakeup(), None);
    }

    #[test]
    fn test_idle_engine_needs_no_frames() {
        let mut e = engine(ThemeKind::Jellyfish);
        assert!(!e.frame(16.0));
        assert!(!e.frame(32.0));
        assert!(!e.is_animating());
    }

    #[test]
    fn test_wave_cascade_with_ripple() {
        let mut e = engine(ThemeKind::Aurora);
        e.birth(3, 0, 15);
        let n = e.color(ColorCount::Wave, 5, 5);
        assert_eq!(n, 3);
        assert_eq!(e.ripples().len(), 1);
        let total = e.ripples()[0].total_ms();
        assert!(total == 2000.0 || total == 2300.0);

        // Nothing colored until the ripple finishes
        run_until(&mut e, total - 20.0);
        assert!(e.sets().all(|s| !s.is_colored()));

        run_until(&mut e, total + 200.0);
        assert!(e.sets().all(|s| s.is_colored()));
        assert!(e.ripples().is_empty());
        assert!(e.sets().any(|s| s.visual.wave_pulse));

        run_until(&mut e, total + 1200.0);
        assert!(e.sets().all(|s| !s.visual.wave_pulse));
    }

    #[test]
    fn test_wave_without_viewport_starts_immediately() {
        let mut e = ThemeEngine::new(ThemeKind::Pearl, EngineConfig::default(), 1);
        e.birth(2, 0, 15);
        e.color(ColorCount::Wave, 5, 5);
        assert!(e.ripples().is_empty());
        e.frame(0.0);
        assert_eq!(e.sets().filter(|s| s.is_colored()).count(), 1);
        e.frame(60.0);
        assert!(e.sets().all(|s| s.is_colored()));
    }

    #[test]
    fn test_reset_cancels_cascade() {
        let mut e = engine(ThemeKind::Mushroom);
        e.birth(4, 0, 15);
        e.color(ColorCount::Wave, 5, 5);
        e.reset();
        assert!(e.is_empty());
        assert!(!e.is_animating());
        run_until(&mut e, 5000.0);
        assert!(e.fading().is_empty());
        assert!(!e.needs_frame());
    }

    #[test]
    fn test_aging_and_activation() {
        let mut e = engine(ThemeKind::Maple);
        e.birth(1, 0, 15);
        e.birth(1, 3, 15);
        assert_eq!(e.update_shape_aging(5, 5), 1);
        assert_eq!(e.remove_grayscale_from_all(8, 5), 2);
        assert!(e.colors_activated());
        e.reset();
        assert!(!e.colors_activated());
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut e = engine(ThemeKind::Jellyfish);
        e.birth(2, 0, 15);
        e.end(1);
        e.frame(16.0);
        let snap = e.snapshot();
        assert_eq!(snap.live.len(), 1);
        assert_eq!(snap.fading.len(), 1);
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"Jellyfish\""));
    }
}
