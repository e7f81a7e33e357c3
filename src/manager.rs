//! Session orchestrator
//!
//! Turns the game's answer stream into theme operations. One manager per
//! session; tests build as many isolated instances as they like.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::consts::SAMPLE_COUNT_MIN;
use crate::engine::ThemeEngine;
use crate::hint::{Hint, compute_hint};
use crate::sim::entity::Viewport;
use crate::sim::pool::ColorCount;
use crate::sim::tier::{EffectAction, Tier, TierThresholds, plan_correct};
use crate::themes::ThemeKind;

/// Notified when the active theme changes (e.g. to switch music)
pub trait ThemeObserver {
    fn on_theme_changed(&mut self, theme: ThemeKind);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Effects follow the answer stream
    #[default]
    Game,
    /// Answer events are ignored; effects are triggered by hand
    Sample,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Game => "game",
            Mode::Sample => "sample",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "game" => Some(Mode::Game),
            "sample" | "demo" => Some(Mode::Sample),
            _ => None,
        }
    }
}

/// Answer counters for the current streak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Counts {
    pub correct: u32,
    pub wrong: u32,
    pub skip: u32,
}

impl Counts {
    /// Shared wrong + skip penalty
    pub fn penalty(&self) -> u32 {
        self.wrong.saturating_add(self.skip)
    }
}

pub struct VisualManager {
    config: EngineConfig,
    theme: Option<ThemeEngine>,
    counts: Counts,
    mode: Mode,
    viewport: Option<Viewport>,
    observers: Vec<Box<dyn ThemeObserver>>,
    hint: Hint,
    tier: Tier,
    /// Distinct seed per engine so re-initialising a theme varies the layout
    engines_created: u64,
}

impl Default for VisualManager {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl VisualManager {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config: config.sanitized(),
            theme: None,
            counts: Counts::default(),
            mode: Mode::Game,
            viewport: None,
            observers: Vec::new(),
            hint: Hint::default(),
            tier: Tier::Building,
            engines_created: 0,
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn ThemeObserver>) {
        self.observers.push(observer);
    }

    /// Start (or switch to) a theme. Unknown names fall back to the default theme.
    pub fn initialize(&mut self, theme_name: &str) -> ThemeKind {
        let kind = ThemeKind::from_name(theme_name).unwrap_or_else(|| {
            let fallback = ThemeKind::default();
            log::warn!("Unknown theme '{}', falling back to {}", theme_name, fallback.as_str());
            fallback
        });

        if let Some(old) = self.theme.as_mut() {
            old.reset();
        }

        let seed = self.config.seed.wrapping_add(self.engines_created);
        self.engines_created += 1;
        let mut engine = ThemeEngine::new(kind, self.config.clone(), seed);
        if let Some(vp) = self.viewport {
            engine.resize(vp);
        }
        self.theme = Some(engine);
        self.counts = Counts::default();
        self.tier = Tier::Building;
        log::info!("Theme initialized: {}", kind.as_str());

        for observer in self.observers.iter_mut() {
            observer.on_theme_changed(kind);
        }

        if self.mode == Mode::Sample {
            self.sample_birth();
        }
        self.refresh_hint();
        kind
    }

    pub fn theme(&self) -> Option<&ThemeEngine> {
        self.theme.as_ref()
    }

    pub fn theme_kind(&self) -> Option<ThemeKind> {
        self.theme.as_ref().map(|t| t.kind())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn counts(&self) -> Counts {
        self.counts
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn threshold(&self) -> u32 {
        self.config.threshold_x
    }

    pub fn max_capacity(&self) -> u32 {
        self.config.max_capacity()
    }

    fn thresholds(&self) -> TierThresholds {
        TierThresholds::from_config(&self.config)
    }

    /// Change X. Counters and pool start over.
    pub fn set_threshold(&mut self, x: u32) {
        self.config.set_threshold(x);
        if let Some(theme) = self.theme.as_mut() {
            theme.set_config(self.config.clone());
        }
        log::info!("Threshold set to {}", self.config.threshold_x);
        self.on_reset();
    }

    // === Game events ===

    pub fn on_correct(&mut self) {
        if self.mode == Mode::Sample {
            return;
        }
        self.counts.correct += 1;
        self.counts.wrong = 0;
        self.counts.skip = 0;

        let count = self.counts.correct;
        let thresholds = self.thresholds();
        let capacity = self.max_capacity();
        let Some(theme) = self.theme.as_mut() else {
            return;
        };

        theme.birth(1, count, capacity);
        theme.update_shape_aging(count, thresholds.x);
        for action in plan_correct(count, &thresholds, theme.colors_activated()) {
            match action {
                EffectAction::ActivateColors => {
                    theme.remove_grayscale_from_all(count, thresholds.x);
                }
                EffectAction::ColorOne => {
                    theme.color(ColorCount::Some(1), count, thresholds.x);
                }
                EffectAction::PulseOne => {
                    theme.pulse(1, count, thresholds.x);
                }
                EffectAction::ColorWave => {
                    theme.color(ColorCount::Wave, count, thresholds.x);
                }
            }
        }

        let tier = Tier::for_count(count, &thresholds);
        if tier != self.tier {
            log::info!("Tier {} -> {} at {} correct", self.tier.as_str(), tier.as_str(), count);
            self.tier = tier;
        }
        self.refresh_hint();
    }

    pub fn on_wrong(&mut self) {
        if self.mode == Mode::Sample {
            return;
        }
        self.counts.wrong += 1;
        self.penalize();
    }

    pub fn on_skip(&mut self) {
        if self.mode == Mode::Sample {
            return;
        }
        self.counts.skip += 1;
        self.penalize();
    }

    /// Drop one entity; a full wrong + skip streak of X wipes everything
    fn penalize(&mut self) {
        let Some(theme) = self.theme.as_mut() else {
            return;
        };
        theme.end(1);

        let penalty = self.counts.penalty();
        if penalty >= self.config.threshold_x {
            log::info!(
                "Penalty reset after {} wrong + {} skip",
                self.counts.wrong,
                self.counts.skip
            );
            self.on_reset();
            return;
        }
        self.refresh_hint();
    }

    /// Start over: counters to zero and the pool faded out (theme or threshold change)
    pub fn on_reset(&mut self) {
        self.counts = Counts::default();
        self.tier = Tier::Building;
        if let Some(theme) = self.theme.as_mut() {
            theme.reset();
        }
        self.refresh_hint();
    }

    /// Color `count` aged entities at the current tick, or start a color wave
    pub fn color(&mut self, count: ColorCount) -> usize {
        let tick = self.counts.correct;
        let x = self.config.threshold_x;
        self.theme.as_mut().map_or(0, |theme| theme.color(count, tick, x))
    }

    /// Latest hint (refreshed after every game event)
    pub fn hint(&self) -> &Hint {
        &self.hint
    }

    /// Hint computed from the current state
    pub fn get_hint(&self) -> Hint {
        let births = self.theme.as_ref().map(|t| t.birth_ticks()).unwrap_or_default();
        compute_hint(
            self.counts.correct,
            self.counts.wrong,
            self.counts.skip,
            &self.thresholds(),
            &births,
        )
    }

    fn refresh_hint(&mut self) {
        if self.theme.is_none() || self.mode == Mode::Sample {
            return;
        }
        self.hint = self.get_hint();
    }

    // === Host plumbing ===

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
        if let Some(theme) = self.theme.as_mut() {
            theme.resize(viewport);
        }
    }

    /// Advance one display frame; `false` means the host can stop requesting frames
    pub fn frame(&mut self, now_ms: f64) -> bool {
        self.theme.as_mut().is_some_and(|t| t.frame(now_ms))
    }

    pub fn next_wakeup(&self) -> Option<f64> {
        self.theme.as_ref().and_then(|t| t.next_wakeup())
    }

    // === Sample mode ===

    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        log::info!("Mode: {}", mode.as_str());
        match mode {
            Mode::Sample => self.sample_reset(),
            Mode::Game => self.on_reset(),
        }
    }

    pub fn sample_count(&self) -> u32 {
        self.config.sample_count
    }

    pub fn set_sample_count(&mut self, count: u32) {
        self.config.sample_count = count.clamp(SAMPLE_COUNT_MIN, self.max_capacity().max(SAMPLE_COUNT_MIN));
    }

    /// Sample-mode engine, if sample mode is active and a theme is loaded
    fn sample_theme(&mut self) -> Option<&mut ThemeEngine> {
        match self.mode {
            Mode::Sample => self.theme.as_mut(),
            Mode::Game => None,
        }
    }

    /// Fresh batch of `sample_count` entities born at tick 0, shown at full size
    pub fn sample_birth(&mut self) {
        let n = self.config.sample_count;
        if let Some(theme) = self.sample_theme() {
            theme.reset();
            theme.birth(n, 0, n);
            theme.skip_entry_animation();
        }
    }

    /// Make sure there is something to preview
    fn ensure_sample(&mut self) {
        if self.sample_theme().is_some_and(|t| t.is_empty()) {
            self.sample_birth();
        }
    }

    pub fn sample_age(&mut self) {
        self.ensure_sample();
        let x = self.config.threshold_x;
        if let Some(theme) = self.sample_theme() {
            theme.update_shape_aging(x, x);
        }
    }

    pub fn sample_color(&mut self) {
        self.ensure_sample();
        let (x, n) = (self.config.threshold_x, self.config.sample_count);
        if let Some(theme) = self.sample_theme() {
            theme.update_shape_aging(x, x);
            theme.color(ColorCount::Some(n), x, x);
        }
    }

    pub fn sample_pulse(&mut self) {
        self.ensure_sample();
        let (x, n) = (self.config.threshold_x, self.config.sample_count);
        if let Some(theme) = self.sample_theme() {
            theme.update_shape_aging(x, x);
            theme.pulse(n, x, x);
        }
    }

    pub fn sample_wave(&mut self) {
        self.ensure_sample();
        let x = self.config.threshold_x;
        if let Some(theme) = self.sample_theme() {
            theme.update_shape_aging(x, x);
            theme.color(ColorCount::Wave, x, x);
        }
    }

    pub fn sample_end(&mut self) {
        let n = self.config.sample_count;
        if let Some(theme) = self.sample_theme() {
            theme.end(n);
        }
    }

    pub fn sample_reset(&mut self) {
        if let Some(theme) = self.sample_theme() {
            theme.reset();
        }
        self.sample_birth();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<ThemeKind>>>);

    impl ThemeObserver for Recorder {
        fn on_theme_changed(&mut self, theme: ThemeKind) {
            self.0.borrow_mut().push(theme);
        }
    }

    fn manager() -> VisualManager {
        let mut m = VisualManager::default();
        m.set_viewport(Viewport::new(1280.0, 800.0));
        m.initialize("pearl");
        m
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut m = VisualManager::default();
        m.add_observer(Box::new(Recorder(seen.clone())));
        assert_eq!(m.initialize("dragon"), ThemeKind::Jellyfish);
        assert_eq!(m.initialize("Maple"), ThemeKind::Maple);
        assert_eq!(*seen.borrow(), vec![ThemeKind::Jellyfish, ThemeKind::Maple]);
    }

    #[test]
    fn test_correct_clears_penalty() {
        let mut m = manager();
        m.on_correct();
        m.on_wrong();
        m.on_skip();
        assert_eq!(m.counts().penalty(), 2);
        m.on_correct();
        assert_eq!(m.counts(), Counts { correct: 2, wrong: 0, skip: 0 });
    }

    #[test]
    fn test_wrong_removes_oldest() {
        let mut m = manager();
        for _ in 0..3 {
            m.on_correct();
        }
        m.on_wrong();
        let theme = m.theme().unwrap();
        assert_eq!(theme.len(), 2);
        assert_eq!(theme.birth_ticks(), vec![2, 3]);
        assert_eq!(m.hint().message, "Reset Warning");
    }

    #[test]
    fn test_events_without_theme_are_safe() {
        let mut m = VisualManager::default();
        m.on_correct();
        m.on_wrong();
        m.on_skip();
        m.on_reset();
        assert!(!m.frame(16.0));
        assert_eq!(m.hint().message, "Starting");
    }

    #[test]
    fn test_set_threshold_resets() {
        let mut m = manager();
        m.on_correct();
        m.set_threshold(4);
        assert_eq!(m.max_capacity(), 12);
        assert_eq!(m.counts(), Counts::default());
        assert!(m.theme().unwrap().is_empty());
    }

    #[test]
    fn test_host_color_accepts_raw_wave() {
        let mut m = manager();
        assert_eq!(m.color(ColorCount::from_raw(2)), 0);
        for _ in 0..6 {
            m.on_correct();
        }
        // Only the first entity has aged
        assert_eq!(m.color(ColorCount::from_raw(3)), 1);
        assert_eq!(m.color(ColorCount::from_raw(-1)), 1);
        assert_eq!(m.theme().unwrap().waves_triggered(), 1);
        assert!(m.next_wakeup().is_some());
        assert_eq!(m.color(ColorCount::from_raw(-5)), 0);
    }

    #[test]
    fn test_huge_threshold_is_capped() {
        let mut m = manager();
        m.set_threshold(u32::MAX);
        assert_eq!(m.threshold(), crate::consts::MAX_THRESHOLD_X);
        assert_eq!(m.max_capacity(), crate::consts::MAX_THRESHOLD_X * 3);
        m.on_correct();
        m.on_wrong();
        assert_eq!(m.counts().wrong, 1);
        assert_eq!(m.tier(), Tier::Building);
    }

    #[test]
    fn test_sample_mode() {
        let mut m = manager();
        m.on_correct();
        m.set_mode(Mode::Sample);
        assert_eq!(m.theme().unwrap().len(), 5);
        assert!(m.theme().unwrap().sets().all(|s| s.visual.scale == 1.0 && s.visual.opacity == 1.0));

        // Game events are ignored while sampling
        m.on_correct();
        m.on_wrong();
        assert_eq!(m.counts(), Counts::default());
        assert_eq!(m.theme().unwrap().len(), 5);

        m.sample_age();
        assert!(m.theme().unwrap().sets().all(|s| s.is_colored()));

        m.sample_pulse();
        assert!(m.theme().unwrap().sets().all(|s| s.visual.pulsing));

        m.set_sample_count(2);
        m.sample_end();
        assert_eq!(m.theme().unwrap().len(), 3);

        m.sample_reset();
        assert_eq!(m.theme().unwrap().len(), 2);
        assert!(m.theme().unwrap().sets().all(|s| !s.is_colored()));

        m.set_mode(Mode::Game);
        assert!(m.theme().unwrap().is_empty());
    }

    #[test]
    fn test_sample_triggers_birth_when_empty() {
        let mut m = manager();
        m.set_sample_count(3);
        m.set_mode(Mode::Sample);
        m.sample_end();
        assert!(m.theme().unwrap().is_empty());
        m.sample_color();
        assert_eq!(m.theme().unwrap().len(), 3);
        assert!(m.theme().unwrap().sets().all(|s| s.is_colored()));
    }

    #[test]
    fn test_sample_count_clamped() {
        let mut m = manager();
        m.set_sample_count(0);
        assert_eq!(m.sample_count(), 1);
        m.set_sample_count(99);
        assert_eq!(m.sample_count(), 15);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(Mode::from_str("Sample"), Some(Mode::Sample));
        assert_eq!(Mode::from_str("game"), Some(Mode::Game));
        assert_eq!(Mode::from_str("arcade"), None);
    }
}
