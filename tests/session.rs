//! End-to-end answer sessions through the orchestrator

use maya_visuals::sim::{Tier, Viewport};
use maya_visuals::{Counts, EngineConfig, HintKind, ThemeKind, VisualManager};

const FRAME_MS: f64 = 16.0;

fn session(theme: &str) -> VisualManager {
    let mut manager = VisualManager::new(EngineConfig::default());
    manager.set_viewport(Viewport::new(1280.0, 800.0));
    manager.initialize(theme);
    manager
}

/// Drive frames for `ms` of host time
fn run_for(manager: &mut VisualManager, now: &mut f64, ms: f64) {
    let end = *now + ms;
    while *now < end {
        *now += FRAME_MS;
        manager.frame(*now);
    }
}

fn colored(manager: &VisualManager) -> Vec<bool> {
    manager
        .theme()
        .map(|t| t.sets().map(|s| s.is_colored()).collect())
        .unwrap_or_default()
}

#[test]
fn twenty_correct_answers() {
    let mut m = session("aurora");
    let mut now = 0.0;

    m.on_correct();
    assert_eq!(m.theme().unwrap().len(), 1);
    assert_eq!(colored(&m), vec![false]);

    for _ in 2..=5 {
        m.on_correct();
        run_for(&mut m, &mut now, 100.0);
    }
    assert!(colored(&m).iter().all(|c| !c));

    // First entity is now X answers old and flips to color while still building
    m.on_correct();
    assert_eq!(m.tier(), Tier::Building);
    assert_eq!(colored(&m), vec![true, false, false, false, false, false]);

    for _ in 7..=9 {
        m.on_correct();
    }
    assert!(!m.theme().unwrap().colors_activated());

    m.on_correct();
    assert_eq!(m.counts().correct, 10);
    assert_eq!(m.tier(), Tier::Colors);
    assert!(m.theme().unwrap().colors_activated());
    // Entities born at ticks 1..=5 are aged and colored
    assert_eq!(colored(&m).iter().filter(|c| **c).count(), 5);

    for _ in 11..=15 {
        m.on_correct();
    }
    assert_eq!(m.tier(), Tier::Pulse);
    assert_eq!(m.theme().unwrap().len(), 15);
    assert!(m.theme().unwrap().sets().any(|s| s.visual.pulsing));

    for _ in 16..=19 {
        m.on_correct();
    }
    assert_eq!(m.theme().unwrap().waves_triggered(), 0);

    m.on_correct();
    assert_eq!(m.tier(), Tier::ColorWave);
    assert_eq!(m.theme().unwrap().len(), 15);
    assert_eq!(m.theme().unwrap().waves_triggered(), 1);
    assert_eq!(m.theme().unwrap().ripples().len(), 1);
    assert_eq!(m.hint().message, "Color Wave 1");

    // Ripple, cascade and wave pulses all play out, then only physics remains
    run_for(&mut m, &mut now, 5000.0);
    let theme = m.theme().unwrap();
    assert!(theme.ripples().is_empty());
    assert!(theme.sets().all(|s| !s.visual.wave_pulse));
    assert!(theme.sets().filter(|s| s.is_aged(20, 5)).all(|s| s.is_colored()));
    assert_eq!(theme.pending_tasks(), 0);
}

#[test]
fn three_wrongs_and_two_skips_reset_everything() {
    let mut m = session("jellyfish");
    for _ in 0..8 {
        m.on_correct();
    }

    m.on_wrong();
    m.on_wrong();
    m.on_wrong();
    m.on_skip();
    assert_eq!(m.counts(), Counts { correct: 8, wrong: 3, skip: 1 });
    assert_eq!(m.theme().unwrap().len(), 4);
    assert_eq!(m.hint().kind, HintKind::Warning);
    assert_eq!(m.hint().description, "1 more until reset (4/5)");

    m.on_skip();
    assert_eq!(m.counts(), Counts::default());
    assert!(m.theme().unwrap().is_empty());
    assert!(!m.theme().unwrap().colors_activated());
    assert_eq!(m.tier(), Tier::Building);
    assert_eq!(m.hint().message, "Starting");
}

#[test]
fn correct_answer_clears_penalty_but_keeps_streak() {
    let mut m = session("firefly");
    for _ in 0..3 {
        m.on_correct();
    }
    m.on_wrong();
    m.on_skip();
    m.on_wrong();
    m.on_skip();
    m.on_correct();
    assert_eq!(m.counts(), Counts { correct: 4, wrong: 0, skip: 0 });

    // The earlier penalty no longer counts toward a reset
    for _ in 0..4 {
        m.on_wrong();
    }
    assert_eq!(m.counts().correct, 4);
}

#[test]
fn empty_pool_goes_idle() {
    let mut m = session("pearl");
    let mut now = 0.0;
    assert!(!m.frame(16.0));

    m.on_correct();
    assert!(m.frame(32.0));
    m.on_reset();
    run_for(&mut m, &mut now, 1000.0);
    assert!(!m.frame(now + FRAME_MS));
    assert!(!m.theme().unwrap().is_animating());
}

#[test]
fn every_theme_survives_a_long_session() {
    for kind in ThemeKind::ALL {
        let mut m = session(kind.as_str());
        let mut now = 0.0;
        for i in 0..40 {
            if i % 7 == 6 {
                m.on_wrong();
            } else {
                m.on_correct();
            }
            run_for(&mut m, &mut now, 250.0);
            assert!(m.theme().unwrap().len() <= m.max_capacity() as usize);
        }
        let snap = m.theme().unwrap().snapshot();
        assert_eq!(snap.theme, kind);
        for set in &snap.live {
            assert!(set.primary.pos.is_finite());
            assert!(set.vel.is_finite());
        }
    }
}

#[test]
fn viewport_shrink_pulls_entities_inside() {
    let mut m = session("mushroom");
    let mut now = 0.0;
    for _ in 0..6 {
        m.on_correct();
    }
    run_for(&mut m, &mut now, 1000.0);

    let small = Viewport::new(600.0, 500.0);
    m.set_viewport(small);
    for set in m.theme().unwrap().sets() {
        let c = set.center();
        assert!(c.x >= 0.0 && c.x <= small.width);
        assert!(c.y >= 0.0 && c.y <= small.height);
    }
}
