//! Effect tiers
//!
//! Four ordered phases gated by the cumulative correct-answer count `c`.
//! With the default multipliers:
//!
//! | Tier      | Range          |
//! |-----------|----------------|
//! | Building  | c < 2X         |
//! | Colors    | 2X <= c < 3X   |
//! | Pulse     | 3X <= c < 4X   |
//! | ColorWave | c >= 4X        |

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Tier {
    #[default]
    Building,
    Colors,
    Pulse,
    ColorWave,
}

impl Tier {
    pub fn for_count(count: u32, thresholds: &TierThresholds) -> Self {
        if count >= thresholds.wave_start() {
            Tier::ColorWave
        } else if count >= thresholds.pulse_start() {
            Tier::Pulse
        } else if count >= thresholds.color_start() {
            Tier::Colors
        } else {
            Tier::Building
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Building => "Building",
            Tier::Colors => "Colors",
            Tier::Pulse => "Pulse",
            Tier::ColorWave => "Color-Wave",
        }
    }
}

/// Threshold X and the tier multipliers derived from config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierThresholds {
    pub x: u32,
    pub color: u32,
    pub pulse: u32,
    pub wave: u32,
}

impl TierThresholds {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            x: config.threshold_x.max(1),
            color: config.color_multiplier,
            pulse: config.pulse_multiplier,
            wave: config.wave_multiplier,
        }
    }

    pub fn color_start(&self) -> u32 {
        self.color.saturating_mul(self.x)
    }

    pub fn pulse_start(&self) -> u32 {
        self.pulse.saturating_mul(self.x)
    }

    pub fn wave_start(&self) -> u32 {
        self.wave.saturating_mul(self.x)
    }

    /// A color wave fires on every multiple of X inside the top tier
    pub fn is_wave_tick(&self, count: u32) -> bool {
        count >= self.wave_start() && count % self.x == 0
    }
}

/// One effect to apply after a correct answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectAction {
    /// First entry into the colors tier: color every aged entity
    ActivateColors,
    /// Color one more aged entity
    ColorOne,
    /// Pulse one aged entity
    PulseOne,
    /// Staggered recolor of every aged entity
    ColorWave,
}

/// Effects for the correct answer that brought the count to `count`.
///
/// Aging runs before these, so newly aged entities are already eligible.
pub fn plan_correct(count: u32, thresholds: &TierThresholds, colors_activated: bool) -> Vec<EffectAction> {
    match Tier::for_count(count, thresholds) {
        Tier::Building => Vec::new(),
        Tier::Colors if colors_activated => vec![EffectAction::ColorOne],
        Tier::Colors => vec![EffectAction::ActivateColors, EffectAction::ColorOne],
        Tier::Pulse => vec![EffectAction::PulseOne],
        Tier::ColorWave if thresholds.is_wave_tick(count) => {
            vec![EffectAction::PulseOne, EffectAction::ColorWave]
        }
        Tier::ColorWave => vec![EffectAction::PulseOne],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x5() -> TierThresholds {
        TierThresholds::from_config(&EngineConfig::default())
    }

    #[test]
    fn test_tier_boundaries() {
        let t = x5();
        assert_eq!(Tier::for_count(0, &t), Tier::Building);
        assert_eq!(Tier::for_count(9, &t), Tier::Building);
        assert_eq!(Tier::for_count(10, &t), Tier::Colors);
        assert_eq!(Tier::for_count(14, &t), Tier::Colors);
        assert_eq!(Tier::for_count(15, &t), Tier::Pulse);
        assert_eq!(Tier::for_count(19, &t), Tier::Pulse);
        assert_eq!(Tier::for_count(20, &t), Tier::ColorWave);
    }

    #[test]
    fn test_plan() {
        let t = x5();
        assert!(plan_correct(9, &t, false).is_empty());
        assert_eq!(
            plan_correct(10, &t, false),
            vec![EffectAction::ActivateColors, EffectAction::ColorOne]
        );
        assert_eq!(plan_correct(11, &t, true), vec![EffectAction::ColorOne]);
        assert_eq!(plan_correct(15, &t, true), vec![EffectAction::PulseOne]);
        assert_eq!(
            plan_correct(20, &t, true),
            vec![EffectAction::PulseOne, EffectAction::ColorWave]
        );
        assert_eq!(plan_correct(21, &t, true), vec![EffectAction::PulseOne]);
        assert!(plan_correct(25, &t, true).contains(&EffectAction::ColorWave));
    }

    #[test]
    fn test_starts_saturate() {
        let t = TierThresholds {
            x: u32::MAX,
            color: 2,
            pulse: 3,
            wave: 4,
        };
        assert_eq!(t.color_start(), u32::MAX);
        assert_eq!(t.wave_start(), u32::MAX);
        assert_eq!(Tier::for_count(1_000, &t), Tier::Building);
    }

    #[test]
    fn test_wave_tick_only_in_top_tier() {
        let t = x5();
        assert!(!t.is_wave_tick(15));
        assert!(t.is_wave_tick(20));
        assert!(!t.is_wave_tick(22));
    }
}
