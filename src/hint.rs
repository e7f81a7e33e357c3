//! On-screen progress hints
//!
//! Derived purely from the answer counters and the birth ticks of the live
//! pool, so the host can ask for a hint at any time.

use serde::{Deserialize, Serialize};

use crate::sim::tier::{Tier, TierThresholds};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintKind {
    #[default]
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hint {
    pub message: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: HintKind,
    /// Progress through the current phase in [0, 1]
    pub progress: f32,
}

impl Hint {
    fn info(message: impl Into<String>, description: impl Into<String>, progress: f32) -> Self {
        Self {
            message: message.into(),
            description: description.into(),
            kind: HintKind::Info,
            progress: progress.clamp(0.0, 1.0),
        }
    }

    fn warning(description: impl Into<String>, progress: f32) -> Self {
        Self {
            message: "Reset Warning".to_string(),
            description: description.into(),
            kind: HintKind::Warning,
            progress: progress.clamp(0.0, 1.0),
        }
    }
}

impl Default for Hint {
    fn default() -> Self {
        Self::info("Starting", "New elements appear with each correct answer", 0.0)
    }
}

fn ratio(num: u32, den: u32) -> f32 {
    if den == 0 { 1.0 } else { num as f32 / den as f32 }
}

/// Answer at which the next still-grayscale entity ages into color
fn next_color_time(correct: u32, x: u32, birth_ticks: &[u32]) -> u32 {
    birth_ticks
        .iter()
        .map(|&b| b.saturating_add(x))
        .filter(|&t| t > correct)
        .min()
        // The next entity is born on the next answer and ages X answers later
        .unwrap_or(correct.saturating_add(x).saturating_add(1))
}

/// Status hint for the current counters and pool.
///
/// Any pending wrong/skip penalty takes priority over phase progress.
pub fn compute_hint(correct: u32, wrong: u32, skip: u32, thresholds: &TierThresholds, birth_ticks: &[u32]) -> Hint {
    let x = thresholds.x;
    let penalty = wrong.saturating_add(skip);
    if penalty > 0 {
        let remaining = x.saturating_sub(penalty);
        return if remaining == 0 {
            Hint::warning("Next wrong/skip resets all effects", 1.0)
        } else {
            Hint::warning(
                format!("{remaining} more until reset ({penalty}/{x})"),
                ratio(penalty, x),
            )
        };
    }

    if correct == 0 {
        return Hint::default();
    }

    let (color, pulse, wave) = (
        thresholds.color_start(),
        thresholds.pulse_start(),
        thresholds.wave_start(),
    );

    match Tier::for_count(correct, thresholds) {
        Tier::Building => {
            let progress = ratio(correct, color);
            let any_aged = birth_ticks.iter().any(|&b| correct >= b.saturating_add(x));
            if any_aged {
                let remaining = color - correct;
                return Hint::info(
                    "Colors Active",
                    format!("{remaining} more until color phase (enhanced effects)"),
                    progress,
                );
            }
            let until = next_color_time(correct, x, birth_ticks) - correct;
            if until > 1 {
                Hint::info("Building", format!("{until} more until first elements color"), progress)
            } else {
                Hint::info("Almost There", "1 more until first elements color", progress)
            }
        }
        Tier::Colors => Hint::info(
            "Colors Active",
            format!("Color after {x} answers. {} more until pulse", pulse - correct),
            ratio(correct - color, pulse - color),
        ),
        Tier::Pulse => Hint::info(
            "Pulse Active",
            format!("Aged elements pulse. {} more until color wave", wave - correct),
            ratio(correct - pulse, wave - pulse),
        ),
        Tier::ColorWave => {
            let since = correct - wave;
            let next_multiple = (correct / x + 1).saturating_mul(x);
            Hint::info(
                format!("Color Wave {}", since / x + 1),
                format!("{} more until next color wave", next_multiple - correct),
                ratio(since % x, x),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn t() -> TierThresholds {
        TierThresholds::from_config(&EngineConfig::default())
    }

    #[test]
    fn test_starting() {
        let hint = compute_hint(0, 0, 0, &t(), &[]);
        assert_eq!(hint.message, "Starting");
        assert_eq!(hint.progress, 0.0);
    }

    #[test]
    fn test_building_counts_down_to_first_color() {
        let hint = compute_hint(1, 0, 0, &t(), &[1]);
        assert_eq!(hint.message, "Building");
        assert_eq!(hint.description, "5 more until first elements color");

        let hint = compute_hint(5, 0, 0, &t(), &[1, 2, 3, 4, 5]);
        assert_eq!(hint.message, "Almost There");
        assert!((hint.progress - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_colors_active_before_phase() {
        let hint = compute_hint(7, 0, 0, &t(), &[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(hint.message, "Colors Active");
        assert_eq!(hint.description, "3 more until color phase (enhanced effects)");
    }

    #[test]
    fn test_tier_hints() {
        let hint = compute_hint(12, 0, 0, &t(), &[]);
        assert_eq!(hint.description, "Color after 5 answers. 3 more until pulse");
        assert!((hint.progress - 0.4).abs() < 1e-6);

        let hint = compute_hint(15, 0, 0, &t(), &[]);
        assert_eq!(hint.message, "Pulse Active");
        assert_eq!(hint.description, "Aged elements pulse. 5 more until color wave");

        let hint = compute_hint(20, 0, 0, &t(), &[]);
        assert_eq!(hint.message, "Color Wave 1");
        assert_eq!(hint.description, "5 more until next color wave");
        assert_eq!(hint.progress, 0.0);

        let hint = compute_hint(27, 0, 0, &t(), &[]);
        assert_eq!(hint.message, "Color Wave 2");
        assert_eq!(hint.description, "3 more until next color wave");
    }

    #[test]
    fn test_penalty_warning() {
        let hint = compute_hint(8, 2, 1, &t(), &[]);
        assert_eq!(hint.kind, HintKind::Warning);
        assert_eq!(hint.description, "2 more until reset (3/5)");
        assert!((hint.progress - 0.6).abs() < 1e-6);

        let hint = compute_hint(8, 3, 2, &t(), &[]);
        assert_eq!(hint.description, "Next wrong/skip resets all effects");
        assert_eq!(hint.progress, 1.0);
    }

    #[test]
    fn test_serializes_type_field() {
        let json = serde_json::to_string(&Hint::default()).unwrap();
        assert!(json.contains("\"type\":\"info\""));
    }
}
