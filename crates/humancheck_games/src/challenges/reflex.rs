//! Reflex pattern game: click while the winning pattern is on screen.
//!
//! A target orbits a circular arena along one of five parametric curves,
//! switching curves on a fixed cadence. Exactly one curve wins; clicking
//! during any other loses. The model works in scaled elapsed
//! milliseconds; wall-clock scaling belongs to the caller.

use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::{info, instrument};

/// Arena radius in layout units; the arena is a circle centered at
/// (`RADIUS`, `RADIUS`).
pub const RADIUS: f64 = 200.0;

/// How long each pattern stays active, in scaled milliseconds.
pub const PATTERN_DURATION_MS: u64 = 5_000;

/// Factor the caller applies to wall-clock time before querying the model.
pub const SPEED_MULTIPLIER: u64 = 3;

/// A point in arena coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

/// Parametric target paths, in rotation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MotionPattern {
    /// Interleaved sine/cosine drift.
    ChaoticButterfly,
    /// Lissajous curve with phase wobble.
    RandomLissajous,
    /// Wobbling circular orbit; the winning pattern.
    SpiralChaos,
    /// Zigzag with slowly varying amplitude.
    RandomZigzag,
    /// Orbit with mismatched angular rates.
    ErraticOrbit,
}

impl MotionPattern {
    /// Number of patterns in rotation.
    pub const COUNT: usize = 5;

    /// Target position at scaled time `t` milliseconds.
    pub fn position(self, t: f64) -> Point {
        let center = RADIUS;
        match self {
            MotionPattern::ChaoticButterfly => Point {
                x: center + (t * 0.01).sin() * (t * 0.005).cos() * (RADIUS * 0.7),
                y: center + (t * 0.01).cos() * (t * 0.005).sin() * (RADIUS * 0.7),
            },
            MotionPattern::RandomLissajous => Point {
                x: center + (t * 0.008 + (t * 0.002).cos()).sin() * (RADIUS * 0.7),
                y: center + (t * 0.006 + (t * 0.003).sin()).cos() * (RADIUS * 0.7),
            },
            MotionPattern::SpiralChaos => {
                let angle = t * 0.01;
                let wobble = (t * 0.005).sin() * 30.0;
                Point {
                    x: center + angle.cos() * (RADIUS * 0.5 + wobble),
                    y: center + angle.sin() * (RADIUS * 0.5 + wobble),
                }
            }
            MotionPattern::RandomZigzag => Point {
                x: center + (t * 0.02).cos() * (RADIUS * 0.7) * (t * 0.001).sin(),
                y: center + (t * 0.03).sin() * (RADIUS * 0.7) * (t * 0.001).cos(),
            },
            MotionPattern::ErraticOrbit => {
                let base_angle = t * 0.015;
                let variation = (t * 0.003).sin() * 0.3;
                Point {
                    x: center + base_angle.cos() * (RADIUS * (0.4 + variation)),
                    y: center + (base_angle * 1.5).sin() * (RADIUS * (0.4 + variation)),
                }
            }
        }
    }

    /// True for the pattern a correct click must land on.
    pub fn is_winning(self) -> bool {
        self == MotionPattern::SpiralChaos
    }
}

/// Click verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickOutcome {
    /// Clicked during the winning pattern.
    Won,
    /// Clicked during any other pattern.
    Lost,
}

/// Reflex game model; one click decides the round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReflexGame {
    outcome: Option<ClickOutcome>,
}

impl ReflexGame {
    /// Starts an undecided round.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pattern active at scaled time `t_ms`.
    pub fn pattern_at(t_ms: u64) -> MotionPattern {
        let slot = (t_ms / PATTERN_DURATION_MS) as usize % MotionPattern::COUNT;
        MotionPattern::iter()
            .nth(slot)
            .unwrap_or(MotionPattern::ChaoticButterfly)
    }

    /// Target position at scaled time `t_ms`.
    pub fn target_at(t_ms: u64) -> Point {
        Self::pattern_at(t_ms).position(t_ms as f64)
    }

    /// Registers the round's click.
    ///
    /// The first click decides the round; later calls return the same
    /// outcome without re-judging.
    #[instrument(skip(self))]
    pub fn click(&mut self, t_ms: u64) -> ClickOutcome {
        if let Some(decided) = self.outcome {
            return decided;
        }
        let pattern = Self::pattern_at(t_ms);
        let outcome = if pattern.is_winning() {
            ClickOutcome::Won
        } else {
            ClickOutcome::Lost
        };
        info!(t_ms, %pattern, ?outcome, "reflex click judged");
        self.outcome = Some(outcome);
        outcome
    }

    /// The decided outcome, if the round was clicked.
    pub fn outcome(&self) -> Option<ClickOutcome> {
        self.outcome
    }

    /// Restores an undecided round.
    pub fn reset(&mut self) {
        self.outcome = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_order_and_wraparound() {
        assert_eq!(ReflexGame::pattern_at(0), MotionPattern::ChaoticButterfly);
        assert_eq!(ReflexGame::pattern_at(4_999), MotionPattern::ChaoticButterfly);
        assert_eq!(ReflexGame::pattern_at(5_000), MotionPattern::RandomLissajous);
        assert_eq!(ReflexGame::pattern_at(10_000), MotionPattern::SpiralChaos);
        assert_eq!(ReflexGame::pattern_at(20_000), MotionPattern::ErraticOrbit);
        assert_eq!(ReflexGame::pattern_at(25_000), MotionPattern::ChaoticButterfly);
    }

    #[test]
    fn test_click_during_winning_pattern_wins() {
        let mut game = ReflexGame::new();
        assert_eq!(game.click(12_000), ClickOutcome::Won);
        assert_eq!(game.outcome(), Some(ClickOutcome::Won));
    }

    #[test]
    fn test_click_during_other_pattern_loses() {
        let mut game = ReflexGame::new();
        assert_eq!(game.click(0), ClickOutcome::Lost);
    }

    #[test]
    fn test_first_click_decides_the_round() {
        let mut game = ReflexGame::new();
        game.click(0);
        // a later click inside the winning window cannot overturn the loss
        assert_eq!(game.click(12_000), ClickOutcome::Lost);
    }

    #[test]
    fn test_reset_clears_the_outcome() {
        let mut game = ReflexGame::new();
        game.click(0);
        game.reset();
        assert_eq!(game.outcome(), None);
        assert_eq!(game.click(12_000), ClickOutcome::Won);
    }

    #[test]
    fn test_target_stays_inside_the_arena() {
        for t in (0..60_000).step_by(250) {
            let p = ReflexGame::target_at(t);
            assert!(p.x >= 0.0 && p.x <= RADIUS * 2.0, "x out of arena at t={t}");
            assert!(p.y >= 0.0 && p.y <= RADIUS * 2.0, "y out of arena at t={t}");
        }
    }

    #[test]
    fn test_winning_pattern_is_spiral_chaos() {
        let winners: Vec<_> = MotionPattern::iter().filter(|p| p.is_winning()).collect();
        assert_eq!(winners, vec![MotionPattern::SpiralChaos]);
    }
}
