//! Health score and performance tier.
//!
//! The score starts at `base` and takes one adjustment per signal:
//! the first bonus band whose threshold the value strictly exceeds,
//! otherwise the signal's penalty if its condition holds. The sum is
//! clamped to [0, 100].

use crate::types::PerformanceTier;
use serde::{Deserialize, Serialize};

pub const MIN_SCORE: i32 = 0;
pub const MAX_SCORE: i32 = 100;

/// Bonus band: `points` when the value is strictly above `above`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub above: f64,
    pub points: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "when", rename_all = "snake_case")]
pub enum Penalty {
    /// Applies when the value is strictly below `value`.
    Below { value: f64, points: i32 },
    /// Applies when the value equals `value` exactly.
    Equals { value: f64, points: i32 },
}

impl Penalty {
    pub fn points(&self) -> i32 {
        match *self {
            Penalty::Below { points, .. } | Penalty::Equals { points, .. } => points,
        }
    }

    fn applies(&self, x: f64) -> Option<i32> {
        match *self {
            Penalty::Below { value, points } if x < value => Some(points),
            Penalty::Equals { value, points } if x == value => Some(points),
            _ => None,
        }
    }
}

/// Piecewise adjustment for one signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRule {
    /// Evaluated in order; put the highest threshold first.
    pub bands: Vec<Band>,
    pub penalty: Option<Penalty>,
}

impl SignalRule {
    fn new(bands: &[(f64, i32)], penalty: Option<Penalty>) -> Self {
        Self {
            bands: bands
                .iter()
                .map(|&(above, points)| Band { above, points })
                .collect(),
            penalty,
        }
    }

    /// Points contributed by `x`. NaN matches nothing.
    pub fn adjustment(&self, x: f64) -> i32 {
        if let Some(band) = self.bands.iter().find(|b| x > b.above) {
            return band.points;
        }
        self.penalty.and_then(|p| p.applies(x)).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTable {
    pub base: i32,
    pub profit: SignalRule,
    pub velocity: SignalRule,
    pub roi: SignalRule,
    pub margin: SignalRule,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            base: 50,
            profit: SignalRule::new(
                &[(500.0, 20), (200.0, 15), (100.0, 10), (50.0, 5)],
                Some(Penalty::Below { value: 0.0, points: -15 }),
            ),
            velocity: SignalRule::new(
                &[(50.0, 15), (25.0, 10), (10.0, 5)],
                Some(Penalty::Equals { value: 0.0, points: -10 }),
            ),
            roi: SignalRule::new(
                &[(50.0, 10), (25.0, 5)],
                Some(Penalty::Below { value: 0.0, points: -10 }),
            ),
            margin: SignalRule::new(
                &[(20.0, 5)],
                Some(Penalty::Below { value: 5.0, points: -5 }),
            ),
        }
    }
}

impl ScoreTable {
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&self.base) {
            return Err(format!("base score {} outside [0, 100]", self.base));
        }
        for (name, rule) in [
            ("profit", &self.profit),
            ("velocity", &self.velocity),
            ("roi", &self.roi),
            ("margin", &self.margin),
        ] {
            let descending = rule.bands.windows(2).all(|w| w[0].above > w[1].above);
            if !descending {
                return Err(format!("{name} bands must have strictly descending thresholds"));
            }
            let penalty_points = rule.penalty.map(|p| p.points());
            let out_of_range = rule
                .bands
                .iter()
                .map(|b| b.points)
                .chain(penalty_points)
                .find(|p| !(-MAX_SCORE..=MAX_SCORE).contains(p));
            if let Some(points) = out_of_range {
                return Err(format!("{name} points {points} outside [-100, 100]"));
            }
        }
        Ok(())
    }
}

/// The four inputs to the health score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HealthSignals {
    pub net_profit: f64,
    pub units_sold: f64,
    pub roi_pct: f64,
    pub margin_pct: f64,
}

impl ScoreTable {
    pub fn score(&self, signals: &HealthSignals) -> u8 {
        // Summed in i64 so unvalidated tables cannot overflow.
        let raw = i64::from(self.base)
            + i64::from(self.profit.adjustment(signals.net_profit))
            + i64::from(self.velocity.adjustment(signals.units_sold))
            + i64::from(self.roi.adjustment(signals.roi_pct))
            + i64::from(self.margin.adjustment(signals.margin_pct));
        // Clamped to [0, 100], so the cast is lossless.
        raw.clamp(i64::from(MIN_SCORE), i64::from(MAX_SCORE)) as u8
    }
}

/// Health score with the built-in table.
pub fn calculate_health_score(signals: &HealthSignals) -> u8 {
    ScoreTable::default().score(signals)
}

/// Minimum score for each tier above `Weak`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierCutoffs {
    pub star: u8,
    pub strong: u8,
    pub average: u8,
}

impl Default for TierCutoffs {
    fn default() -> Self {
        Self { star: 80, strong: 60, average: 45 }
    }
}

impl TierCutoffs {
    pub fn validate(&self) -> Result<(), String> {
        if self.star > 100 || !(self.star > self.strong && self.strong > self.average) {
            return Err(format!(
                "tier cutoffs must satisfy 100 >= star > strong > average, got {}/{}/{}",
                self.star, self.strong, self.average
            ));
        }
        Ok(())
    }

    pub fn tier(&self, score: u8) -> PerformanceTier {
        if score >= self.star {
            PerformanceTier::Star
        } else if score >= self.strong {
            PerformanceTier::Strong
        } else if score >= self.average {
            PerformanceTier::Average
        } else {
            PerformanceTier::Weak
        }
    }
}

pub fn assign_performance_tier(score: u8) -> PerformanceTier {
    TierCutoffs::default().tier(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(net_profit: f64, units_sold: f64, roi_pct: f64, margin_pct: f64) -> HealthSignals {
        HealthSignals { net_profit, units_sold, roi_pct, margin_pct }
    }

    #[test]
    fn best_case_hits_ceiling() {
        assert_eq!(calculate_health_score(&signals(1000.0, 100.0, 80.0, 30.0)), 100);
    }

    #[test]
    fn worst_case_floor() {
        // 50 - 15 - 10 - 10 - 5
        assert_eq!(calculate_health_score(&signals(-10.0, 0.0, -5.0, -1.0)), 10);
    }

    #[test]
    fn thresholds_are_strict() {
        // Exactly 500 profit falls into the >200 band.
        assert_eq!(ScoreTable::default().profit.adjustment(500.0), 15);
        assert_eq!(ScoreTable::default().profit.adjustment(0.0), 0);
        assert_eq!(ScoreTable::default().velocity.adjustment(10.0), 0);
        assert_eq!(ScoreTable::default().velocity.adjustment(0.0), -10);
        // Negative units are not penalised; only exactly zero is.
        assert_eq!(ScoreTable::default().velocity.adjustment(-3.0), 0);
        assert_eq!(ScoreTable::default().margin.adjustment(5.0), 0);
        assert_eq!(ScoreTable::default().margin.adjustment(4.99), -5);
    }

    #[test]
    fn nan_contributes_nothing() {
        assert_eq!(calculate_health_score(&signals(f64::NAN, f64::NAN, f64::NAN, f64::NAN)), 50);
    }

    #[test]
    fn clamp_applies_to_custom_tables() {
        let mut table = ScoreTable::default();
        table.base = 95;
        assert_eq!(table.score(&signals(1000.0, 100.0, 80.0, 30.0)), 100);
        table.base = 0;
        assert_eq!(table.score(&signals(-10.0, 0.0, -5.0, -1.0)), 0);
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(assign_performance_tier(100), PerformanceTier::Star);
        assert_eq!(assign_performance_tier(80), PerformanceTier::Star);
        assert_eq!(assign_performance_tier(79), PerformanceTier::Strong);
        assert_eq!(assign_performance_tier(60), PerformanceTier::Strong);
        assert_eq!(assign_performance_tier(59), PerformanceTier::Average);
        assert_eq!(assign_performance_tier(45), PerformanceTier::Average);
        assert_eq!(assign_performance_tier(44), PerformanceTier::Weak);
        assert_eq!(assign_performance_tier(0), PerformanceTier::Weak);
    }

    #[test]
    fn extreme_points_clamp_without_overflow() {
        let mut table = ScoreTable::default();
        table.profit.bands[0].points = i32::MAX;
        table.velocity.bands[0].points = i32::MAX;
        assert_eq!(table.score(&signals(1000.0, 100.0, 80.0, 30.0)), 100);
        table.profit.penalty = Some(Penalty::Below { value: 0.0, points: i32::MIN });
        table.velocity.penalty = Some(Penalty::Equals { value: 0.0, points: i32::MIN });
        assert_eq!(table.score(&signals(-10.0, 0.0, -5.0, -1.0)), 0);
        assert!(table.validate().is_err());
    }

    #[test]
    fn cutoff_validation() {
        assert!(TierCutoffs::default().validate().is_ok());
        assert!(TierCutoffs { star: 60, strong: 60, average: 45 }.validate().is_err());
        assert!(ScoreTable::default().validate().is_ok());
    }
}
