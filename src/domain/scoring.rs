//! Scoring policies: indicator set -> integer score.
//!
//! Two interchangeable strategies:
//! - [`StrictRules`]: independent binary thresholds worth 20 points each
//!   (0..=100, step 20), with an optional flat penalty on a falling medium
//!   change.
//! - [`GraduatedRules`]: ordered bands per indicator, highest qualifying band
//!   only, summed across three indicators (0..=100).
//!
//! Scores are pure functions of the indicator set. Undefined figures never
//! earn points; whether they disqualify an instrument is decided by the
//! scanner via [`ScoringPolicy::required_indicators`].

use crate::domain::indicator::{IndicatorKind, Metric};
use crate::domain::indicator_set::IndicatorSet;
use std::fmt;

pub const STRICT_STEP: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penalty {
    /// Applied when the medium change is strictly below this (percent).
    pub threshold: f64,
    pub points: i32,
}

impl Default for Penalty {
    fn default() -> Self {
        Self {
            threshold: -5.0,
            points: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrictRules {
    pub short_threshold: f64,
    pub medium_threshold: f64,
    pub long_threshold: f64,
    pub rsi_ceiling: f64,
    pub volume_multiple: f64,
    pub penalty: Option<Penalty>,
    pub clamp_at_zero: bool,
}

impl StrictRules {
    /// Thresholds 2% / 5% / 10%.
    pub fn standard() -> Self {
        Self {
            short_threshold: 2.0,
            medium_threshold: 5.0,
            long_threshold: 10.0,
            rsi_ceiling: 70.0,
            volume_multiple: 1.5,
            penalty: None,
            clamp_at_zero: true,
        }
    }

    /// Thresholds 5% / 8% / 15%.
    pub fn aggressive() -> Self {
        Self {
            short_threshold: 5.0,
            medium_threshold: 8.0,
            long_threshold: 15.0,
            ..Self::standard()
        }
    }

    pub fn score(&self, set: &IndicatorSet) -> i32 {
        let above = |metric: Metric, threshold: f64| metric.value().is_some_and(|v| v > threshold);

        let mut score = 0;
        if above(set.short_change, self.short_threshold) {
            score += STRICT_STEP;
        }
        if above(set.medium_change, self.medium_threshold) {
            score += STRICT_STEP;
        }
        if above(set.long_change, self.long_threshold) {
            score += STRICT_STEP;
        }
        if set.rsi.value().is_some_and(|rsi| rsi < self.rsi_ceiling) {
            score += STRICT_STEP;
        }
        if above(set.volume_ratio, self.volume_multiple) {
            score += STRICT_STEP;
        }

        if let Some(penalty) = self.penalty {
            if set
                .medium_change
                .value()
                .is_some_and(|v| v < penalty.threshold)
            {
                score -= penalty.points;
            }
        }

        if self.clamp_at_zero { score.max(0) } else { score }
    }
}

impl Default for StrictRules {
    fn default() -> Self {
        Self::standard()
    }
}

/// One band: values meeting `min` earn `points`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub min: f64,
    pub points: i32,
    /// Whether `min` itself qualifies.
    pub inclusive: bool,
}

impl Band {
    const fn at_least(min: f64, points: i32) -> Self {
        Self {
            min,
            points,
            inclusive: true,
        }
    }

    const fn above(min: f64, points: i32) -> Self {
        Self {
            min,
            points,
            inclusive: false,
        }
    }

    fn matches(&self, value: f64) -> bool {
        if self.inclusive {
            value >= self.min
        } else {
            value > self.min
        }
    }
}

/// Points for the first band (highest first) that `value` qualifies for.
fn band_points(bands: &[Band], value: Option<f64>) -> i32 {
    value
        .and_then(|v| bands.iter().find(|b| b.matches(v)))
        .map_or(0, |b| b.points)
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraduatedRules {
    pub change_bands: Vec<Band>,
    pub volume_bands: Vec<Band>,
    /// Bands on closeness of RSI to 50: `min` is the negated half-width, so
    /// a band of `-5.0` covers [45, 55].
    pub rsi_bands: Vec<Band>,
}

impl Default for GraduatedRules {
    fn default() -> Self {
        Self {
            change_bands: vec![
                Band::at_least(30.0, 40),
                Band::at_least(15.0, 30),
                Band::at_least(5.0, 20),
                Band::above(0.0, 10),
            ],
            volume_bands: vec![
                Band::at_least(2.0, 30),
                Band::at_least(1.5, 20),
                Band::at_least(1.2, 10),
            ],
            rsi_bands: vec![
                Band::at_least(-5.0, 30),
                Band::at_least(-10.0, 20),
                Band::at_least(-15.0, 10),
            ],
        }
    }
}

impl GraduatedRules {
    pub fn change_points(&self, set: &IndicatorSet) -> i32 {
        band_points(&self.change_bands, set.short_change.value())
    }

    pub fn volume_points(&self, set: &IndicatorSet) -> i32 {
        band_points(&self.volume_bands, set.volume_ratio.value())
    }

    pub fn rsi_points(&self, set: &IndicatorSet) -> i32 {
        let closeness = set.rsi.value().map(|rsi| -(rsi - 50.0).abs());
        band_points(&self.rsi_bands, closeness)
    }

    pub fn score(&self, set: &IndicatorSet) -> i32 {
        self.change_points(set) + self.volume_points(set) + self.rsi_points(set)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScoringPolicy {
    Strict(StrictRules),
    Graduated(GraduatedRules),
}

impl ScoringPolicy {
    pub fn score(&self, set: &IndicatorSet) -> i32 {
        match self {
            ScoringPolicy::Strict(rules) => rules.score(set),
            ScoringPolicy::Graduated(rules) => rules.score(set),
        }
    }

    /// Figures the policy reads; an undefined one means the score is
    /// computed on partial information.
    pub fn required_indicators(&self) -> &'static [IndicatorKind] {
        match self {
            ScoringPolicy::Strict(_) => &[
                IndicatorKind::ShortChange,
                IndicatorKind::MediumChange,
                IndicatorKind::LongChange,
                IndicatorKind::Rsi,
                IndicatorKind::VolumeRatio,
            ],
            ScoringPolicy::Graduated(_) => &[
                IndicatorKind::ShortChange,
                IndicatorKind::VolumeRatio,
                IndicatorKind::Rsi,
            ],
        }
    }

    /// Default for the disqualify-on-undefined switch.
    pub fn requires_all_by_default(&self) -> bool {
        matches!(self, ScoringPolicy::Strict(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScoringPolicy::Strict(_) => "strict",
            ScoringPolicy::Graduated(_) => "graduated",
        }
    }
}

impl fmt::Display for ScoringPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringPolicy::Strict(r) => {
                write!(
                    f,
                    "strict(short>{}%, medium>{}%, long>{}%, rsi<{}, volume>{}x",
                    r.short_threshold,
                    r.medium_threshold,
                    r.long_threshold,
                    r.rsi_ceiling,
                    r.volume_multiple
                )?;
                if let Some(p) = r.penalty {
                    write!(f, ", -{} if medium<{}%", p.points, p.threshold)?;
                }
                write!(f, ")")
            }
            ScoringPolicy::Graduated(_) => write!(f, "graduated(change, volume, rsi bands)"),
        }
    }
}
