//! Indicator engine: derives the full indicator set for one instrument.
//!
//! All figures are evaluated at the same reference index, chosen once per
//! scan by [`BarMode`]. Any figure whose window does not fit in the series is
//! reported as undefined; the set itself is only refused when there is no
//! reference observation at all.

use crate::domain::error::FailureCause;
use crate::domain::indicator::change::{ChangeWindow, pct_change_at};
use crate::domain::indicator::potential::potential_at;
use crate::domain::indicator::rsi::rsi_at;
use crate::domain::indicator::volume::{volume_average_at, volume_ratio_at};
use crate::domain::indicator::{IndicatorKind, Metric, Undefined};
use crate::domain::series::{BarMode, Series};

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorConfig {
    pub bar_mode: BarMode,
    pub rsi_period: usize,
    pub volume_window: usize,
    pub short_window: ChangeWindow,
    pub medium_window: ChangeWindow,
    pub long_window: ChangeWindow,
    /// Observations scanned for the high; 0 means the whole series.
    pub high_lookback: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            bar_mode: BarMode::Closed,
            rsi_period: 14,
            volume_window: 24,
            short_window: ChangeWindow::Bars(6),
            medium_window: ChangeWindow::Bars(24),
            long_window: ChangeWindow::SinceStart,
            high_lookback: 0,
        }
    }
}

impl IndicatorConfig {
    /// Series length at which every figure in the set can be defined.
    pub fn full_history_len(&self) -> usize {
        let window_len = |w: ChangeWindow| match w {
            ChangeWindow::Bars(n) => n + 1,
            ChangeWindow::SinceStart => 1,
        };
        let needed = [
            self.rsi_period + 1,
            self.volume_window,
            window_len(self.short_window),
            window_len(self.medium_window),
            window_len(self.long_window),
            self.high_lookback,
            1,
        ]
        .into_iter()
        .max()
        .unwrap_or(1);

        match self.bar_mode {
            BarMode::Closed => needed + 1,
            BarMode::Latest => needed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub reference_index: usize,
    pub close: f64,
    pub volume: f64,
    pub volume_average: Metric,
    pub short_change: Metric,
    pub medium_change: Metric,
    pub long_change: Metric,
    pub rsi: Metric,
    pub volume_ratio: Metric,
    pub potential: Metric,
}

impl IndicatorSet {
    pub fn get(&self, kind: IndicatorKind) -> Metric {
        match kind {
            IndicatorKind::ShortChange => self.short_change,
            IndicatorKind::MediumChange => self.medium_change,
            IndicatorKind::LongChange => self.long_change,
            IndicatorKind::Rsi => self.rsi,
            IndicatorKind::VolumeRatio => self.volume_ratio,
            IndicatorKind::Potential => self.potential,
        }
    }

    /// First of `kinds` that is undefined, in the order given.
    pub fn first_undefined(&self, kinds: &[IndicatorKind]) -> Option<(IndicatorKind, Undefined)> {
        kinds.iter().find_map(|&kind| match self.get(kind) {
            Metric::Undefined(reason) => Some((kind, reason)),
            Metric::Defined(_) => None,
        })
    }
}

pub fn compute_indicator_set(
    series: &Series,
    config: &IndicatorConfig,
) -> Result<IndicatorSet, FailureCause> {
    let reference = config
        .bar_mode
        .reference_index(series.len())
        .ok_or(FailureCause::InsufficientData {
            bars: series.len(),
            minimum: match config.bar_mode {
                BarMode::Closed => 2,
                BarMode::Latest => 1,
            },
        })?;

    let closes = series.closes();
    let volumes = series.volumes();

    Ok(IndicatorSet {
        reference_index: reference,
        close: closes[reference],
        volume: volumes[reference],
        volume_average: volume_average_at(&volumes, reference, config.volume_window),
        short_change: pct_change_at(&closes, reference, config.short_window),
        medium_change: pct_change_at(&closes, reference, config.medium_window),
        long_change: pct_change_at(&closes, reference, config.long_window),
        rsi: rsi_at(&closes, reference, config.rsi_period),
        volume_ratio: volume_ratio_at(&volumes, reference, config.volume_window),
        potential: potential_at(&closes, reference, config.high_lookback),
    })
}
