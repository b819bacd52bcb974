//! Potential-to-high: distance from the current close up to the highest
//! close in the lookback window, as a percentage of the current close.
//! Clamped at 0 so an instrument at or above its high has no potential.

use crate::domain::indicator::{Metric, Undefined};

/// `lookback == 0` scans from the first observation.
pub fn potential_at(closes: &[f64], reference: usize, lookback: usize) -> Metric {
    let available = closes.len().min(reference.saturating_add(1));
    if reference >= closes.len() || (lookback > 0 && available < lookback) {
        return Metric::Undefined(Undefined::history(lookback.max(1), available));
    }

    let start = if lookback == 0 {
        0
    } else {
        reference + 1 - lookback
    };
    let current = closes[reference];
    if current == 0.0 {
        return Metric::Undefined(Undefined::ZeroPrice);
    }

    let high = closes[start..=reference]
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let potential = ((high - current) / current * 100.0).max(0.0);
    Metric::finite_or(potential, Undefined::ZeroPrice)
}
