//! RSI (Relative Strength Index) at a reference index.
//!
//! Uses simple averages of the last `period` close-to-close changes ending at
//! the reference observation:
//! - gain = max(delta, 0), loss = max(-delta, 0)
//! - RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//!
//! Needs `period + 1` observations up to the reference. If avg_loss == 0 the
//! ratio is unbounded and RSI is undefined rather than 100.

use crate::domain::indicator::{Metric, Undefined};

pub fn rsi_at(closes: &[f64], reference: usize, period: usize) -> Metric {
    let needed = period + 1;
    let available = closes.len().min(reference.saturating_add(1));
    if period == 0 || reference >= closes.len() || available < needed {
        return Metric::Undefined(Undefined::history(needed, available));
    }

    let window = &closes[reference + 1 - needed..=reference];
    let (gains, losses) = window
        .windows(2)
        .fold((0.0_f64, 0.0_f64), |(gains, losses), pair| {
            let delta = pair[1] - pair[0];
            if delta > 0.0 {
                (gains + delta, losses)
            } else {
                (gains, losses - delta)
            }
        });

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;
    if avg_loss == 0.0 {
        return Metric::Undefined(Undefined::ZeroAverageLoss);
    }

    let rsi = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
    Metric::finite_or(rsi.clamp(0.0, 100.0), Undefined::ZeroAverageLoss)
}
