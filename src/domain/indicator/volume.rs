//! Trailing volume average and volume ratio.
//!
//! avg = mean(V[ref - window + 1 ..= ref])
//! ratio = V[ref] / avg, or 0 when avg is 0 (no volume signal)

use crate::domain::indicator::{Metric, Undefined};

pub fn volume_average_at(volumes: &[f64], reference: usize, window: usize) -> Metric {
    let available = volumes.len().min(reference.saturating_add(1));
    if window == 0 || reference >= volumes.len() || available < window {
        return Metric::Undefined(Undefined::history(window.max(1), available));
    }

    let slice = &volumes[reference + 1 - window..=reference];
    let avg = slice.iter().sum::<f64>() / window as f64;
    Metric::finite_or(avg, Undefined::history(window, available))
}

pub fn volume_ratio_at(volumes: &[f64], reference: usize, window: usize) -> Metric {
    let avg = match volume_average_at(volumes, reference, window) {
        Metric::Defined(avg) => avg,
        undefined => return undefined,
    };
    if avg == 0.0 {
        return Metric::Defined(0.0);
    }
    Metric::finite_or(volumes[reference] / avg, Undefined::ZeroReference)
}
