//! Percentage change between the reference observation and an earlier one.
//!
//! change = (V[ref] - V[ref - n]) / V[ref - n] * 100
//!
//! Offsets are observation counts, not wall-clock spans. A zero base value is
//! undefined rather than infinite.

use crate::domain::indicator::{Metric, Undefined};
use std::fmt;

/// How far back a change figure looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeWindow {
    /// `n` observations before the reference.
    Bars(usize),
    /// The first observation of the series.
    SinceStart,
}

impl ChangeWindow {
    /// `0` is read as "since the first observation".
    pub fn from_offset(offset: usize) -> Self {
        if offset == 0 {
            ChangeWindow::SinceStart
        } else {
            ChangeWindow::Bars(offset)
        }
    }
}

impl fmt::Display for ChangeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeWindow::Bars(n) => write!(f, "{} bars", n),
            ChangeWindow::SinceStart => write!(f, "since start"),
        }
    }
}

pub fn pct_change_at(values: &[f64], reference: usize, window: ChangeWindow) -> Metric {
    let offset = match window {
        ChangeWindow::Bars(n) => n,
        ChangeWindow::SinceStart => reference,
    };
    let available = values.len().min(reference.saturating_add(1));
    if reference >= values.len() || reference < offset {
        return Metric::Undefined(Undefined::history(offset + 1, available));
    }

    let base = values[reference - offset];
    if base == 0.0 {
        return Metric::Undefined(Undefined::ZeroReference);
    }

    let change = (values[reference] - base) / base * 100.0;
    Metric::finite_or(change, Undefined::ZeroReference)
}
