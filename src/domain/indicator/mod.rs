//! Technical indicator implementations.
//!
//! Every calculation here works on plain slices of closes or volumes and is
//! evaluated at a single reference index (see [`crate::domain::series::BarMode`]).
//! Results are a [`Metric`]: either a definite value or the reason it could
//! not be computed. Nothing in this module indexes out of bounds or divides
//! by zero.

pub mod change;
pub mod potential;
pub mod rsi;
pub mod volume;

use std::fmt;

/// A computed indicator value, or why there is none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Defined(f64),
    Undefined(Undefined),
}

impl Metric {
    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Defined(v) => Some(*v),
            Metric::Undefined(_) => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Metric::Defined(_))
    }

    /// Wraps a raw result, mapping NaN/infinite values to `reason`.
    pub(crate) fn finite_or(value: f64, reason: Undefined) -> Self {
        if value.is_finite() {
            Metric::Defined(value)
        } else {
            Metric::Undefined(reason)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Undefined {
    #[error("insufficient history: need {needed} observations, have {available}")]
    InsufficientHistory { needed: usize, available: usize },

    #[error("average loss is zero")]
    ZeroAverageLoss,

    #[error("reference value is zero")]
    ZeroReference,

    #[error("current price is zero")]
    ZeroPrice,
}

impl Undefined {
    pub(crate) fn history(needed: usize, available: usize) -> Self {
        Undefined::InsufficientHistory { needed, available }
    }
}

/// Identity of each figure in an indicator set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    ShortChange,
    MediumChange,
    LongChange,
    Rsi,
    VolumeRatio,
    Potential,
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorKind::ShortChange => write!(f, "short change"),
            IndicatorKind::MediumChange => write!(f, "medium change"),
            IndicatorKind::LongChange => write!(f, "long change"),
            IndicatorKind::Rsi => write!(f, "RSI"),
            IndicatorKind::VolumeRatio => write!(f, "volume ratio"),
            IndicatorKind::Potential => write!(f, "potential"),
        }
    }
}
