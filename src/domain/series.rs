//! Price/volume time series.
//!
//! A [`RawSeries`] is what a series source hands back: chronological
//! observations where any field may be absent. [`RawSeries::drop_gaps`]
//! turns it into a [`Series`] of complete bars, which is the only shape the
//! indicator engine accepts.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub timestamp: NaiveDateTime,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl Observation {
    fn usable_close(&self) -> Option<f64> {
        self.close.filter(|c| c.is_finite())
    }

    fn usable_volume(&self) -> Option<f64> {
        self.volume.filter(|v| v.is_finite() && *v >= 0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSeries {
    pub observations: Vec<Observation>,
}

impl RawSeries {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Drops observations with a missing or non-finite close or volume.
    pub fn drop_gaps(&self) -> Series {
        let bars = self
            .observations
            .iter()
            .filter_map(|obs| {
                Some(Bar {
                    timestamp: obs.timestamp,
                    close: obs.usable_close()?,
                    volume: obs.usable_volume()?,
                })
            })
            .collect();
        Series { bars }
    }
}

/// A gap-free bar: the two fields the indicators use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub close: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub bars: Vec<Bar>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}

/// Which observation counts as "current".
///
/// `Closed` treats the last bar as still forming and evaluates everything at
/// the second-to-last observation. `Latest` uses the last observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarMode {
    #[default]
    Closed,
    Latest,
}

impl BarMode {
    /// Index of the reference observation in a series of `len` bars.
    pub fn reference_index(&self, len: usize) -> Option<usize> {
        match self {
            BarMode::Closed => len.checked_sub(2),
            BarMode::Latest => len.checked_sub(1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BarMode::Closed => "closed",
            BarMode::Latest => "latest",
        }
    }
}

impl FromStr for BarMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "closed" => Ok(BarMode::Closed),
            "latest" => Ok(BarMode::Latest),
            other => Err(format!("unknown bar mode '{}' (expected closed or latest)", other)),
        }
    }
}

/// Sampling interval requested from a series source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    M1,
    M5,
    M15,
    M30,
    H1,
    H4,
    D1,
    W1,
    Mo1,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::M1 => "1m",
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::M30 => "30m",
            Interval::H1 => "1h",
            Interval::H4 => "4h",
            Interval::D1 => "1d",
            Interval::W1 => "1wk",
            Interval::Mo1 => "1mo",
        }
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1m" => Ok(Interval::M1),
            "5m" => Ok(Interval::M5),
            "15m" => Ok(Interval::M15),
            "30m" => Ok(Interval::M30),
            "1h" | "60m" => Ok(Interval::H1),
            "4h" => Ok(Interval::H4),
            "1d" => Ok(Interval::D1),
            "1wk" | "1w" => Ok(Interval::W1),
            "1mo" => Ok(Interval::Mo1),
            other => Err(format!("unsupported interval '{}'", other)),
        }
    }
}

/// How much history to request, in the `30d` / `6mo` / `1y` / `max` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookback(String);

impl Default for Lookback {
    fn default() -> Self {
        Lookback("30d".to_string())
    }
}

impl Lookback {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Earliest timestamp covered when the window ends at `latest`.
    /// `None` means unbounded. Months count as 30 days, years as 365.
    pub fn cutoff(&self, latest: NaiveDateTime) -> Option<NaiveDateTime> {
        match self.0.as_str() {
            "max" => None,
            "ytd" => NaiveDate::from_ymd_opt(latest.year(), 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0)),
            s => {
                let split = s.find(|c: char| !c.is_ascii_digit())?;
                let (count, unit) = s.split_at(split);
                let count: i64 = count.parse().ok()?;
                let days_per_unit = match unit {
                    "d" => 1,
                    "wk" => 7,
                    "mo" => 30,
                    "y" => 365,
                    _ => return None,
                };
                // a window reaching past chrono's range is unbounded
                count
                    .checked_mul(days_per_unit)
                    .and_then(Duration::try_days)
                    .and_then(|span| latest.checked_sub_signed(span))
            }
        }
    }
}

impl FromStr for Lookback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s == "max" || s == "ytd" {
            return Ok(Lookback(s));
        }
        let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (count, unit) = s.split_at(split);
        let count_ok = count.parse::<u32>().is_ok_and(|n| n > 0);
        if count_ok && matches!(unit, "d" | "wk" | "mo" | "y") {
            Ok(Lookback(s))
        } else {
            Err(format!("invalid lookback '{}' (expected e.g. 30d, 6mo, 1y, max)", s))
        }
    }
}

/// What a series source is asked for, besides the symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub lookback: Lookback,
    pub interval: Interval,
}
