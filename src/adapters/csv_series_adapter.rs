//! CSV file series adapter.
//!
//! Reads `{base_path}/{symbol}.csv` with the columns
//! `timestamp,open,high,low,close,volume`. Empty cells (or `null`/`NaN`)
//! become gaps rather than errors, matching what a live source returns for
//! a bar with no trades.

use crate::domain::error::ScanError;
use crate::domain::series::{FetchRequest, Observation, RawSeries};
use crate::ports::series_port::SeriesPort;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fs;
use std::path::PathBuf;

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

pub struct CsvSeriesAdapter {
    base_path: PathBuf,
}

impl CsvSeriesAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn fetch_error(symbol: &str, reason: impl Into<String>) -> ScanError {
    ScanError::Fetch {
        symbol: symbol.to_string(),
        reason: reason.into(),
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_cell(raw: Option<&str>) -> Result<Option<f64>, String> {
    let raw = raw.map(str::trim).unwrap_or("");
    if raw.is_empty() || raw.eq_ignore_ascii_case("null") || raw.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|e| format!("invalid number '{}': {}", raw, e))
}

impl SeriesPort for CsvSeriesAdapter {
    fn fetch_series(&self, symbol: &str, request: &FetchRequest) -> Result<RawSeries, ScanError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path)
            .map_err(|e| fetch_error(symbol, format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut observations = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| fetch_error(symbol, format!("CSV parse error: {}", e)))?;

            let ts_str = record
                .get(0)
                .ok_or_else(|| fetch_error(symbol, "missing timestamp column"))?;
            let timestamp = parse_timestamp(ts_str)
                .ok_or_else(|| fetch_error(symbol, format!("invalid timestamp '{}'", ts_str)))?;

            let cell = |idx: usize, column: &str| {
                parse_cell(record.get(idx)).map_err(|e| fetch_error(symbol, format!("{} column: {}", column, e)))
            };

            observations.push(Observation {
                timestamp,
                open: cell(1, "open")?,
                high: cell(2, "high")?,
                low: cell(3, "low")?,
                close: cell(4, "close")?,
                volume: cell(5, "volume")?,
            });
        }

        observations.sort_by_key(|o| o.timestamp);

        if let Some(cutoff) = observations
            .last()
            .and_then(|last| request.lookback.cutoff(last.timestamp))
        {
            observations.retain(|o| o.timestamp >= cutoff);
        }

        Ok(RawSeries::new(observations))
    }
}
