#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use marketscan::domain::error::ScanError;
use marketscan::domain::series::{FetchRequest, Observation, RawSeries};
use marketscan::ports::series_port::SeriesPort;
use std::collections::HashMap;
use std::sync::Mutex;

pub struct MockSeriesPort {
    pub data: HashMap<String, RawSeries>,
    pub errors: HashMap<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl MockSeriesPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_series(mut self, symbol: &str, series: RawSeries) -> Self {
        self.data.insert(symbol.to_string(), series);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl SeriesPort for MockSeriesPort {
    fn fetch_series(&self, symbol: &str, _request: &FetchRequest) -> Result<RawSeries, ScanError> {
        self.calls.lock().unwrap().push(symbol.to_string());
        if let Some(reason) = self.errors.get(symbol) {
            return Err(ScanError::Fetch {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }
}

pub fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// 4-hour observations from the given closes and volumes.
pub fn make_series(closes: &[f64], volumes: &[f64]) -> RawSeries {
    RawSeries::new(
        closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&close, &volume))| Observation {
                timestamp: start() + chrono::Duration::hours(4 * i as i64),
                open: Some(close),
                high: Some(close),
                low: Some(close),
                close: Some(close),
                volume: Some(volume),
            })
            .collect(),
    )
}

/// Alternating +2.5% / -1.2% moves from 100: steady uptrend with RSI near 67.
pub fn rally_closes(count: usize) -> Vec<f64> {
    let mut closes = Vec::with_capacity(count);
    let mut price = 100.0;
    for i in 0..count {
        if i > 0 {
            price *= if i % 2 == 1 { 1.025 } else { 0.988 };
        }
        closes.push(price);
    }
    closes
}

/// Scores 80 under the standard strict rules: every rule but volume.
pub fn rally_series(count: usize) -> RawSeries {
    make_series(&rally_closes(count), &vec![1000.0; count])
}

/// Same as [`rally_series`] with a volume spike on the reference bar: 100.
pub fn hot_rally_series(count: usize) -> RawSeries {
    let mut volumes = vec![1000.0; count];
    volumes[count - 2] = 3000.0;
    make_series(&rally_closes(count), &volumes)
}

/// Steady 1% decline: only the RSI rule holds, so strict scores 20.
pub fn falling_series(count: usize) -> RawSeries {
    let closes: Vec<f64> = (0..count).map(|i| 100.0 * 0.99_f64.powi(i as i32)).collect();
    make_series(&closes, &vec![1000.0; count])
}

/// Flat prices: RSI undefined (no losses).
pub fn flat_series(count: usize) -> RawSeries {
    make_series(&vec![50.0; count], &vec![1000.0; count])
}

pub fn series_csv(series: &RawSeries) -> String {
    let mut out = String::from("timestamp,open,high,low,close,volume\n");
    for obs in &series.observations {
        let cell = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            obs.timestamp.format("%Y-%m-%d %H:%M:%S"),
            cell(obs.open),
            cell(obs.high),
            cell(obs.low),
            cell(obs.close),
            cell(obs.volume),
        ));
    }
    out
}
