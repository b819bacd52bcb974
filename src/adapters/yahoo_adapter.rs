//! Yahoo Finance chart API series adapter (`net` feature).
//!
//! `GET {base_url}/v8/finance/chart/{symbol}?range={lookback}&interval={interval}`.
//! Null entries in the quote arrays are kept as gaps.

use crate::domain::error::ScanError;
use crate::domain::series::{FetchRequest, Observation, RawSeries};
use crate::ports::series_port::SeriesPort;
use chrono::DateTime;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<f64>>>,
}

pub struct YahooAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooAdapter {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ScanError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (compatible; marketscan)")
            .build()
            .map_err(|e| ScanError::invalid("data", "source", format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

fn fetch_error(symbol: &str, reason: impl Into<String>) -> ScanError {
    ScanError::Fetch {
        symbol: symbol.to_string(),
        reason: reason.into(),
    }
}

fn column(values: &Option<Vec<Option<f64>>>, i: usize) -> Option<f64> {
    values.as_ref().and_then(|v| v.get(i).copied().flatten())
}

/// Decodes a chart API body. No result at all is an empty series.
pub(crate) fn parse_chart(symbol: &str, body: &str) -> Result<RawSeries, ScanError> {
    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| fetch_error(symbol, format!("invalid payload: {}", e)))?;

    if let Some(err) = response.chart.error {
        return Err(fetch_error(symbol, format!("{}: {}", err.code, err.description)));
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(RawSeries::default());
    };
    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut observations = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let Some(timestamp) = DateTime::from_timestamp(ts, 0).map(|dt| dt.naive_utc()) else {
            return Err(fetch_error(symbol, format!("invalid timestamp {}", ts)));
        };
        observations.push(Observation {
            timestamp,
            open: column(&quote.open, i),
            high: column(&quote.high, i),
            low: column(&quote.low, i),
            close: column(&quote.close, i),
            volume: column(&quote.volume, i),
        });
    }
    Ok(RawSeries::new(observations))
}

impl SeriesPort for YahooAdapter {
    fn fetch_series(&self, symbol: &str, request: &FetchRequest) -> Result<RawSeries, ScanError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        debug!(symbol, %url, "requesting chart");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("range", request.lookback.as_str()),
                ("interval", request.interval.as_str()),
            ])
            .send()
            .map_err(|e| fetch_error(symbol, e.to_string()))?;

        let status = response.status();
        let body = response.text().map_err(|e| fetch_error(symbol, e.to_string()))?;
        if !status.is_success() && !body.contains("\"chart\"") {
            return Err(fetch_error(symbol, format!("HTTP {}", status)));
        }
        parse_chart(symbol, &body)
    }
}
