//! Asset scanner: fetch, compute, score and rank a universe.
//!
//! Each instrument is evaluated in isolation. Any per-instrument problem is
//! turned into a [`FailedInstrument`] entry and the scan carries on, so a
//! scan never fails as a whole. Results are ranked by score, highest first,
//! with ties kept in universe order.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::error::FailureCause;
use crate::domain::indicator_set::compute_indicator_set;
use crate::domain::instrument::{Instrument, Universe};
use crate::domain::scan_config::ScanConfig;
use crate::ports::news_port::NewsItem;
use crate::ports::series_port::SeriesPort;

/// One ranked row. Field order is the export column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub symbol: String,
    pub name: String,
    pub short_change: Option<f64>,
    pub medium_change: Option<f64>,
    pub long_change: Option<f64>,
    pub rsi: Option<f64>,
    pub volume_ratio: Option<f64>,
    pub potential: Option<f64>,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedInstrument {
    pub symbol: String,
    pub cause: FailureCause,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutcome {
    /// Ranked results after filtering and truncation.
    pub results: Vec<ScoreResult>,
    /// Instruments that produced a score, before filtering and truncation.
    pub succeeded: usize,
    pub failures: Vec<FailedInstrument>,
    /// Set when the scan was stopped early; results cover what finished.
    pub cancelled: bool,
    /// Headlines per symbol, filled in by [`crate::domain::news::attach_news`].
    pub news: BTreeMap<String, Vec<NewsItem>>,
}

impl ScanOutcome {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// True when there is nothing to display.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Shared stop signal. Instruments not yet started when it is raised are
/// left out; finished ones are kept.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Fetch, compute and score a single instrument.
pub fn evaluate_instrument(
    instrument: &Instrument,
    series_port: &dyn SeriesPort,
    config: &ScanConfig,
) -> Result<ScoreResult, FailureCause> {
    let raw = series_port.fetch_series(&instrument.symbol, &config.request)?;
    if raw.is_empty() {
        return Err(FailureCause::EmptySeries);
    }

    let series = raw.drop_gaps();
    if series.is_empty() {
        return Err(FailureCause::EmptySeries);
    }
    if series.len() < config.min_bars {
        return Err(FailureCause::InsufficientData {
            bars: series.len(),
            minimum: config.min_bars,
        });
    }

    let set = compute_indicator_set(&series, &config.indicators)?;

    if config.require_all_indicators {
        if let Some((indicator, reason)) = set.first_undefined(config.policy.required_indicators())
        {
            return Err(FailureCause::UndefinedIndicator { indicator, reason });
        }
    }

    Ok(ScoreResult {
        symbol: instrument.symbol.clone(),
        name: instrument.display_name().to_string(),
        short_change: set.short_change.value(),
        medium_change: set.medium_change.value(),
        long_change: set.long_change.value(),
        rsi: set.rsi.value(),
        volume_ratio: set.volume_ratio.value(),
        potential: set.potential.value(),
        score: config.policy.score(&set),
    })
}

type Evaluated = Option<Result<ScoreResult, FailureCause>>;

fn evaluate_or_skip(
    instrument: &Instrument,
    series_port: &dyn SeriesPort,
    config: &ScanConfig,
    cancel: Option<&CancelFlag>,
) -> Evaluated {
    if cancel.is_some_and(CancelFlag::is_cancelled) {
        return None;
    }
    Some(evaluate_instrument(instrument, series_port, config))
}

fn evaluate_all(
    instruments: &[&Instrument],
    series_port: &dyn SeriesPort,
    config: &ScanConfig,
    cancel: Option<&CancelFlag>,
) -> Vec<Evaluated> {
    let sequential = || -> Vec<Evaluated> {
        instruments
            .iter()
            .map(|inst| evaluate_or_skip(inst, series_port, config, cancel))
            .collect()
    };

    if config.workers <= 1 {
        return sequential();
    }

    match rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()
    {
        // par_iter().collect() keeps input order
        Ok(pool) => pool.install(|| {
            instruments
                .par_iter()
                .map(|inst| evaluate_or_skip(inst, series_port, config, cancel))
                .collect()
        }),
        Err(e) => {
            warn!(error = %e, "could not start worker pool, scanning sequentially");
            sequential()
        }
    }
}

/// Runs a scan over every instrument of `universe` accepted by the
/// configured category filter.
pub fn run_scan(
    universe: &Universe,
    series_port: &dyn SeriesPort,
    config: &ScanConfig,
    cancel: Option<&CancelFlag>,
) -> ScanOutcome {
    let instruments = universe.filtered(config.category);
    info!(
        instruments = instruments.len(),
        category = config.category.as_str(),
        policy = config.policy.name(),
        workers = config.workers,
        "starting scan"
    );

    let evaluated = evaluate_all(&instruments, series_port, config, cancel);

    let mut outcome = ScanOutcome::default();
    let mut results = Vec::new();
    for (instrument, evaluated) in instruments.iter().zip(evaluated) {
        match evaluated {
            None => outcome.cancelled = true,
            Some(Ok(result)) => {
                debug!(symbol = %result.symbol, score = result.score, "scored");
                results.push(result);
            }
            Some(Err(cause)) => {
                warn!(symbol = %instrument.symbol, %cause, "skipping instrument");
                outcome.failures.push(FailedInstrument {
                    symbol: instrument.symbol.clone(),
                    cause,
                });
            }
        }
    }
    outcome.succeeded = results.len();

    outcome.results = rank(results, config);

    if outcome.cancelled {
        warn!(
            completed = outcome.succeeded + outcome.failed(),
            total = instruments.len(),
            "scan cancelled"
        );
    }
    info!(
        succeeded = outcome.succeeded,
        failed = outcome.failed(),
        ranked = outcome.results.len(),
        "scan finished"
    );
    outcome
}

/// Sorts by score descending (stable), then applies the display filter and
/// the result cap.
pub fn rank(mut results: Vec<ScoreResult>, config: &ScanConfig) -> Vec<ScoreResult> {
    results.sort_by(|a, b| b.score.cmp(&a.score));
    if config.drop_non_positive {
        results.retain(|r| r.score > 0);
    }
    if let Some(max) = config.max_results {
        results.truncate(max);
    }
    results
}
