//! End-to-end scans against a mock series source.
//!
//! Tests cover:
//! - Failure isolation and success/failure accounting
//! - Ranking order, ties and the result cap
//! - Strict versus graduated policies on the same universe
//! - Reference bar selection
//! - Category filtering, cancellation and the worker pool

mod common;

use common::*;
use marketscan::domain::error::FailureCause;
use marketscan::domain::indicator::{IndicatorKind, Undefined};
use marketscan::domain::instrument::{CategoryFilter, Instrument, Universe};
use marketscan::domain::scan_config::ScanConfig;
use marketscan::domain::scanner::{CancelFlag, run_scan};
use marketscan::domain::scoring::{GraduatedRules, ScoringPolicy};
use marketscan::domain::series::BarMode;

fn universe(symbols: &[&str]) -> Universe {
    Universe::new(symbols.iter().map(|s| Instrument::new(*s)).collect())
}

mod failure_isolation {
    use super::*;

    #[test]
    fn one_success_two_failures() {
        let port = MockSeriesPort::new()
            .with_series("AAA", rally_series(40))
            .with_error("BBB", "connection reset")
            .with_series("CCC", rally_series(3));

        let outcome = run_scan(
            &universe(&["AAA", "BBB", "CCC"]),
            &port,
            &ScanConfig::default(),
            None,
        );

        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].symbol, "AAA");
        assert_eq!(outcome.results[0].score, 80);
        assert_eq!(outcome.succeeded, 1);
        assert_eq!(outcome.failed(), 2);
        assert!(matches!(
            outcome.failures[0].cause,
            FailureCause::FetchFailed { ref reason } if reason.contains("connection reset")
        ));
        assert_eq!(
            outcome.failures[1].cause,
            FailureCause::InsufficientData {
                bars: 3,
                minimum: 6
            }
        );
    }

    #[test]
    fn empty_series_is_its_own_failure() {
        let port = MockSeriesPort::new().with_series("NONE", make_series(&[], &[]));

        let outcome = run_scan(&universe(&["NONE"]), &port, &ScanConfig::default(), None);

        assert!(outcome.is_empty());
        assert_eq!(outcome.failures[0].cause, FailureCause::EmptySeries);
    }

    #[test]
    fn gaps_are_dropped_before_the_bar_gate() {
        let mut raw = rally_series(8);
        for obs in raw.observations.iter_mut().take(4) {
            obs.close = None;
        }
        let port = MockSeriesPort::new().with_series("GAPPY", raw);

        let outcome = run_scan(&universe(&["GAPPY"]), &port, &ScanConfig::default(), None);

        assert_eq!(
            outcome.failures[0].cause,
            FailureCause::InsufficientData {
                bars: 4,
                minimum: 6
            }
        );
    }

    #[test]
    fn strict_policy_disqualifies_flat_prices() {
        let port = MockSeriesPort::new().with_series("FLAT", flat_series(40));

        let outcome = run_scan(&universe(&["FLAT"]), &port, &ScanConfig::default(), None);

        assert!(outcome.is_empty());
        assert_eq!(
            outcome.failures[0].cause,
            FailureCause::UndefinedIndicator {
                indicator: IndicatorKind::Rsi,
                reason: Undefined::ZeroAverageLoss
            }
        );
    }
}

mod ranking {
    use super::*;

    fn mixed_port() -> MockSeriesPort {
        MockSeriesPort::new()
            .with_series("FALL", falling_series(40))
            .with_series("RALLY", rally_series(40))
            .with_series("HOT", hot_rally_series(40))
            .with_series("FLAT", flat_series(40))
    }

    #[test]
    fn strict_scores_and_order() {
        let outcome = run_scan(
            &universe(&["FALL", "RALLY", "HOT", "FLAT"]),
            &mixed_port(),
            &ScanConfig::default(),
            None,
        );

        let ranked: Vec<(&str, i32)> = outcome
            .results
            .iter()
            .map(|r| (r.symbol.as_str(), r.score))
            .collect();
        assert_eq!(ranked, vec![("HOT", 100), ("RALLY", 80), ("FALL", 20)]);
        assert_eq!(outcome.succeeded, 3);
        assert_eq!(outcome.failed(), 1);
    }

    #[test]
    fn graduated_scores_partial_sets_and_hides_zero() {
        let config = ScanConfig {
            policy: ScoringPolicy::Graduated(GraduatedRules::default()),
            require_all_indicators: false,
            ..ScanConfig::default()
        };
        let outcome = run_scan(
            &universe(&["FALL", "RALLY", "HOT", "FLAT"]),
            &mixed_port(),
            &config,
            None,
        );

        let ranked: Vec<(&str, i32)> = outcome
            .results
            .iter()
            .map(|r| (r.symbol.as_str(), r.score))
            .collect();
        assert_eq!(ranked, vec![("HOT", 40), ("RALLY", 10)]);
        assert_eq!(outcome.succeeded, 4);
        assert_eq!(outcome.failed(), 0);
    }

    #[test]
    fn ties_keep_universe_order_and_cap_applies() {
        let port = MockSeriesPort::new()
            .with_series("C", rally_series(40))
            .with_series("A", rally_series(40))
            .with_series("B", rally_series(40))
            .with_series("TOP", hot_rally_series(40));
        let config = ScanConfig {
            max_results: Some(3),
            ..ScanConfig::default()
        };

        let outcome = run_scan(&universe(&["C", "A", "B", "TOP"]), &port, &config, None);

        let order: Vec<&str> = outcome.results.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(order, vec!["TOP", "C", "A"]);
        assert_eq!(outcome.succeeded, 4);
    }

    #[test]
    fn repeated_scans_are_identical() {
        let symbols = ["FALL", "RALLY", "HOT", "FLAT"];
        let port = mixed_port();
        let first = run_scan(&universe(&symbols), &port, &ScanConfig::default(), None);
        let second = run_scan(&universe(&symbols), &port, &ScanConfig::default(), None);
        assert_eq!(first, second);
    }

    #[test]
    fn keeping_non_positive_results() {
        let config = ScanConfig {
            policy: ScoringPolicy::Graduated(GraduatedRules::default()),
            require_all_indicators: false,
            drop_non_positive: false,
            ..ScanConfig::default()
        };
        let outcome = run_scan(
            &universe(&["FALL", "FLAT"]),
            &mixed_port(),
            &config,
            None,
        );
        assert_eq!(outcome.results.len(), 2);
        assert!(outcome.results.iter().all(|r| r.score == 0));
        assert_eq!(outcome.results[0].symbol, "FALL");
    }
}

mod reference_bar {
    use super::*;

    #[test]
    fn closed_mode_sees_the_spike_latest_does_not() {
        let port = MockSeriesPort::new().with_series("HOT", hot_rally_series(40));

        let closed = run_scan(&universe(&["HOT"]), &port, &ScanConfig::default(), None);
        assert_eq!(closed.results[0].score, 100);
        let ratio = closed.results[0].volume_ratio.unwrap();
        assert!((ratio - 3000.0 / (26000.0 / 24.0)).abs() < 1e-9);

        let mut config = ScanConfig::default();
        config.indicators.bar_mode = BarMode::Latest;
        let latest = run_scan(&universe(&["HOT"]), &port, &config, None);
        assert_eq!(latest.results[0].score, 80);
        assert!(latest.results[0].volume_ratio.unwrap() < 1.0);
    }
}

mod scan_control {
    use super::*;

    #[test]
    fn category_filter_limits_fetches() {
        let port = MockSeriesPort::new()
            .with_series("BTC-USD", rally_series(40))
            .with_series("AAPL", rally_series(40));
        let config = ScanConfig {
            category: CategoryFilter::Crypto,
            ..ScanConfig::default()
        };

        let outcome = run_scan(&universe(&["AAPL", "BTC-USD"]), &port, &config, None);

        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].symbol, "BTC-USD");
        assert_eq!(port.call_count(), 1);
    }

    #[test]
    fn cancelled_before_start_returns_nothing() {
        let port = MockSeriesPort::new().with_series("AAA", rally_series(40));
        let cancel = CancelFlag::new();
        cancel.cancel();

        let outcome = run_scan(&universe(&["AAA"]), &port, &ScanConfig::default(), Some(&cancel));

        assert!(outcome.cancelled);
        assert!(outcome.is_empty());
        assert_eq!(port.call_count(), 0);
    }

    #[test]
    fn worker_pool_gives_the_sequential_outcome() {
        let mut port = MockSeriesPort::new();
        let mut symbols = Vec::new();
        for i in 0..20 {
            let symbol = format!("S{:02}", i);
            port = match i % 4 {
                0 => port.with_series(&symbol, hot_rally_series(40)),
                1 => port.with_series(&symbol, rally_series(40)),
                2 => port.with_error(&symbol, "timeout"),
                _ => port.with_series(&symbol, falling_series(40)),
            };
            symbols.push(symbol);
        }
        let universe = Universe::new(symbols.iter().map(Instrument::new).collect());

        let sequential = run_scan(&universe, &port, &ScanConfig::default(), None);
        let parallel = run_scan(
            &universe,
            &port,
            &ScanConfig {
                workers: 4,
                ..ScanConfig::default()
            },
            None,
        );

        assert_eq!(sequential, parallel);
        assert_eq!(parallel.succeeded, 15);
        assert_eq!(parallel.failed(), 5);
        assert_eq!(parallel.results[0].symbol, "S00");
    }
}
