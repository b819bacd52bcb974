//! Resolved scan configuration and its validation.
//!
//! Everything a scan needs is read from the `ConfigPort` once, checked, and
//! frozen into a [`ScanConfig`] before any series is fetched. Values that do
//! not parse are reported as `ConfigInvalid` rather than silently replaced by
//! defaults.

use std::str::FromStr;

use crate::domain::error::ScanError;
use crate::domain::indicator::change::ChangeWindow;
use crate::domain::indicator_set::IndicatorConfig;
use crate::domain::instrument::CategoryFilter;
use crate::domain::scoring::{GraduatedRules, Penalty, ScoringPolicy, StrictRules};
use crate::domain::series::{BarMode, FetchRequest, Interval, Lookback};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_MAX_RESULTS: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct NewsSettings {
    pub enabled: bool,
    /// Headlines are fetched for results scoring strictly above this.
    pub threshold: i32,
    pub language: String,
    pub max_items: usize,
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: 60,
            language: "fr".to_string(),
            max_items: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    pub request: FetchRequest,
    pub category: CategoryFilter,
    /// Gap-free observations required before any indicator is computed.
    pub min_bars: usize,
    pub indicators: IndicatorConfig,
    pub policy: ScoringPolicy,
    pub require_all_indicators: bool,
    /// `None` keeps every result.
    pub max_results: Option<usize>,
    pub drop_non_positive: bool,
    pub workers: usize,
    pub news: NewsSettings,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            request: FetchRequest {
                lookback: Lookback::default(),
                interval: Interval::H4,
            },
            category: CategoryFilter::All,
            min_bars: 6,
            indicators: IndicatorConfig::default(),
            policy: ScoringPolicy::Strict(StrictRules::standard()),
            require_all_indicators: true,
            max_results: Some(DEFAULT_MAX_RESULTS),
            drop_non_positive: true,
            workers: 1,
            news: NewsSettings::default(),
        }
    }
}

/// Reads and validates every scan setting.
pub fn from_config(config: &dyn ConfigPort) -> Result<ScanConfig, ScanError> {
    let request = FetchRequest {
        lookback: parse_or(config, "data", "lookback", Lookback::default())?,
        interval: parse_or(config, "data", "interval", Interval::H4)?,
    };
    let min_bars = positive(config, "data", "min_bars", 6)?;

    let indicators = indicator_config(config)?;
    let policy = scoring_policy(config)?;
    let require_all_indicators = config
        .get_bool("scoring", "require_all_indicators")?
        .unwrap_or(policy.requires_all_by_default());

    let max_results = match usize_or(config, "scan", "max_results", DEFAULT_MAX_RESULTS)? {
        0 => None,
        n => Some(n),
    };

    Ok(ScanConfig {
        request,
        category: parse_or(config, "universe", "category", CategoryFilter::All)?,
        min_bars,
        indicators,
        policy,
        require_all_indicators,
        max_results,
        drop_non_positive: config.get_bool("scan", "drop_non_positive")?.unwrap_or(true),
        workers: positive(config, "scan", "workers", 1)?,
        news: news_settings(config)?,
    })
}

fn indicator_config(config: &dyn ConfigPort) -> Result<IndicatorConfig, ScanError> {
    let defaults = IndicatorConfig::default();
    let short = positive(config, "indicators", "short_offset", 6)?;
    let medium = positive(config, "indicators", "medium_offset", 24)?;
    let long = usize_or(config, "indicators", "long_offset", 0)?;

    if medium < short {
        return Err(ScanError::invalid(
            "indicators",
            "medium_offset",
            format!("medium_offset ({}) must not be shorter than short_offset ({})", medium, short),
        ));
    }

    Ok(IndicatorConfig {
        bar_mode: parse_or(config, "indicators", "bar_mode", BarMode::Closed)?,
        rsi_period: positive(config, "indicators", "rsi_period", defaults.rsi_period)?,
        volume_window: positive(config, "indicators", "volume_window", defaults.volume_window)?,
        short_window: ChangeWindow::Bars(short),
        medium_window: ChangeWindow::Bars(medium),
        long_window: ChangeWindow::from_offset(long),
        high_lookback: usize_or(config, "indicators", "high_lookback", 0)?,
    })
}

fn scoring_policy(config: &dyn ConfigPort) -> Result<ScoringPolicy, ScanError> {
    let policy = config
        .get_string("scoring", "policy")
        .unwrap_or_else(|| "strict".to_string());

    match policy.trim().to_lowercase().as_str() {
        "strict" => Ok(ScoringPolicy::Strict(strict_rules(config)?)),
        "graduated" => Ok(ScoringPolicy::Graduated(GraduatedRules::default())),
        other => Err(ScanError::invalid(
            "scoring",
            "policy",
            format!("unknown policy '{}' (expected strict or graduated)", other),
        )),
    }
}

fn strict_rules(config: &dyn ConfigPort) -> Result<StrictRules, ScanError> {
    let preset = config
        .get_string("scoring", "preset")
        .unwrap_or_else(|| "standard".to_string());
    let base = match preset.trim().to_lowercase().as_str() {
        "standard" => StrictRules::standard(),
        "aggressive" => StrictRules::aggressive(),
        other => {
            return Err(ScanError::invalid(
                "scoring",
                "preset",
                format!("unknown preset '{}' (expected standard or aggressive)", other),
            ));
        }
    };

    let rsi_ceiling = config.get_double("scoring", "rsi_ceiling")?.unwrap_or(base.rsi_ceiling);
    if !(0.0..=100.0).contains(&rsi_ceiling) {
        return Err(ScanError::invalid(
            "scoring",
            "rsi_ceiling",
            "rsi_ceiling must be between 0 and 100",
        ));
    }
    let volume_multiple = config
        .get_double("scoring", "volume_multiple")?
        .unwrap_or(base.volume_multiple);
    if volume_multiple <= 0.0 {
        return Err(ScanError::invalid(
            "scoring",
            "volume_multiple",
            "volume_multiple must be positive",
        ));
    }

    let penalty = if config.get_bool("scoring", "penalty")?.unwrap_or(false) {
        let defaults = Penalty::default();
        let points = config
            .get_int("scoring", "penalty_points")?
            .unwrap_or(defaults.points as i64);
        let points = i32::try_from(points)
            .ok()
            .filter(|p| *p >= 0)
            .ok_or_else(|| {
                ScanError::invalid("scoring", "penalty_points", "penalty_points must be a non-negative integer")
            })?;
        Some(Penalty {
            threshold: config
                .get_double("scoring", "penalty_threshold")?
                .unwrap_or(defaults.threshold),
            points,
        })
    } else {
        None
    };

    Ok(StrictRules {
        short_threshold: config
            .get_double("scoring", "short_threshold")?
            .unwrap_or(base.short_threshold),
        medium_threshold: config
            .get_double("scoring", "medium_threshold")?
            .unwrap_or(base.medium_threshold),
        long_threshold: config
            .get_double("scoring", "long_threshold")?
            .unwrap_or(base.long_threshold),
        rsi_ceiling,
        volume_multiple,
        penalty,
        clamp_at_zero: config.get_bool("scoring", "clamp_at_zero")?.unwrap_or(base.clamp_at_zero),
    })
}

fn news_settings(config: &dyn ConfigPort) -> Result<NewsSettings, ScanError> {
    let defaults = NewsSettings::default();
    let threshold = config.get_int("news", "threshold")?.unwrap_or(defaults.threshold as i64);
    let threshold = i32::try_from(threshold)
        .map_err(|_| ScanError::invalid("news", "threshold", "threshold out of range"))?;
    let language = config
        .get_string("news", "language")
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or(defaults.language);

    Ok(NewsSettings {
        enabled: config.get_bool("news", "enabled")?.unwrap_or(defaults.enabled),
        threshold,
        language,
        max_items: usize_or(config, "news", "max_items", defaults.max_items)?,
    })
}

fn parse_or<T>(config: &dyn ConfigPort, section: &str, key: &str, default: T) -> Result<T, ScanError>
where
    T: FromStr<Err = String>,
{
    match config
        .get_string(section, key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
    {
        None => Ok(default),
        Some(v) => v.parse().map_err(|e: String| ScanError::invalid(section, key, e)),
    }
}

fn usize_or(config: &dyn ConfigPort, section: &str, key: &str, default: usize) -> Result<usize, ScanError> {
    match config.get_int(section, key)? {
        None => Ok(default),
        Some(v) => usize::try_from(v).map_err(|_| {
            ScanError::invalid(section, key, format!("expected a non-negative integer, got '{}'", v))
        }),
    }
}

fn positive(config: &dyn ConfigPort, section: &str, key: &str, default: usize) -> Result<usize, ScanError> {
    let value = usize_or(config, section, key, default)?;
    if value == 0 {
        return Err(ScanError::invalid(section, key, format!("{} must be positive", key)));
    }
    Ok(value)
}
