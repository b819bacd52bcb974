//! Domain error types.
//!
//! `ScanError` is for failures that stop a command (bad config, unreadable
//! universe, export I/O). Per-instrument problems never become a `ScanError`;
//! they are recorded as a [`FailureCause`] in the scan outcome.

use crate::domain::indicator::{IndicatorKind, Undefined};

/// Top-level error type for marketscan.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("universe error: {reason}")]
    Universe { reason: String },

    #[error("fetch failed for {symbol}: {reason}")]
    Fetch { symbol: String, reason: String },

    #[error("export error: {reason}")]
    Export { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScanError {
    pub fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        ScanError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&ScanError> for std::process::ExitCode {
    fn from(err: &ScanError) -> Self {
        let code: u8 = match err {
            ScanError::Io(_) => 1,
            ScanError::ConfigParse { .. }
            | ScanError::ConfigMissing { .. }
            | ScanError::ConfigInvalid { .. } => 2,
            ScanError::Universe { .. } => 3,
            ScanError::Fetch { .. } => 4,
            ScanError::Export { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

/// Why a single instrument was left out of the ranked results.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FailureCause {
    #[error("fetch failed: {reason}")]
    FetchFailed { reason: String },

    #[error("no data returned")]
    EmptySeries,

    #[error("insufficient data: have {bars} observations, need {minimum}")]
    InsufficientData { bars: usize, minimum: usize },

    #[error("{indicator} undefined: {reason}")]
    UndefinedIndicator {
        indicator: IndicatorKind,
        reason: Undefined,
    },
}

impl From<ScanError> for FailureCause {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::Fetch { reason, .. } => FailureCause::FetchFailed { reason },
            other => FailureCause::FetchFailed {
                reason: other.to_string(),
            },
        }
    }
}
