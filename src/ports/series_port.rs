//! Series source port trait (the Series Fetcher).

use crate::domain::error::ScanError;
use crate::domain::series::{FetchRequest, RawSeries};

/// Supplies chronological OHLCV observations for one symbol.
///
/// An empty or short series is a valid answer, not an error. Errors are for
/// an unreachable or broken source; the scanner records them per symbol and
/// moves on. Sources are shared across scan workers, hence `Sync`.
pub trait SeriesPort: Sync {
    fn fetch_series(&self, symbol: &str, request: &FetchRequest) -> Result<RawSeries, ScanError>;
}
