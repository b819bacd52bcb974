//! Universe CSV adapter.
//!
//! Expects a header row with a ticker column (`Ticker` or `Symbol`), and
//! optionally a display-name column (`Nom complet` or `Name`) and a
//! `Category` column. Header matching ignores case and surrounding spaces.

use crate::domain::error::ScanError;
use crate::domain::instrument::{Category, Instrument, Universe};
use crate::ports::universe_port::UniversePort;
use std::path::PathBuf;
use tracing::{debug, warn};

const TICKER_HEADERS: [&str; 2] = ["ticker", "symbol"];
const NAME_HEADERS: [&str; 3] = ["nom complet", "name", "full name"];
const CATEGORY_HEADERS: [&str; 2] = ["category", "type"];

pub struct CsvUniverseAdapter {
    path: PathBuf,
}

impl CsvUniverseAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

fn universe_error(reason: impl Into<String>) -> ScanError {
    ScanError::Universe {
        reason: reason.into(),
    }
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.contains(&h.trim().to_lowercase().as_str()))
}

impl UniversePort for CsvUniverseAdapter {
    fn load_universe(&self) -> Result<Universe, ScanError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| universe_error(format!("failed to open {}: {}", self.path.display(), e)))?;

        let headers = rdr
            .headers()
            .map_err(|e| universe_error(format!("failed to read header: {}", e)))?
            .clone();
        let ticker_col = find_column(&headers, &TICKER_HEADERS)
            .ok_or_else(|| universe_error(format!("{} has no Ticker column", self.path.display())))?;
        let name_col = find_column(&headers, &NAME_HEADERS);
        let category_col = find_column(&headers, &CATEGORY_HEADERS);

        let mut instruments = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| universe_error(format!("CSV parse error: {}", e)))?;
            let symbol = record.get(ticker_col).unwrap_or("").trim();
            if symbol.is_empty() {
                debug!(row = row + 2, "skipping row without ticker");
                continue;
            }

            let mut instrument = Instrument::new(symbol);
            if let Some(name) = name_col.and_then(|c| record.get(c)) {
                instrument = instrument.with_name(name.trim());
            }
            if let Some(raw) = category_col.and_then(|c| record.get(c)) {
                if !raw.trim().is_empty() {
                    match raw.parse::<Category>() {
                        Ok(category) => instrument = instrument.with_category(category),
                        Err(e) => warn!(symbol, error = %e, "ignoring category"),
                    }
                }
            }
            instruments.push(instrument);
        }

        let universe = Universe::new(instruments);
        debug!(
            path = %self.path.display(),
            instruments = universe.count(),
            "universe loaded"
        );
        Ok(universe)
    }
}
