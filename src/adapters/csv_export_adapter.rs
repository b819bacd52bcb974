//! CSV export of ranked results.
//!
//! One row per [`ScoreResult`], columns in field order, rank order kept.
//! Undefined figures are written as empty cells and read back as `None`.

use crate::domain::error::ScanError;
use crate::domain::scanner::{ScanOutcome, ScoreResult};
use crate::ports::report_port::ReportPort;
use std::io::{Read, Write};
use std::path::Path;

pub struct CsvExportAdapter;

/// Export columns, in [`ScoreResult`] field order.
pub const COLUMNS: [&str; 9] = [
    "symbol",
    "name",
    "short_change",
    "medium_change",
    "long_change",
    "rsi",
    "volume_ratio",
    "potential",
    "score",
];

fn export_error(reason: impl std::fmt::Display) -> ScanError {
    ScanError::Export {
        reason: reason.to_string(),
    }
}

impl ReportPort for CsvExportAdapter {
    fn render(&self, outcome: &ScanOutcome, out: &mut dyn Write) -> Result<(), ScanError> {
        // header written by hand so an empty export still names its columns
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(out);
        wtr.write_record(COLUMNS).map_err(export_error)?;
        for result in &outcome.results {
            wtr.serialize(result).map_err(export_error)?;
        }
        wtr.flush().map_err(export_error)?;
        Ok(())
    }
}

/// Parses an export back into results, in file order.
pub fn read_export_from<R: Read>(reader: R) -> Result<Vec<ScoreResult>, ScanError> {
    csv::Reader::from_reader(reader)
        .deserialize()
        .map(|row| row.map_err(export_error))
        .collect()
}

pub fn read_export<P: AsRef<Path>>(path: P) -> Result<Vec<ScoreResult>, ScanError> {
    let file = std::fs::File::open(path)?;
    read_export_from(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn outcome() -> ScanOutcome {
        ScanOutcome {
            results: vec![
                ScoreResult {
                    symbol: "AAA".into(),
                    name: "Alpha, Inc.".into(),
                    short_change: Some(3.25),
                    medium_change: Some(6.0),
                    long_change: Some(12.5),
                    rsi: Some(55.0),
                    volume_ratio: Some(2.0),
                    potential: Some(4.0),
                    score: 100,
                },
                ScoreResult {
                    symbol: "BBB".into(),
                    name: "BBB".into(),
                    short_change: Some(-1.0),
                    medium_change: None,
                    long_change: Some(0.5),
                    rsi: None,
                    volume_ratio: Some(0.8),
                    potential: Some(0.0),
                    score: 20,
                },
            ],
            succeeded: 2,
            ..ScanOutcome::default()
        }
    }

    #[test]
    fn header_follows_field_order() {
        let mut buf = Vec::new();
        CsvExportAdapter.render(&outcome(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "symbol,name,short_change,medium_change,long_change,rsi,volume_ratio,potential,score"
        );
        assert!(text.contains("\"Alpha, Inc.\""));
        assert!(text.contains("BBB,BBB,-1.0,,0.5,,0.8,0.0,20"));
    }

    #[test]
    fn empty_outcome_exports_header_only() {
        let mut buf = Vec::new();
        CsvExportAdapter
            .render(&ScanOutcome::default(), &mut buf)
            .unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(text, format!("{}\n", COLUMNS.join(",")));
        assert!(read_export_from(text.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn export_reads_back_identically() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scan.csv");
        let outcome = outcome();

        CsvExportAdapter
            .write(&outcome, path.to_str().unwrap())
            .unwrap();
        let back = read_export(&path).unwrap();

        assert_eq!(back, outcome.results);
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("scan.csv");
        let err = CsvExportAdapter
            .write(&outcome(), path.to_str().unwrap())
            .unwrap_err();
        assert!(matches!(err, ScanError::Export { .. }));
    }
}
