//! Report generation port trait.

use crate::domain::error::ScanError;
use crate::domain::scanner::ScanOutcome;
use std::io::Write;

/// Sink for a finished scan: exports, tables, and anything else that
/// presents the ranked results.
pub trait ReportPort {
    fn render(&self, outcome: &ScanOutcome, out: &mut dyn Write) -> Result<(), ScanError>;

    /// Default implementation: renders into a freshly created file.
    fn write(&self, outcome: &ScanOutcome, output_path: &str) -> Result<(), ScanError> {
        let export_error = |e: std::io::Error| ScanError::Export {
            reason: format!("{}: {}", output_path, e),
        };
        let mut file = std::fs::File::create(output_path).map_err(export_error)?;
        self.render(outcome, &mut file)?;
        file.flush().map_err(export_error)?;
        Ok(())
    }
}
