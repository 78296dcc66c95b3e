//! Import summaries: terminal lines and optional JSON export.

use std::fs::File;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::AppError;
use crate::protocol::format_decimal;

/// What happened to one export file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub file: PathBuf,
    /// Scope label values joined with `/`, e.g. `GDQ2024/Default Team`.
    pub scope: String,
    pub rows: usize,
    /// Running scope total after this file, rounded to cents.
    pub total: Decimal,
    /// Running scope count after this file.
    pub count: u64,
    pub cleared: bool,
    /// Store writes that failed and were skipped.
    pub transport_failures: usize,
}

pub fn format_import_summary(summary: &ImportSummary) -> String {
    let mut out = format!(
        "Imported {} donation(s) from {} for {}: total={} count={}",
        summary.rows,
        summary.file.display(),
        summary.scope,
        format_decimal(summary.total),
        summary.count,
    );
    if summary.transport_failures > 0 {
        out.push_str(&format!(
            " ({} write(s) failed; the store is missing points)",
            summary.transport_failures
        ));
    }
    out
}

/// Write summaries as pretty JSON.
pub fn write_summary_json(path: &Path, summaries: &[ImportSummary]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create summary JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, summaries)
        .map_err(|e| AppError::io(format!("Failed to write summary JSON: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn summary(failures: usize) -> ImportSummary {
        ImportSummary {
            file: PathBuf::from("tiltify-export-GDQ-fact-donations.csv"),
            scope: "GDQ/Default Team".to_string(),
            rows: 2,
            total: Decimal::from_str("30.00").unwrap(),
            count: 2,
            cleared: false,
            transport_failures: failures,
        }
    }

    #[test]
    fn summary_line() {
        assert_eq!(
            format_import_summary(&summary(0)),
            "Imported 2 donation(s) from tiltify-export-GDQ-fact-donations.csv for GDQ/Default Team: total=30 count=2"
        );
        assert!(format_import_summary(&summary(3)).ends_with("(3 write(s) failed; the store is missing points)"));
    }

    #[test]
    fn json_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        write_summary_json(&path, &[summary(1)]).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["scope"], "GDQ/Default Team");
        assert_eq!(value[0]["total"], "30.00");
        assert_eq!(value[0]["transport_failures"], 1);
    }
}
