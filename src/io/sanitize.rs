//! Strip donor PII from exports before they are shared or archived.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::StringRecord;

use crate::error::AppError;

/// Columns removed by `sanitize`.
pub const PII_COLUMNS: [&str; 3] = ["Donor Email", "Donor Name", "Donor Comment"];

/// Rewrite an export in place without the PII columns.
///
/// Returns the number of columns removed.
pub fn sanitize_file(path: &Path) -> Result<usize, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open CSV '{}': {e}", path.display())))?;

    // Read everything first; the output overwrites the input.
    let mut out = Vec::new();
    let removed = sanitize(file, &mut out)?;

    std::fs::write(path, out)
        .map_err(|e| AppError::io(format!("Failed to write CSV '{}': {e}", path.display())))?;
    Ok(removed)
}

/// Copy CSV from `source` to `sink`, dropping the PII columns.
pub fn sanitize<R: Read, W: Write>(source: R, sink: W) -> Result<usize, AppError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(source);
    let mut writer = csv::Writer::from_writer(sink);

    let headers = reader
        .headers()
        .map_err(|e| AppError::malformed_input(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let keep: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, name)| !is_pii_column(name))
        .map(|(idx, _)| idx)
        .collect();

    let write_err = |e: csv::Error| AppError::io(format!("Failed to write sanitized CSV: {e}"));

    writer.write_record(select(&headers, &keep)).map_err(write_err)?;
    for (idx, result) in reader.records().enumerate() {
        let record = result
            .map_err(|e| AppError::malformed_input(format!("CSV parse error on line {}: {e}", idx + 2)))?;
        writer.write_record(select(&record, &keep)).map_err(write_err)?;
    }
    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush sanitized CSV: {e}")))?;

    Ok(headers.len() - keep.len())
}

fn is_pii_column(name: &str) -> bool {
    let name = name.trim().trim_start_matches('\u{feff}');
    PII_COLUMNS.iter().any(|pii| pii.eq_ignore_ascii_case(name))
}

fn select<'a>(record: &'a StringRecord, keep: &'a [usize]) -> impl Iterator<Item = &'a str> + 'a {
    keep.iter().map(move |&idx| record.get(idx).unwrap_or(""))
}
