//! Donation export CSV loading.
//!
//! Turns an export into a time-ordered list of `DonationRow`s. Unlike a
//! streaming reader, the whole file is materialized so the caller can report
//! the row count before anything is written to the store.
//!
//! Any malformed row aborts the load: a partially imported file would leave
//! the running totals out of step with the stored observations.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::StringRecord;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::DonationRow;
use crate::error::AppError;
use crate::protocol::parse_export_timestamp;

pub const COL_TIME_OF_DONATION: &str = "Time of Donation";
pub const COL_DONATION_AMOUNT: &str = "Donation Amount";
pub const COL_REWARD_QUANTITY: &str = "Reward Quantity";
pub const COL_POLL_NAME: &str = "Poll Name";
pub const COL_TARGET_NAME: &str = "Target Name";

/// Load an export file from disk.
pub fn load_donations(path: &Path) -> Result<Vec<DonationRow>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_donations(file)
}

/// Parse every row of an export and sort ascending by donation time.
///
/// The sort is stable, so donations sharing a timestamp keep their file order.
pub fn read_donations<R: Read>(source: R) -> Result<Vec<DonationRow>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::malformed_input(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header line, and lines are 1-based.
        let line = idx + 2;
        let record = result
            .map_err(|e| AppError::malformed_input(format!("CSV parse error on line {line}: {e}")))?;
        let row = parse_row(&record, &header_map, line)
            .map_err(|e| AppError::malformed_input(format!("Line {line}: {e}")))?;
        rows.push(row);
    }

    rows.sort_by_key(|row| row.donated_at);
    Ok(rows)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet round-trips can leave a BOM on the first header.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    for column in [COL_TIME_OF_DONATION, COL_DONATION_AMOUNT] {
        if !header_map.contains_key(&normalize_header_name(column)) {
            return Err(AppError::malformed_input(format!(
                "Missing required column: `{column}`"
            )));
        }
    }
    Ok(())
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>, line: usize) -> Result<DonationRow, String> {
    let donated_at = parse_export_timestamp(get_required(record, header_map, COL_TIME_OF_DONATION)?)?;

    let raw_amount = get_required(record, header_map, COL_DONATION_AMOUNT)?;
    let amount = Decimal::from_str(raw_amount)
        .or_else(|_| Decimal::from_scientific(raw_amount))
        .map_err(|e| format!("Invalid donation amount '{raw_amount}': {e}"))?;

    let reward_quantity = get_optional(record, header_map, COL_REWARD_QUANTITY)
        .map(parse_quantity)
        .transpose()?;

    Ok(DonationRow {
        line,
        amount,
        donated_at,
        reward_quantity,
        poll_name: get_optional(record, header_map, COL_POLL_NAME)
            .unwrap_or_default()
            .to_string(),
        target_name: get_optional(record, header_map, COL_TARGET_NAME)
            .unwrap_or_default()
            .to_string(),
    })
}

/// Integer quantity; integral decimals such as `2.0` are accepted too.
fn parse_quantity(raw: &str) -> Result<i64, String> {
    if let Ok(q) = raw.parse::<i64>() {
        return Ok(q);
    }
    let invalid = || format!("Invalid reward quantity '{raw}'");
    let value = Decimal::from_str(raw).map_err(|_| invalid())?;
    if !value.fract().is_zero() {
        return Err(invalid());
    }
    value.to_i64().ok_or_else(invalid)
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    get_optional(record, header_map, name).ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(&normalize_header_name(name))?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::ErrorKind;
    use crate::protocol::unix_millis;

    const HEADER: &str =
        "Donation ID,Donation Amount,Time of Donation,Donor Name,Reward Quantity,Poll Name,Target Name\n";

    fn load(body: &str) -> Result<Vec<DonationRow>, AppError> {
        read_donations(format!("{HEADER}{body}").as_bytes())
    }

    #[test]
    fn rows_are_sorted_by_time() {
        let rows = load(
            "2,20,2024-01-01 00:00:02.000000Z,Bob,,,\n\
             1,10.005,2024-01-01 00:00:01.000000Z,Ann,,,\n",
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].amount, Decimal::from_str("10.005").unwrap());
        assert_eq!(rows[0].line, 3);
        assert_eq!(unix_millis(&rows[0].donated_at), "1704067201000");
        assert_eq!(rows[1].amount, Decimal::from(20));
    }

    #[test]
    fn equal_timestamps_keep_file_order() {
        let rows = load(
            "1,3,2024-01-01 00:00:05.000000Z,,,,\n\
             2,1,2024-01-01 00:00:05.000000Z,,,,\n\
             3,2,2024-01-01 00:00:05.000000Z,,,,\n\
             4,9,2024-01-01 00:00:01.000000Z,,,,\n",
        )
        .unwrap();
        let amounts: Vec<String> = rows.iter().map(|r| r.amount.to_string()).collect();
        assert_eq!(amounts, ["9", "3", "1", "2"]);
    }

    #[test]
    fn missing_optionals_become_empty() {
        let rows = load("1,5,2024-01-01 00:00:01.000000Z,,,,\n").unwrap();
        let row = &rows[0];
        assert_eq!(row.reward_quantity, None);
        assert_eq!(row.reward_quantity_field(), "");
        assert_eq!(row.poll_name, "");
        assert_eq!(row.target_name, "");
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let csv = "Time of Donation,Donation Amount\n2024-01-01 00:00:01.000000Z,5\n";
        let rows = read_donations(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].poll_name, "");
    }

    #[test]
    fn populated_optionals_are_kept() {
        let rows = load("1,5,2024-01-01 00:00:01.000000Z,Ann,2.0,Pick a Name,\"Any%, Glitchless\"\n").unwrap();
        let row = &rows[0];
        assert_eq!(row.reward_quantity, Some(2));
        assert_eq!(row.poll_name, "Pick a Name");
        assert_eq!(row.target_name, "Any%, Glitchless");
    }

    #[test]
    fn bad_timestamp_is_malformed_input() {
        let err = load("1,5,2024/01/01 00:00:01,,,,\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert!(err.to_string().contains("Line 2"), "{err}");
    }

    #[test]
    fn bad_amount_and_quantity_are_malformed_input() {
        assert_eq!(
            load("1,five,2024-01-01 00:00:01.000000Z,,,,\n").unwrap_err().kind(),
            ErrorKind::MalformedInput
        );
        assert_eq!(
            load("1,5,2024-01-01 00:00:01.000000Z,,1.5,,\n").unwrap_err().kind(),
            ErrorKind::MalformedInput
        );
    }

    #[test]
    fn undecodable_record_is_malformed_input() {
        let mut bytes = format!("{HEADER}1,5,2024-01-01 00:00:01.000000Z,,,,\n").into_bytes();
        bytes.extend_from_slice(b"2,6,2024-01-01 00:00:02.000000Z,\xff\xfe,,,\n");

        let err = read_donations(bytes.as_slice()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn missing_required_column_is_reported() {
        let err = read_donations("Donation Amount\n5\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Time of Donation"));
    }

    #[test]
    fn bom_prefixed_header_is_recognized() {
        let csv = "\u{feff}Time of Donation,Donation Amount\n2024-01-01 00:00:01.000000Z,5\n";
        assert_eq!(read_donations(csv.as_bytes()).unwrap().len(), 1);
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{HEADER}1,5,2024-01-01 00:00:01.000000Z,,,,\n").unwrap();
        assert_eq!(load_donations(file.path()).unwrap().len(), 1);

        let err = load_donations(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
