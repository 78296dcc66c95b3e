//! Export timestamp parsing and unix-millisecond rendering.

use chrono::{DateTime, NaiveDateTime, Utc};

/// `Time of Donation` format used by the export, e.g. `2024-01-05 18:30:00.123456Z`.
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.fZ";

/// Parse an export timestamp as a UTC instant.
pub fn parse_export_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    NaiveDateTime::parse_from_str(raw.trim(), EXPORT_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| {
            format!("Invalid donation timestamp '{raw}' (expected YYYY-MM-DD HH:MM:SS.ffffffZ): {e}")
        })
}

/// Milliseconds since the epoch as an integer string.
///
/// Sub-millisecond digits are dropped, never rounded.
pub fn unix_millis(instant: &DateTime<Utc>) -> String {
    (instant.timestamp_micros() / 1000).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_are_truncated_not_rounded() {
        let t = parse_export_timestamp("2024-01-05 18:30:00.999999Z").unwrap();
        assert_eq!(unix_millis(&t), "1704479400999");

        let t = parse_export_timestamp("2024-01-05 18:30:00.123456Z").unwrap();
        assert_eq!(unix_millis(&t), "1704479400123");
    }

    #[test]
    fn near_epoch_values() {
        let t = parse_export_timestamp("1970-01-01 00:00:01.000999Z").unwrap();
        assert_eq!(unix_millis(&t), "1000");
    }

    #[test]
    fn rejects_other_layouts() {
        assert!(parse_export_timestamp("2024-01-05T18:30:00.123456Z").is_err());
        assert!(parse_export_timestamp("2024-01-05 18:30:00.123456").is_err());
        assert!(parse_export_timestamp("05/01/2024 18:30").is_err());
        assert!(parse_export_timestamp("").is_err());
    }
}
