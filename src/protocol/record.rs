//! Rendering rows and running totals into import lines.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::DonationRow;
use crate::protocol::schema::{FormatDescriptor, RecordSchema};
use crate::protocol::timestamp::unix_millis;

/// One rendered line plus the descriptor the store needs to interpret it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineProtocolRecord {
    line: String,
    format: FormatDescriptor,
}

impl LineProtocolRecord {
    fn from_fields(format: &FormatDescriptor, fields: &[&str]) -> Self {
        debug_assert_eq!(format.len(), fields.len(), "field count must match descriptor");
        let line = fields
            .iter()
            .map(|field| escape_field(field))
            .collect::<Vec<_>>()
            .join(",");
        Self {
            line,
            format: format.clone(),
        }
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn format(&self) -> &FormatDescriptor {
        &self.format
    }

    pub fn metric(&self) -> &'static str {
        self.format.metric()
    }
}

impl RecordSchema {
    /// `<amount>,<ts>,<reward>,<poll>,<target>,<scope labels...>`
    pub fn observation_record(&self, row: &DonationRow, labels: &[String]) -> LineProtocolRecord {
        let amount = format_decimal(row.amount);
        let ts = unix_millis(&row.donated_at);
        let reward = row.reward_quantity_field();

        let mut fields: Vec<&str> = vec![
            amount.as_str(),
            ts.as_str(),
            reward.as_str(),
            row.poll_name.as_str(),
            row.target_name.as_str(),
        ];
        fields.extend(labels.iter().map(String::as_str));
        LineProtocolRecord::from_fields(&self.observation, &fields)
    }

    /// `<running total>,<ts>,<scope labels...>`
    pub fn total_record(&self, total: Decimal, at: &DateTime<Utc>, labels: &[String]) -> LineProtocolRecord {
        let total = format_decimal(total);
        let ts = unix_millis(at);

        let mut fields: Vec<&str> = vec![total.as_str(), ts.as_str()];
        fields.extend(labels.iter().map(String::as_str));
        LineProtocolRecord::from_fields(&self.total, &fields)
    }

    /// `<running count>,<ts>,<scope labels...>`
    pub fn count_record(&self, count: u64, at: &DateTime<Utc>, labels: &[String]) -> LineProtocolRecord {
        let count = count.to_string();
        let ts = unix_millis(at);

        let mut fields: Vec<&str> = vec![count.as_str(), ts.as_str()];
        fields.extend(labels.iter().map(String::as_str));
        LineProtocolRecord::from_fields(&self.count, &fields)
    }
}

/// Decimal without trailing fractional zeros (`10.50` -> `10.5`, `20.00` -> `20`).
pub fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Quote a field CSV-style when it would otherwise split or break the line.
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
