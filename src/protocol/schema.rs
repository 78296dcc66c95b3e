//! Field-tag schemas for the bulk CSV import endpoint.
//!
//! Every line sent to the store is described by a format string such as
//! `1:metric:donation_total,2:time:unix_ms,3:label:campaign`. Column 1 always
//! holds the metric value and column 2 the timestamp; the remaining columns
//! are labels.

use std::fmt;

use crate::domain::LabelAxis;

pub const METRIC_DONATION: &str = "donation";
pub const METRIC_DONATION_TOTAL: &str = "donation_total";
pub const METRIC_DONATION_COUNT: &str = "donation_count_total";

/// The three series every scope writes to.
pub const METRICS: [&str; 3] = [METRIC_DONATION, METRIC_DONATION_TOTAL, METRIC_DONATION_COUNT];

const TIME_FORMAT: &str = "unix_ms";

/// Per-row labels carried by the observation line ahead of the scope labels.
const OBSERVATION_LABELS: [&str; 3] = ["reward", "poll", "target"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Metric(&'static str),
    Time(&'static str),
    Label(&'static str),
}

/// Ordered column descriptions for one line shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDescriptor {
    fields: Vec<FieldKind>,
}

impl FormatDescriptor {
    /// Metric in column 1, unix-ms time in column 2, then `labels` in order.
    pub fn new<I>(metric: &'static str, labels: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        let mut fields = vec![FieldKind::Metric(metric), FieldKind::Time(TIME_FORMAT)];
        fields.extend(labels.into_iter().map(FieldKind::Label));
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldKind] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn metric(&self) -> &'static str {
        match self.fields.first() {
            Some(FieldKind::Metric(name)) => name,
            _ => "",
        }
    }
}

impl fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, field) in self.fields.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            let column = idx + 1;
            match field {
                FieldKind::Metric(name) => write!(f, "{column}:metric:{name}")?,
                FieldKind::Time(format) => write!(f, "{column}:time:{format}")?,
                FieldKind::Label(name) => write!(f, "{column}:label:{name}")?,
            }
        }
        Ok(())
    }
}

/// The three line shapes written for one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    pub observation: FormatDescriptor,
    pub total: FormatDescriptor,
    pub count: FormatDescriptor,
}

impl RecordSchema {
    pub fn for_axes(axes: &[LabelAxis]) -> Self {
        let scope_labels = || axes.iter().map(|axis| axis.label_name());
        Self {
            observation: FormatDescriptor::new(
                METRIC_DONATION,
                OBSERVATION_LABELS.iter().copied().chain(scope_labels()),
            ),
            total: FormatDescriptor::new(METRIC_DONATION_TOTAL, scope_labels()),
            count: FormatDescriptor::new(METRIC_DONATION_COUNT, scope_labels()),
        }
    }
}

/// Series selector such as `donation_total{campaign="GDQ2024"}`.
///
/// An empty value matches series that lack the label.
pub fn series_selector(metric: &str, matchers: &[(&str, &str)]) -> String {
    let matchers = matchers
        .iter()
        .map(|(label, value)| format!("{label}=\"{}\"", escape_label_value(value)))
        .collect::<Vec<_>>()
        .join(",");
    format!("{metric}{{{matchers}}}")
}

fn escape_label_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_values_are_escaped() {
        assert_eq!(
            series_selector("donation", &[("campaign", r#"The "Big" One\"#)]),
            r#"donation{campaign="The \"Big\" One\\"}"#
        );
    }

    #[test]
    fn campaign_team_schema_strings() {
        let schema = RecordSchema::for_axes(&[LabelAxis::Campaign, LabelAxis::Team]);
        assert_eq!(
            schema.observation.to_string(),
            "1:metric:donation,2:time:unix_ms,3:label:reward,4:label:poll,5:label:target,6:label:campaign,7:label:team"
        );
        assert_eq!(
            schema.total.to_string(),
            "1:metric:donation_total,2:time:unix_ms,3:label:campaign,4:label:team"
        );
        assert_eq!(
            schema.count.to_string(),
            "1:metric:donation_count_total,2:time:unix_ms,3:label:campaign,4:label:team"
        );
    }

    #[test]
    fn event_schema_has_a_single_scope_label() {
        let schema = RecordSchema::for_axes(&[LabelAxis::Event]);
        assert_eq!(schema.total.len(), 3);
        assert_eq!(schema.observation.len(), 6);
        assert_eq!(schema.count.fields()[2], FieldKind::Label("event"));
        assert_eq!(schema.count.metric(), METRIC_DONATION_COUNT);
    }
}
