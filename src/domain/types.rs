//! Shared domain types.
//!
//! Rows produced by the CSV loader and consumed by the accumulators and
//! record formatter, plus the label and mode enums that shape every series.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use rust_decimal::Decimal;

/// One donation, as read from a single export line.
#[derive(Debug, Clone, PartialEq)]
pub struct DonationRow {
    /// 1-based line number in the source CSV (header is line 1).
    pub line: usize,
    pub amount: Decimal,
    pub donated_at: DateTime<Utc>,
    pub reward_quantity: Option<i64>,
    /// Empty when the export had no value.
    pub poll_name: String,
    /// Empty when the export had no value.
    pub target_name: String,
}

impl DonationRow {
    /// Reward quantity as it appears on the wire (empty when absent).
    pub fn reward_quantity_field(&self) -> String {
        self.reward_quantity.map(|q| q.to_string()).unwrap_or_default()
    }
}

/// A label dimension attached to stored series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelAxis {
    Campaign,
    Team,
    Event,
}

impl LabelAxis {
    /// Label name used in field-tag schemas and series selectors.
    pub fn label_name(self) -> &'static str {
        match self {
            LabelAxis::Campaign => "campaign",
            LabelAxis::Team => "team",
            LabelAxis::Event => "event",
        }
    }
}

/// Which scope labels a deployment attaches to its series.
///
/// The mode is picked once at startup and fixes the shape of every line
/// written during the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScopeMode {
    /// Aggregate per campaign only.
    Campaign,
    /// Aggregate per campaign (labelled with its team) plus a team-wide rollup.
    CampaignTeam,
    /// Aggregate per event.
    Event,
}

impl ScopeMode {
    /// The label that identifies the scope a file belongs to.
    pub fn key_axis(self) -> LabelAxis {
        match self {
            ScopeMode::Campaign | ScopeMode::CampaignTeam => LabelAxis::Campaign,
            ScopeMode::Event => LabelAxis::Event,
        }
    }
}

/// Resolved configuration for an `import` run.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub files: Vec<PathBuf>,
    pub mode: ScopeMode,
    pub clear: bool,
    pub verbose: bool,
    pub assume_yes: bool,
    pub dry_run: bool,
    pub export_summary: Option<PathBuf>,
}
