//! Running totals for one scope.
//!
//! Campaigns, teams and events aggregate identically; they only differ in which
//! labels their series carry. That difference lives in the `LabelSet` type
//! parameter so a single accumulator type covers every deployment mode.

use std::marker::PhantomData;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::LabelAxis;
use crate::error::AppError;
use crate::protocol::{series_selector, RecordSchema, METRICS};

/// Labels attached to the series of one kind of scope.
pub trait LabelSet {
    /// Label axes in column order. The first axis identifies the scope.
    const AXES: &'static [LabelAxis];
    /// Axes that must be absent on this scope's series when selecting them.
    const ABSENT: &'static [LabelAxis] = &[];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignLabels;

impl LabelSet for CampaignLabels {
    const AXES: &'static [LabelAxis] = &[LabelAxis::Campaign];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignTeamLabels;

impl LabelSet for CampaignTeamLabels {
    const AXES: &'static [LabelAxis] = &[LabelAxis::Campaign, LabelAxis::Team];
}

/// Team-wide rollup; its series have no campaign label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamLabels;

impl LabelSet for TeamLabels {
    const AXES: &'static [LabelAxis] = &[LabelAxis::Team];
    const ABSENT: &'static [LabelAxis] = &[LabelAxis::Campaign];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventLabels;

impl LabelSet for EventLabels {
    const AXES: &'static [LabelAxis] = &[LabelAxis::Event];
}

/// Totals after one update, ready to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    /// Running total rounded to cents.
    pub total: Decimal,
    pub count: u64,
}

#[derive(Debug, Clone)]
pub struct ScopedAccumulator<L: LabelSet> {
    labels: Vec<String>,
    donation_total: Decimal,
    donation_count: u64,
    _labels: PhantomData<L>,
}

impl<L: LabelSet> ScopedAccumulator<L> {
    /// `labels` holds one value per `L::AXES` entry, in the same order.
    pub fn new(labels: Vec<String>) -> Result<Self, AppError> {
        if labels.len() != L::AXES.len() {
            return Err(AppError::config(format!(
                "Scope expects {} label value(s), got {}.",
                L::AXES.len(),
                labels.len()
            )));
        }
        Ok(Self {
            labels,
            donation_total: Decimal::ZERO,
            donation_count: 0,
            _labels: PhantomData,
        })
    }

    /// Value of the identifying label (campaign, team or event name).
    pub fn name(&self) -> &str {
        self.labels.first().map(String::as_str).unwrap_or_default()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Add one donation.
    ///
    /// The stored total keeps full precision; only the returned total is rounded.
    pub fn update(&mut self, amount: Decimal) -> Tally {
        self.donation_total += amount;
        self.donation_count += 1;
        Tally {
            total: round_cents(self.donation_total),
            count: self.donation_count,
        }
    }

    /// Unrounded running total.
    pub fn total(&self) -> Decimal {
        self.donation_total
    }

    pub fn count(&self) -> u64 {
        self.donation_count
    }

    pub fn record_schema() -> RecordSchema {
        RecordSchema::for_axes(L::AXES)
    }

    /// Selectors matching every series this scope writes, keyed on its
    /// identifying label.
    pub fn series_selectors(&self) -> Vec<String> {
        let mut matchers: Vec<(&str, &str)> = Vec::with_capacity(1 + L::ABSENT.len());
        if let Some(axis) = L::AXES.first() {
            matchers.push((axis.label_name(), self.name()));
        }
        matchers.extend(L::ABSENT.iter().map(|axis| (axis.label_name(), "")));

        METRICS
            .iter()
            .map(|metric| series_selector(metric, &matchers))
            .collect()
    }
}

/// Round half to even at two decimal places.
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}
