//! The import workflow shared by real and dry runs.
//!
//! export file -> scope name -> rows -> confirm -> (clear) -> per-row writes
//!
//! For every row the observation line is written first, then the scope's
//! running total and count. In campaign-team mode the team rollup follows.
//! Store failures are counted and skipped; bad input aborts the file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::aggregate::{
    CampaignLabels, CampaignTeamLabels, EventLabels, LabelSet, ScopeRegistry, ScopedAccumulator, TeamLabels,
    round_cents,
};
use crate::cli::confirm::Confirm;
use crate::config::Settings;
use crate::domain::{DonationRow, ImportConfig, LabelAxis, ScopeMode};
use crate::error::AppError;
use crate::gateway::IngestionGateway;
use crate::io::{load_donations, resolve_scope_name};
use crate::protocol::{LineProtocolRecord, RecordSchema};
use crate::report::ImportSummary;

/// Outcome of a whole `import` run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub summaries: Vec<ImportSummary>,
    /// Files that were skipped because of bad input or naming.
    pub failures: Vec<(PathBuf, AppError)>,
    /// The operator declined a confirmation; later files were not touched.
    pub declined: bool,
}

/// Import every configured file using the schema of `config.mode`.
pub fn run_import(
    config: &ImportConfig,
    settings: &Settings,
    gateway: &mut dyn IngestionGateway,
    confirm: &mut dyn Confirm,
) -> Result<RunReport, AppError> {
    match config.mode {
        ScopeMode::Campaign => {
            let mut importer = Importer::<CampaignLabels>::new(None);
            importer.run(config, settings, gateway, confirm)
        }
        ScopeMode::CampaignTeam => {
            let rollup = ScopedAccumulator::<TeamLabels>::new(vec![settings.team_name.clone()])?;
            info!(team = %settings.team_name, "team rollup enabled");
            let mut importer = Importer::<CampaignTeamLabels>::new(Some(rollup));
            importer.run(config, settings, gateway, confirm)
        }
        ScopeMode::Event => {
            let mut importer = Importer::<EventLabels>::new(None);
            importer.run(config, settings, gateway, confirm)
        }
    }
}

/// Per-run state: one accumulator per scope plus the optional team rollup.
pub struct Importer<L: LabelSet> {
    schema: RecordSchema,
    registry: ScopeRegistry<L>,
    rollup: Option<ScopedAccumulator<TeamLabels>>,
    rollup_schema: RecordSchema,
    /// Selectors already deleted this run; each series is cleared at most once.
    cleared: HashSet<String>,
}

impl<L: LabelSet> Importer<L> {
    pub fn new(rollup: Option<ScopedAccumulator<TeamLabels>>) -> Self {
        Self {
            schema: ScopedAccumulator::<L>::record_schema(),
            registry: ScopeRegistry::default(),
            rollup,
            rollup_schema: ScopedAccumulator::<TeamLabels>::record_schema(),
            cleared: HashSet::new(),
        }
    }

    pub fn run(
        &mut self,
        config: &ImportConfig,
        settings: &Settings,
        gateway: &mut dyn IngestionGateway,
        confirm: &mut dyn Confirm,
    ) -> Result<RunReport, AppError> {
        let mut report = RunReport::default();
        info!(files = ?config.files, "processing files");

        for path in &config.files {
            info!(file = %path.display(), "importing file");
            match self.import_file(path, config, settings, gateway, confirm) {
                Ok(Some(summary)) => {
                    info!("{}", crate::report::format_import_summary(&summary));
                    report.summaries.push(summary);
                }
                Ok(None) => {
                    info!("import declined; exiting");
                    report.declined = true;
                    break;
                }
                Err(err) => {
                    error!(file = %path.display(), "skipping file: {err}");
                    report.failures.push((path.clone(), err));
                }
            }
        }

        Ok(report)
    }

    /// Import one file. `Ok(None)` means the operator declined.
    pub fn import_file(
        &mut self,
        path: &Path,
        config: &ImportConfig,
        settings: &Settings,
        gateway: &mut dyn IngestionGateway,
        confirm: &mut dyn Confirm,
    ) -> Result<Option<ImportSummary>, AppError> {
        let scope_name = resolve_scope_name(path, settings.scope_override(config.mode))?;
        let labels = scope_labels(L::AXES, &scope_name, &settings.team_name);

        let rows = load_donations(path)?;
        let prompt = format!("About to import {} donations for {scope_name}.", rows.len());
        if !confirm.confirm(&prompt)? {
            return Ok(None);
        }

        let mut transport_failures = 0;
        if config.clear {
            transport_failures += self.clear_scope(&labels, gateway)?;
        }
        transport_failures += self.import_rows(&labels, &rows, gateway)?;

        let acc = self
            .registry
            .get(&labels)
            .ok_or_else(|| AppError::config(format!("Scope {} was never registered.", labels.join("/"))))?;
        Ok(Some(ImportSummary {
            file: path.to_path_buf(),
            scope: labels.join("/"),
            rows: rows.len(),
            total: round_cents(acc.total()),
            count: acc.count(),
            cleared: config.clear,
            transport_failures,
        }))
    }

    /// Delete the stored series of a scope (and of the rollup, when present).
    ///
    /// Series cleared earlier in the run are left alone so points written by
    /// previous files survive. Returns the number of failed delete requests.
    pub fn clear_scope(&mut self, labels: &[String], gateway: &mut dyn IngestionGateway) -> Result<usize, AppError> {
        let mut selectors = self.registry.get_or_insert(labels.to_vec())?.series_selectors();
        if let Some(rollup) = &self.rollup {
            selectors.extend(rollup.series_selectors());
        }

        let mut failures = 0;
        for selector in selectors {
            if !self.cleared.insert(selector.clone()) {
                debug!(%selector, "series already cleared this run");
                continue;
            }
            info!(%selector, "deleting series");
            if let Err(err) = gateway.delete_series(&selector) {
                warn!(%selector, "delete failed: {err}");
                failures += 1;
            }
        }
        Ok(failures)
    }

    /// Accumulate and write every row. Returns the number of failed writes.
    pub fn import_rows(
        &mut self,
        labels: &[String],
        rows: &[DonationRow],
        gateway: &mut dyn IngestionGateway,
    ) -> Result<usize, AppError> {
        let acc = self.registry.get_or_insert(labels.to_vec())?;
        let mut failures = 0;

        for row in rows {
            debug!(line = row.line, amount = %row.amount, "uploading donation");
            let observation = self.schema.observation_record(row, acc.labels());
            failures += send(gateway, &observation);

            let tally = acc.update(row.amount);
            debug!(scope = acc.name(), total = %tally.total, count = tally.count, "scope totals");
            failures += send(gateway, &self.schema.total_record(tally.total, &row.donated_at, acc.labels()));
            failures += send(gateway, &self.schema.count_record(tally.count, &row.donated_at, acc.labels()));

            if let Some(rollup) = self.rollup.as_mut() {
                let tally = rollup.update(row.amount);
                let labels = rollup.labels();
                failures += send(gateway, &self.rollup_schema.total_record(tally.total, &row.donated_at, labels));
                failures += send(gateway, &self.rollup_schema.count_record(tally.count, &row.donated_at, labels));
            }
        }

        Ok(failures)
    }

    pub fn registry(&self) -> &ScopeRegistry<L> {
        &self.registry
    }
}

/// Label values for `axes`: the scope name for campaign/event, the team name for team.
pub fn scope_labels(axes: &[LabelAxis], scope_name: &str, team_name: &str) -> Vec<String> {
    axes.iter()
        .map(|axis| match axis {
            LabelAxis::Campaign | LabelAxis::Event => scope_name.to_string(),
            LabelAxis::Team => team_name.to_string(),
        })
        .collect()
}

/// Write one record; a failure is logged and reported as `1`.
fn send(gateway: &mut dyn IngestionGateway, record: &LineProtocolRecord) -> usize {
    let format = record.format().to_string();
    match gateway.ingest(record.line(), &format) {
        Ok(()) => 0,
        Err(err) => {
            warn!(metric = record.metric(), line = record.line(), "write failed: {err}");
            1
        }
    }
}
