//! Command-line parsing for the donation importer.
//!
//! Argument parsing and command dispatch live here and in `app`; the
//! aggregation and formatting code never sees clap types.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::ScopeMode;

pub mod confirm;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "tiltify-import",
    version,
    about = "Import Tiltify donation exports into VictoriaMetrics"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import donation exports (the default when no subcommand is given).
    Import(ImportArgs),
    /// Remove donor name/email/comment columns from exports, in place.
    Sanitize(SanitizeArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct ImportArgs {
    /// Delete previously imported series for each scope before importing.
    #[arg(short = 'c', long)]
    pub clear: bool,

    /// Log at debug level regardless of LOG_LEVEL.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Do not ask for confirmation before importing each file.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Which scope labels to attach to the stored series.
    #[arg(long, value_enum, default_value_t = ScopeMode::CampaignTeam)]
    pub mode: ScopeMode,

    /// Print the lines instead of sending them to the store.
    #[arg(long)]
    pub dry_run: bool,

    /// Write per-file import summaries to a JSON file.
    #[arg(long = "export-summary", value_name = "JSON")]
    pub export_summary: Option<PathBuf>,

    /// Donation export CSV files.
    #[arg(value_name = "FILES", required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct SanitizeArgs {
    /// Export CSV files to rewrite.
    #[arg(value_name = "FILES", required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_flags_parse() {
        let cli = Cli::try_parse_from([
            "tiltify-import",
            "import",
            "-c",
            "-v",
            "--mode",
            "event",
            "a.csv",
            "b.csv",
        ])
        .unwrap();
        let Command::Import(args) = cli.command else {
            panic!("expected import");
        };
        assert!(args.clear);
        assert!(args.verbose);
        assert!(!args.yes);
        assert_eq!(args.mode, ScopeMode::Event);
        assert_eq!(args.files, [PathBuf::from("a.csv"), PathBuf::from("b.csv")]);
    }

    #[test]
    fn default_mode_is_campaign_team() {
        let cli = Cli::try_parse_from(["tiltify-import", "import", "a.csv"]).unwrap();
        let Command::Import(args) = cli.command else {
            panic!("expected import");
        };
        assert_eq!(args.mode, ScopeMode::CampaignTeam);
    }

    #[test]
    fn files_are_required() {
        assert!(Cli::try_parse_from(["tiltify-import", "import", "-c"]).is_err());
    }
}
