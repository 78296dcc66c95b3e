//! Top-level application orchestration.
//!
//! `src/main.rs` only maps errors to exit codes; this module is the real main:
//! - parses CLI arguments
//! - resolves environment settings and logging
//! - picks the gateway (HTTP or dry-run) and confirmation prompt
//! - runs the import pipeline and reports the outcome

use clap::Parser;
use tracing::{error, info};

use crate::cli::confirm::{AssumeYes, Confirm, StdinConfirm};
use crate::cli::{Command, ImportArgs, SanitizeArgs};
use crate::config::Settings;
use crate::domain::ImportConfig;
use crate::error::AppError;
use crate::gateway::{IngestionGateway, StdoutGateway, VictoriaMetricsClient};

pub mod pipeline;

/// Entry point for the `tiltify-import` binary.
pub fn run() -> Result<(), AppError> {
    // `tiltify-import -c a.csv` is shorthand for `tiltify-import import -c a.csv`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Import(args) => handle_import(args),
        Command::Sanitize(args) => handle_sanitize(args),
    }
}

fn handle_import(args: ImportArgs) -> Result<(), AppError> {
    let settings = Settings::from_env()?;
    let config = import_config_from_args(&args);
    crate::logging::init(&settings.log_level, config.verbose);

    let mut gateway: Box<dyn IngestionGateway> = if config.dry_run {
        Box::new(StdoutGateway::new())
    } else {
        Box::new(VictoriaMetricsClient::from_settings(&settings)?)
    };
    let mut confirm: Box<dyn Confirm> = if config.assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirm)
    };

    let report = pipeline::run_import(&config, &settings, gateway.as_mut(), confirm.as_mut())?;

    if let Some(path) = &config.export_summary {
        crate::report::write_summary_json(path, &report.summaries)?;
        info!(path = %path.display(), "wrote import summary");
    }

    if report.declined {
        println!("exiting");
    }

    match report.failures.first() {
        None => Ok(()),
        Some((_, first)) => Err(AppError::new(
            first.kind(),
            first.exit_code(),
            format!(
                "{} of {} file(s) failed to import; first error: {first}",
                report.failures.len(),
                config.files.len()
            ),
        )),
    }
}

fn handle_sanitize(args: SanitizeArgs) -> Result<(), AppError> {
    let settings = Settings::from_env()?;
    crate::logging::init(&settings.log_level, false);

    info!(files = ?args.files, "sanitizing files");
    let mut first_error = None;
    for path in &args.files {
        match crate::io::sanitize_file(path) {
            Ok(removed) => info!(file = %path.display(), removed, "sanitized"),
            Err(err) => {
                error!(file = %path.display(), "sanitize failed: {err}");
                first_error.get_or_insert(err);
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

pub fn import_config_from_args(args: &ImportArgs) -> ImportConfig {
    ImportConfig {
        files: args.files.clone(),
        mode: args.mode,
        clear: args.clear,
        verbose: args.verbose,
        assume_yes: args.yes,
        dry_run: args.dry_run,
        export_summary: args.export_summary.clone(),
    }
}

/// Rewrite argv so a missing subcommand means `import`.
///
/// Rules:
/// - `tiltify-import`                   -> unchanged (clap prints usage)
/// - `tiltify-import -c a.csv`          -> `tiltify-import import -c a.csv`
/// - `tiltify-import a.csv`             -> `tiltify-import import a.csv`
/// - `tiltify-import --help/--version`  -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "import" | "sanitize");
    if is_subcommand {
        return argv;
    }

    argv.insert(1, "import".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_files_default_to_import() {
        assert_eq!(
            rewrite_args(args(&["tiltify-import", "a.csv"])),
            args(&["tiltify-import", "import", "a.csv"])
        );
        assert_eq!(
            rewrite_args(args(&["tiltify-import", "-c", "a.csv"])),
            args(&["tiltify-import", "import", "-c", "a.csv"])
        );
    }

    #[test]
    fn explicit_subcommands_and_help_are_untouched() {
        for argv in [
            args(&["tiltify-import"]),
            args(&["tiltify-import", "--help"]),
            args(&["tiltify-import", "sanitize", "a.csv"]),
            args(&["tiltify-import", "import", "a.csv"]),
        ] {
            assert_eq!(rewrite_args(argv.clone()), argv);
        }
    }

    #[test]
    fn config_mirrors_args() {
        let cli = crate::cli::Cli::parse_from(rewrite_args(args(&["tiltify-import", "-y", "--dry-run", "a.csv"])));
        let Command::Import(import) = cli.command else {
            panic!("expected import");
        };
        let config = import_config_from_args(&import);
        assert!(config.assume_yes);
        assert!(config.dry_run);
        assert!(!config.clear);
        assert_eq!(config.files.len(), 1);
    }
}
