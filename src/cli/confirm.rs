//! Operator confirmation before a file is imported.
//!
//! The prompt is a trait so the import pipeline can run without a terminal.

use std::io::{self, BufRead, Write};

use crate::error::AppError;

pub trait Confirm {
    /// Show `prompt` and return whether the operator agreed.
    fn confirm(&mut self, prompt: &str) -> Result<bool, AppError>;
}

/// Accept only `y` / `yes` (any case).
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Interactive prompt on stdin/stdout. End of input counts as "no".
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool, AppError> {
        print!("{prompt} Continue? [y/N] ");
        io::stdout()
            .flush()
            .map_err(|e| AppError::io(format!("Failed to write prompt: {e}")))?;

        let mut input = String::new();
        let bytes = io::stdin()
            .lock()
            .read_line(&mut input)
            .map_err(|e| AppError::io(format!("Failed to read input: {e}")))?;

        Ok(bytes > 0 && is_affirmative(&input))
    }
}

/// Non-interactive approval (`--yes`).
#[derive(Debug, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> Result<bool, AppError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affirmative_answers() {
        for yes in ["y", "Y", "yes", "YES", " yes\n"] {
            assert!(is_affirmative(yes), "{yes:?}");
        }
        for no in ["", "n", "no", "yep", "sure"] {
            assert!(!is_affirmative(no), "{no:?}");
        }
    }

    #[test]
    fn assume_yes_always_agrees() {
        assert!(AssumeYes.confirm("About to import 3 donations").unwrap());
    }
}
