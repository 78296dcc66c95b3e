//! Scope names derived from export filenames.
//!
//! Exports are named `tiltify-export-<NAME>-fact-donations.csv`; `<NAME>` is
//! the campaign (or event) the file belongs to.

use std::path::Path;

use crate::error::AppError;

const NAME_PREFIX: &str = "tiltify-export-";
const NAME_SUFFIX: &str = "-fact-donations";

/// Extract `<NAME>` from an export path.
pub fn derive_scope_name(path: &Path) -> Result<String, AppError> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| AppError::naming_convention(format!("No usable file name in '{}'.", path.display())))?;

    let name = stem
        .split_once(NAME_PREFIX)
        .and_then(|(_, rest)| rest.split_once(NAME_SUFFIX))
        .map(|(name, _)| name)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            AppError::naming_convention(format!(
                "Cannot derive a scope name from '{}': expected `{NAME_PREFIX}<NAME>{NAME_SUFFIX}` \
                 (or set CAMPAIGN_NAME / EVENT_NAME).",
                path.display()
            ))
        })?;

    Ok(name.to_string())
}

/// Use the override when present, otherwise derive from the filename.
pub fn resolve_scope_name(path: &Path, override_name: Option<&str>) -> Result<String, AppError> {
    match override_name {
        Some(name) => Ok(name.to_string()),
        None => derive_scope_name(path),
    }
}
