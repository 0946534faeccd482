//! Output file naming.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::{Error, Result};

/// Path of the profile file for `handle`.
///
/// Returns an error if the handle could escape the accounts directory.
pub fn profile_path(accounts_dir: &Path, handle: &str) -> Result<PathBuf> {
    let name = sanitize_handle(handle)?;
    Ok(accounts_dir.join(format!("{}.json", name)))
}

/// Path of the timeline file for a collection period.
pub fn timeline_path(tweets_dir: &Path, period: NaiveDate) -> PathBuf {
    tweets_dir.join(format!("{}.json", period_key(period)))
}

/// File stem of a collection period (`YYYY-MM-DD`).
pub fn period_key(period: NaiveDate) -> String {
    period.format("%Y-%m-%d").to_string()
}

/// Reject handles that are not a single plain path component.
pub fn sanitize_handle(handle: &str) -> Result<&str> {
    if handle.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            handle
        )));
    }

    if handle.contains('/') || handle.contains('\\') || handle.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed in handle: '{}'",
            handle
        )));
    }

    if handle.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Handle cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(handle)
}
