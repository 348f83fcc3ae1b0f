//! Screenshot capture and persistence.
//!
//! Every case ends with a screenshot named
//! `screenshot_{caseName}_{timestamp}.png`. Capture during teardown is
//! best-effort: a failed screenshot is logged, never allowed to mask the
//! case outcome.

use crate::result::EsperarResult;
use crate::session::BrowserSession;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

/// File name for a case screenshot taken at a given instant
#[must_use]
pub fn screenshot_file_name(case_name: &str, at: DateTime<Local>) -> String {
    format!("screenshot_{case_name}_{}.png", at.format("%Y%m%d_%H%M%S"))
}

/// Capture a screenshot and write it under `dir`
///
/// # Errors
///
/// Returns error if the capture or the write fails
pub fn capture<S: BrowserSession>(
    session: &S,
    dir: &Path,
    case_name: &str,
) -> EsperarResult<PathBuf> {
    let bytes = session.screenshot()?;
    fs::create_dir_all(dir)?;
    let path = dir.join(screenshot_file_name(case_name, Local::now()));
    fs::write(&path, bytes)?;
    Ok(path)
}

/// Capture a screenshot, logging instead of failing
pub fn capture_best_effort<S: BrowserSession>(
    session: &S,
    dir: &Path,
    case_name: &str,
) -> Option<PathBuf> {
    match capture(session, dir, case_name) {
        Ok(path) => {
            tracing::info!(case = case_name, path = %path.display(), "screenshot saved");
            Some(path)
        }
        Err(e) => {
            tracing::warn!(case = case_name, error = %e, "failed to save screenshot");
            None
        }
    }
}
