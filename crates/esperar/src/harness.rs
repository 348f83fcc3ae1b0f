//! Per-case session scoping.
//!
//! A case owns exactly one browser session: acquired before the body runs,
//! screenshotted and released after it, on every exit path — pass, fail,
//! or panic. Panics are re-raised after cleanup so the surrounding test
//! runner still sees them.

use crate::config::SuiteConfig;
use crate::result::EsperarResult;
use crate::screenshot;
use crate::session::BrowserSession;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Once;
use std::time::{Duration, Instant};

static INIT_LOGGING: Once = Once::new();

/// Install a tracing subscriber honoring `RUST_LOG`.
///
/// Safe to call from every case; only the first call takes effect.
pub fn init_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// What happened in one case
#[derive(Debug)]
pub struct CaseReport {
    /// Case name
    pub name: String,
    /// Wall-clock duration of the case body plus teardown
    pub duration: Duration,
    /// Screenshot path, if teardown managed to save one
    pub screenshot: Option<PathBuf>,
    /// The case body's outcome
    pub outcome: EsperarResult<()>,
}

impl CaseReport {
    /// Whether the case passed
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Run one case body against a freshly acquired session.
///
/// Consumes the session and guarantees it is closed exactly once,
/// with a best-effort screenshot taken first. A panicking body is
/// resumed after cleanup.
pub fn run_case<S, F>(name: &str, config: &SuiteConfig, session: S, body: F) -> CaseReport
where
    S: BrowserSession,
    F: FnOnce(&S) -> EsperarResult<()>,
{
    init_logging();
    let start = Instant::now();
    tracing::info!(case = name, "starting");

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(&session)));

    let screenshot = screenshot::capture_best_effort(&session, &config.screenshot_dir, name);
    if let Err(e) = session.close() {
        tracing::warn!(case = name, error = %e, "session close failed");
    }

    match outcome {
        Ok(outcome) => {
            match &outcome {
                Ok(()) => tracing::info!(case = name, "passed"),
                Err(e) => tracing::error!(case = name, error = %e, "failed"),
            }
            CaseReport {
                name: name.to_string(),
                duration: start.elapsed(),
                screenshot,
                outcome,
            }
        }
        Err(panic) => panic::resume_unwind(panic),
    }
}
