//! Explicit waits: the condition poller.
//!
//! A wait is a bounded polling loop over a predicate, as opposed to a
//! single unconditional state read. The poller evaluates the predicate
//! against live browser state, suppresses transient lookup failures while
//! the deadline has not passed, and produces exactly one outcome per call:
//! the predicate's value, a distinguishable [`EsperarError::Timeout`], or
//! the first non-retryable error.

use crate::locator::Locator;
use crate::result::{EsperarError, EsperarResult};
use crate::session::{BrowserSession, ElementHandle};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Default total wait deadline (20 seconds, the suite's explicit wait)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 20_000;

/// Default polling interval (500ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitOptions {
    /// Total deadline in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total deadline in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get the deadline as a Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get the poll interval as a Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// URL PATTERNS
// =============================================================================

/// Pattern for matching the current URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlPattern {
    /// Exact string match
    Exact(String),
    /// Substring match
    Contains(String),
    /// Prefix match
    Prefix(String),
}

impl UrlPattern {
    /// Check whether a URL matches this pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Self::Exact(expected) => url == expected,
            Self::Contains(needle) => url.contains(needle),
            Self::Prefix(prefix) => url.starts_with(prefix),
        }
    }
}

// =============================================================================
// WAITER
// =============================================================================

/// Condition poller bound to a set of wait options.
///
/// Created once per case (from [`crate::SuiteConfig::waiter`]) and treated
/// as read-only afterwards. The calling thread blocks inside each wait;
/// the only suspension point is the sleep between probe attempts.
#[derive(Debug, Clone, Default)]
pub struct Waiter {
    options: WaitOptions,
}

impl Waiter {
    /// Create a waiter with default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a waiter with custom options
    #[must_use]
    pub const fn with_options(options: WaitOptions) -> Self {
        Self { options }
    }

    /// Get the wait options
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Poll a probe until it yields a value or the deadline passes.
    ///
    /// The probe returns `Ok(Some(value))` when the condition is
    /// satisfied, `Ok(None)` when it is not yet satisfied, or an error.
    /// Transient errors (per [`EsperarError::is_transient`]) are
    /// suppressed and retried; anything else propagates immediately.
    ///
    /// # Errors
    ///
    /// Returns [`EsperarError::Timeout`] if the deadline passes, or the
    /// probe's first non-retryable error.
    pub fn poll<T, F>(&self, probe: F) -> EsperarResult<T>
    where
        F: FnMut() -> EsperarResult<Option<T>>,
    {
        self.poll_with(probe, EsperarError::is_transient)
    }

    /// Poll with an explicit retryable-error predicate.
    ///
    /// The probe always runs at least once, even with a zero deadline.
    /// On expiry the timeout is raised no earlier than the deadline and
    /// no later than one poll interval past it.
    ///
    /// # Errors
    ///
    /// Returns [`EsperarError::Timeout`] if the deadline passes, or the
    /// probe's first error that `retryable` rejects.
    pub fn poll_with<T, F, R>(&self, mut probe: F, retryable: R) -> EsperarResult<T>
    where
        F: FnMut() -> EsperarResult<Option<T>>,
        R: Fn(&EsperarError) -> bool,
    {
        let timeout = self.options.timeout();
        let interval = self.options.poll_interval();
        let start = Instant::now();

        loop {
            match probe() {
                Ok(Some(value)) => return Ok(value),
                Ok(None) => {}
                Err(e) if retryable(&e) => {
                    tracing::trace!(error = %e, "suppressed transient error while polling");
                }
                Err(e) => return Err(e),
            }

            if start.elapsed() >= timeout {
                return Err(EsperarError::Timeout {
                    ms: self.options.timeout_ms,
                });
            }
            std::thread::sleep(interval);
        }
    }

    /// Wait until a boolean predicate holds
    ///
    /// # Errors
    ///
    /// Returns [`EsperarError::Timeout`] if the deadline passes first
    pub fn until<F>(&self, mut predicate: F) -> EsperarResult<()>
    where
        F: FnMut() -> bool,
    {
        self.poll(|| Ok(predicate().then_some(())))
    }

    /// Wait for an element to be present
    ///
    /// # Errors
    ///
    /// Returns [`EsperarError::Timeout`] if nothing matches in time
    pub fn element<S: BrowserSession>(
        &self,
        session: &S,
        locator: &Locator,
    ) -> EsperarResult<S::Element> {
        self.poll(|| session.find_element(locator).map(Some))
    }

    /// Wait for an element to be present and displayed
    ///
    /// # Errors
    ///
    /// Returns [`EsperarError::Timeout`] if no visible match appears in time
    pub fn displayed<S: BrowserSession>(
        &self,
        session: &S,
        locator: &Locator,
    ) -> EsperarResult<S::Element> {
        self.poll(|| {
            let element = session.find_element(locator)?;
            Ok(element.is_displayed()?.then_some(element))
        })
    }

    /// Wait until the current URL matches a pattern; returns the URL
    ///
    /// # Errors
    ///
    /// Returns [`EsperarError::Timeout`] if the URL never matches in time
    pub fn url_matches<S: BrowserSession>(
        &self,
        session: &S,
        pattern: &UrlPattern,
    ) -> EsperarResult<String> {
        self.poll(|| {
            let url = session.current_url()?;
            Ok(pattern.matches(&url).then_some(url))
        })
    }

    /// Wait until the document title contains a marker; returns the title
    ///
    /// # Errors
    ///
    /// Returns [`EsperarError::Timeout`] if the title never matches in time
    pub fn title_contains<S: BrowserSession>(
        &self,
        session: &S,
        needle: &str,
    ) -> EsperarResult<String> {
        self.poll(|| {
            let title = session.title()?;
            Ok(title.contains(needle).then_some(title))
        })
    }
}

/// Wait for a condition with a bare timeout (default poll interval)
///
/// # Errors
///
/// Returns [`EsperarError::Timeout`] if the deadline passes first
pub fn wait_until<F>(predicate: F, timeout_ms: u64) -> EsperarResult<()>
where
    F: FnMut() -> bool,
{
    let waiter = Waiter::with_options(WaitOptions::new().with_timeout(timeout_ms));
    waiter.until(predicate)
}
