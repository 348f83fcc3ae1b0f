//! Result and error types for Esperar.

use thiserror::Error;

/// Result type for Esperar operations
pub type EsperarResult<T> = Result<T, EsperarError>;

/// Errors that can occur while driving a browser session
#[derive(Debug, Error)]
pub enum EsperarError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set CHROMIUM_PATH")]
    BrowserNotFound,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunchError {
        /// Error message
        message: String,
    },

    /// No element matched the locator
    #[error("No element matching {locator}")]
    ElementNotFound {
        /// Locator that failed, e.g. `name=login`
        locator: String,
    },

    /// Element exists but cannot be interacted with
    #[error("Element {locator} is not interactable: {message}")]
    ElementNotInteractable {
        /// Locator of the element
        locator: String,
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// A wait deadline elapsed before its condition became true
    #[error("Operation timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    ScreenshotError {
        /// Error message
        message: String,
    },

    /// Unexpected session error (crashed browser, broken pipe, ...)
    #[error("Browser session error: {message}")]
    SessionError {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EsperarError {
    /// Whether a polling wait may swallow this error and probe again.
    ///
    /// Element lookups race against page rendering, so "not found" and
    /// "not interactable" are expected to resolve themselves within the
    /// wait deadline. Anything else surfaces immediately.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. } | Self::ElementNotInteractable { .. }
        )
    }

    /// Whether this error is a wait deadline expiry.
    ///
    /// Callers use this to treat "no visible change" as a soft outcome
    /// instead of a hard failure.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
