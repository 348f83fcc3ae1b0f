//! Esperar - browser acceptance testing with explicit waits
//!
//! A small harness for writing UI acceptance suites against a live page.
//! The core is a condition poller: probe browser state repeatedly,
//! suppress transient lookup failures, and settle on exactly one outcome
//! per wait. Around it sit a locator model, a session abstraction with a
//! Chromium backend, per-case screenshot teardown, and a scripted mock
//! browser for testing the harness itself.
//!
//! # Quick Start
//!
//! ```rust
//! use esperar::{BrowserSession, MockSession, WaitOptions, Waiter};
//!
//! let session = MockSession::builder().build();
//! session.navigate("https://example.com/")?;
//!
//! let waiter = Waiter::with_options(WaitOptions::new().with_timeout(1_000));
//! let url = waiter.poll(|| Ok(Some(session.current_url()?)))?;
//! assert_eq!(url, "https://example.com/");
//! # Ok::<(), esperar::EsperarError>(())
//! ```
//!
//! Driving a real Chromium requires the `browser` feature and a local
//! Chromium install; see [`cdp::CdpSession`] and the `vk_login_suite`
//! example.

pub mod assertion;
pub mod config;
pub mod harness;
pub mod locator;
pub mod mock;
pub mod result;
pub mod scenarios;
pub mod screenshot;
pub mod session;
pub mod wait;

#[cfg(feature = "browser")]
pub mod cdp;

pub use assertion::{ensure, ensure_contains, ensure_eq};
pub use config::{SuiteConfig, DEFAULT_BASE_URL};
pub use harness::{init_logging, run_case, CaseReport};
pub use locator::Locator;
pub use mock::{ClickEffect, MockElementSpec, MockSession, MockSessionBuilder};
pub use result::{EsperarError, EsperarResult};
pub use screenshot::{capture, capture_best_effort, screenshot_file_name};
pub use session::{BrowserSession, ElementHandle};
pub use wait::{
    wait_until, UrlPattern, WaitOptions, Waiter, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_WAIT_TIMEOUT_MS,
};

#[cfg(feature = "browser")]
pub use cdp::{CdpElement, CdpSession};
