//! Suite configuration.

use crate::wait::{WaitOptions, Waiter};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default page under test
pub const DEFAULT_BASE_URL: &str = "https://vk.com/";

/// Configuration for one suite run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// URL of the page under test
    pub base_url: String,
    /// Explicit-wait options shared by every case
    pub wait: WaitOptions,
    /// Directory for per-case screenshots
    pub screenshot_dir: PathBuf,
    /// Run the browser headless
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            wait: WaitOptions::default(),
            screenshot_dir: PathBuf::from("screenshots"),
            headless: true,
            viewport_width: 1920,
            viewport_height: 1080,
            chromium_path: None,
        }
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

impl SuiteConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from the environment, falling back to defaults.
    ///
    /// Recognized variables: `ESPERAR_BASE_URL`, `ESPERAR_TIMEOUT_MS`,
    /// `ESPERAR_POLL_INTERVAL_MS`, `ESPERAR_SCREENSHOT_DIR`,
    /// `ESPERAR_HEADLESS` (`0`/`false` to watch the browser),
    /// `CHROMIUM_PATH`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("ESPERAR_BASE_URL") {
            config.base_url = url;
        }
        if let Some(ms) = env_u64("ESPERAR_TIMEOUT_MS") {
            config.wait.timeout_ms = ms;
        }
        if let Some(ms) = env_u64("ESPERAR_POLL_INTERVAL_MS") {
            config.wait.poll_interval_ms = ms;
        }
        if let Ok(dir) = std::env::var("ESPERAR_SCREENSHOT_DIR") {
            config.screenshot_dir = PathBuf::from(dir);
        }
        if let Ok(v) = std::env::var("ESPERAR_HEADLESS") {
            config.headless = !matches!(v.as_str(), "0" | "false" | "no");
        }
        if let Ok(path) = std::env::var("CHROMIUM_PATH") {
            config.chromium_path = Some(path);
        }
        config
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the wait options
    #[must_use]
    pub fn with_wait(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Set the screenshot directory
    #[must_use]
    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set the chromium binary path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Build a waiter bound to this config's wait options
    #[must_use]
    pub fn waiter(&self) -> Waiter {
        Waiter::with_options(self.wait.clone())
    }
}
