//! Run the VK login acceptance suite against live Chromium.
//!
//! Requires the `browser` feature and a local Chromium install:
//!
//! ```bash
//! cargo run --example vk_login_suite --features browser
//! ```
//!
//! Deadlines, headless mode, and the screenshot directory come from the
//! environment (`ESPERAR_TIMEOUT_MS`, `ESPERAR_HEADLESS`,
//! `ESPERAR_SCREENSHOT_DIR`); see `SuiteConfig::from_env`.

use esperar::cdp::CdpSession;
use esperar::{init_logging, run_case, scenarios, EsperarResult, SuiteConfig};

type Case = (&'static str, fn(&CdpSession, &SuiteConfig) -> EsperarResult<()>);

const CASES: [Case; 6] = [
    ("page_title", scenarios::page_title),
    ("form_visibility", scenarios::form_visibility),
    ("auxiliary_links", scenarios::auxiliary_links),
    ("credential_fields", scenarios::credential_fields),
    ("submit_without_account", scenarios::submit_without_account),
    ("full_pass", scenarios::full_pass),
];

fn main() {
    init_logging();
    let config = SuiteConfig::from_env();

    let mut failures = 0_u32;
    for (name, case) in CASES {
        let session = match CdpSession::launch(&config) {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(case = name, error = %e, "failed to launch browser");
                failures += 1;
                continue;
            }
        };

        let report = run_case(name, &config, session, |s| case(s, &config));
        if !report.passed() {
            failures += 1;
        }
        tracing::info!(
            case = name,
            passed = report.passed(),
            duration_ms = report.duration.as_millis() as u64,
            "case finished"
        );
    }

    if failures > 0 {
        tracing::error!(failures, total = CASES.len(), "suite failed");
        std::process::exit(1);
    }
    tracing::info!(total = CASES.len(), "suite passed");
}
