//! Chromium-backed session via the Chrome `DevTools` Protocol.
//!
//! Wraps chromiumoxide behind the synchronous [`BrowserSession`] trait:
//! the session owns a tokio runtime and blocks on each protocol call, so
//! case bodies stay plain sequential code. Element operations re-resolve
//! their locator on every call by evaluating the JS queries generated in
//! [`crate::locator`], which keeps handles valid across page re-renders.

use crate::config::SuiteConfig;
use crate::locator::Locator;
use crate::result::{EsperarError, EsperarResult};
use crate::session::{BrowserSession, ElementHandle};

use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| String::from("\"\""))
}

/// A live Chromium session
#[derive(Debug)]
pub struct CdpSession {
    runtime: Runtime,
    browser: Arc<Mutex<CdpBrowser>>,
    page: Arc<Mutex<CdpPage>>,
    handler: JoinHandle<()>,
}

impl CdpSession {
    /// Launch Chromium and open a blank page.
    ///
    /// # Errors
    ///
    /// Returns error if the browser cannot be launched or no page opens
    pub fn launch(config: &SuiteConfig) -> EsperarResult<Self> {
        let runtime = Runtime::new()?;

        let (browser, page, handler) = runtime.block_on(async {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height);

            if !config.headless {
                builder = builder.with_head();
            }
            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|e| EsperarError::BrowserLaunchError {
                    message: e.to_string(),
                })?;

            let (browser, mut handler_stream) =
                CdpBrowser::launch(cdp_config)
                    .await
                    .map_err(|e| EsperarError::BrowserLaunchError {
                        message: e.to_string(),
                    })?;

            // Drive protocol events for the lifetime of the session.
            let handler = tokio::spawn(async move {
                while let Some(event) = handler_stream.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            let page =
                browser
                    .new_page("about:blank")
                    .await
                    .map_err(|e| EsperarError::SessionError {
                        message: e.to_string(),
                    })?;

            Ok::<_, EsperarError>((browser, page, handler))
        })?;

        Ok(Self {
            runtime,
            browser: Arc::new(Mutex::new(browser)),
            page: Arc::new(Mutex::new(page)),
            handler,
        })
    }

    fn eval<T: serde::de::DeserializeOwned>(&self, expr: String) -> EsperarResult<T> {
        self.runtime.block_on(eval_on(&self.page, expr))
    }

    fn element_for(&self, locator: &Locator, index: usize) -> CdpElement {
        CdpElement {
            handle: self.runtime.handle().clone(),
            page: Arc::clone(&self.page),
            locator: locator.clone(),
            index,
        }
    }
}

async fn eval_on<T: serde::de::DeserializeOwned>(
    page: &Arc<Mutex<CdpPage>>,
    expr: String,
) -> EsperarResult<T> {
    let page = page.lock().await;
    let result = page
        .evaluate(expr)
        .await
        .map_err(|e| EsperarError::SessionError {
            message: e.to_string(),
        })?;
    result.into_value().map_err(|e| EsperarError::SessionError {
        message: e.to_string(),
    })
}

impl BrowserSession for CdpSession {
    type Element = CdpElement;

    fn navigate(&self, url: &str) -> EsperarResult<()> {
        self.runtime.block_on(async {
            let page = self.page.lock().await;
            page.goto(url)
                .await
                .map_err(|e| EsperarError::NavigationError {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        })
    }

    fn current_url(&self) -> EsperarResult<String> {
        self.runtime.block_on(async {
            let page = self.page.lock().await;
            let url = page.url().await.map_err(|e| EsperarError::SessionError {
                message: e.to_string(),
            })?;
            Ok(url.unwrap_or_else(|| String::from("about:blank")))
        })
    }

    fn title(&self) -> EsperarResult<String> {
        self.runtime.block_on(async {
            let page = self.page.lock().await;
            let title = page
                .get_title()
                .await
                .map_err(|e| EsperarError::SessionError {
                    message: e.to_string(),
                })?;
            Ok(title.unwrap_or_default())
        })
    }

    fn find_element(&self, locator: &Locator) -> EsperarResult<CdpElement> {
        let exists: bool = self.eval(format!("!!({})", locator.to_query()))?;
        if exists {
            Ok(self.element_for(locator, 0))
        } else {
            Err(EsperarError::ElementNotFound {
                locator: locator.to_string(),
            })
        }
    }

    fn find_elements(&self, locator: &Locator) -> EsperarResult<Vec<CdpElement>> {
        let count: u64 = self.eval(locator.to_count_query())?;
        Ok((0..count as usize)
            .map(|index| self.element_for(locator, index))
            .collect())
    }

    fn navigate_back(&self) -> EsperarResult<()> {
        let _: bool = self.eval(String::from("(() => { history.back(); return true; })()"))?;
        Ok(())
    }

    fn screenshot(&self) -> EsperarResult<Vec<u8>> {
        self.runtime.block_on(async {
            let page = self.page.lock().await;
            let params = CaptureScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .build();
            let screenshot =
                page.execute(params)
                    .await
                    .map_err(|e| EsperarError::ScreenshotError {
                        message: e.to_string(),
                    })?;

            use base64::Engine;
            base64::engine::general_purpose::STANDARD
                .decode(&screenshot.data)
                .map_err(|e| EsperarError::ScreenshotError {
                    message: e.to_string(),
                })
        })
    }

    fn close(self) -> EsperarResult<()> {
        let result = self.runtime.block_on(async {
            let mut browser = self.browser.lock().await;
            browser
                .close()
                .await
                .map_err(|e| EsperarError::SessionError {
                    message: e.to_string(),
                })?;
            Ok(())
        });
        self.handler.abort();
        result
    }
}

/// Handle to a live element, addressed by locator and match index
#[derive(Debug)]
pub struct CdpElement {
    handle: tokio::runtime::Handle,
    page: Arc<Mutex<CdpPage>>,
    locator: Locator,
    index: usize,
}

impl CdpElement {
    fn query(&self) -> String {
        self.locator.to_nth_query(self.index)
    }

    fn eval<T: serde::de::DeserializeOwned>(&self, expr: String) -> EsperarResult<T> {
        self.handle.block_on(eval_on(&self.page, expr))
    }

    fn not_found(&self) -> EsperarError {
        EsperarError::ElementNotFound {
            locator: self.locator.to_string(),
        }
    }
}

impl ElementHandle for CdpElement {
    fn is_displayed(&self) -> EsperarResult<bool> {
        self.eval(format!(
            "(() => {{ const el = {}; return !!(el && el.getClientRects().length > 0); }})()",
            self.query()
        ))
    }

    fn is_enabled(&self) -> EsperarResult<bool> {
        self.eval(format!(
            "(() => {{ const el = {}; return !!(el && !el.disabled); }})()",
            self.query()
        ))
    }

    fn attribute(&self, name: &str) -> EsperarResult<Option<String>> {
        self.eval(format!(
            "(() => {{ const el = {}; if (!el) return null; const n = {}; if (n === 'value' && 'value' in el) return el.value; return el.getAttribute(n); }})()",
            self.query(),
            js_string(name)
        ))
    }

    fn click(&self) -> EsperarResult<()> {
        let clicked: bool = self.eval(format!(
            "(() => {{ const el = {}; if (!el) return false; el.click(); return true; }})()",
            self.query()
        ))?;
        if clicked {
            Ok(())
        } else {
            Err(self.not_found())
        }
    }

    fn send_keys(&self, text: &str) -> EsperarResult<()> {
        let typed: bool = self.eval(format!(
            "(() => {{ const el = {}; if (!el) return false; el.value = (el.value || '') + {}; el.dispatchEvent(new Event('input', {{ bubbles: true }})); el.dispatchEvent(new Event('change', {{ bubbles: true }})); return true; }})()",
            self.query(),
            js_string(text)
        ))?;
        if typed {
            Ok(())
        } else {
            Err(self.not_found())
        }
    }

    fn clear(&self) -> EsperarResult<()> {
        let cleared: bool = self.eval(format!(
            "(() => {{ const el = {}; if (!el) return false; el.value = ''; el.dispatchEvent(new Event('input', {{ bubbles: true }})); return true; }})()",
            self.query()
        ))?;
        if cleared {
            Ok(())
        } else {
            Err(self.not_found())
        }
    }
}
