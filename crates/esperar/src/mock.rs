//! Scripted in-memory browser session.
//!
//! Lets the whole suite run without Chromium: a page is modeled as a routed
//! URL→title table plus a set of element specs with live values and
//! optional click effects. Shared mutable page state sits behind a mutex so
//! element handles stay usable while the session navigates.

use crate::locator::Locator;
use crate::result::{EsperarError, EsperarResult};
use crate::session::{BrowserSession, ElementHandle};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// What happens when a scripted element is clicked
#[derive(Debug, Clone)]
pub struct ClickEffect {
    /// New URL after the click, if the click navigates
    pub url: Option<String>,
    /// New title after the click
    pub title: Option<String>,
}

impl ClickEffect {
    /// A click that navigates to a new URL and title
    #[must_use]
    pub fn navigate(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            title: Some(title.into()),
        }
    }
}

/// Spec for one scripted element
#[derive(Debug, Clone)]
pub struct MockElementSpec {
    matchers: Vec<Locator>,
    displayed: bool,
    enabled: bool,
    value: String,
    attributes: HashMap<String, String>,
    on_click: Option<ClickEffect>,
}

impl Default for MockElementSpec {
    fn default() -> Self {
        Self {
            matchers: Vec::new(),
            displayed: true,
            enabled: true,
            value: String::new(),
            attributes: HashMap::new(),
            on_click: None,
        }
    }
}

impl MockElementSpec {
    /// Create a spec with no matchers (displayed and enabled)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a locator this element answers to.
    ///
    /// An element may answer to several locators, the way a single submit
    /// button matches both a broad and a narrow XPath.
    #[must_use]
    pub fn matched_by(mut self, locator: Locator) -> Self {
        self.matchers.push(locator);
        self
    }

    /// Set visibility
    #[must_use]
    pub const fn displayed(mut self, displayed: bool) -> Self {
        self.displayed = displayed;
        self
    }

    /// Set interactability
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set a static attribute
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Attach a click effect
    #[must_use]
    pub fn on_click(mut self, effect: ClickEffect) -> Self {
        self.on_click = Some(effect);
        self
    }
}

#[derive(Debug)]
struct PageState {
    url: String,
    title: String,
    history: Vec<(String, String)>,
    routes: HashMap<String, String>,
    elements: Vec<MockElementSpec>,
    fail_screenshots: bool,
}

/// Builder for a scripted session
#[derive(Debug, Default)]
pub struct MockSessionBuilder {
    routes: HashMap<String, String>,
    elements: Vec<MockElementSpec>,
    fail_screenshots: bool,
}

impl MockSessionBuilder {
    /// Register a URL→title route; navigation to the URL picks up the title
    #[must_use]
    pub fn route(mut self, url: impl Into<String>, title: impl Into<String>) -> Self {
        self.routes.insert(url.into(), title.into());
        self
    }

    /// Register a scripted element
    #[must_use]
    pub fn element(mut self, spec: MockElementSpec) -> Self {
        self.elements.push(spec);
        self
    }

    /// Make screenshot capture fail (for teardown tests)
    #[must_use]
    pub const fn fail_screenshots(mut self) -> Self {
        self.fail_screenshots = true;
        self
    }

    /// Build the session
    #[must_use]
    pub fn build(self) -> MockSession {
        MockSession {
            state: Arc::new(Mutex::new(PageState {
                url: String::from("about:blank"),
                title: String::new(),
                history: Vec::new(),
                routes: self.routes,
                elements: self.elements,
                fail_screenshots: self.fail_screenshots,
            })),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }
}

/// In-memory [`BrowserSession`] for exercising suites without a browser
#[derive(Debug)]
pub struct MockSession {
    state: Arc<Mutex<PageState>>,
    closes: Arc<AtomicUsize>,
}

// Tiny but valid-looking PNG header; enough for persistence tests.
const PNG_STUB: &[u8] = b"\x89PNG\r\n\x1a\n";

fn lock(state: &Arc<Mutex<PageState>>) -> EsperarResult<MutexGuard<'_, PageState>> {
    state.lock().map_err(|_| EsperarError::SessionError {
        message: String::from("mock page state poisoned"),
    })
}

impl MockSession {
    /// Start building a scripted session
    #[must_use]
    pub fn builder() -> MockSessionBuilder {
        MockSessionBuilder::default()
    }

    /// Counter of completed `close` calls, shared with the caller.
    ///
    /// Clone before handing the session to a harness to verify the
    /// session is released exactly once.
    #[must_use]
    pub fn close_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closes)
    }
}

impl BrowserSession for MockSession {
    type Element = MockElement;

    fn navigate(&self, url: &str) -> EsperarResult<()> {
        let mut state = lock(&self.state)?;
        let previous = (state.url.clone(), state.title.clone());
        state.history.push(previous);
        state.url = url.to_string();
        if let Some(title) = state.routes.get(url) {
            state.title = title.clone();
        }
        Ok(())
    }

    fn current_url(&self) -> EsperarResult<String> {
        Ok(lock(&self.state)?.url.clone())
    }

    fn title(&self) -> EsperarResult<String> {
        Ok(lock(&self.state)?.title.clone())
    }

    fn find_element(&self, locator: &Locator) -> EsperarResult<MockElement> {
        let state = lock(&self.state)?;
        state
            .elements
            .iter()
            .position(|e| e.matchers.contains(locator))
            .map(|index| MockElement {
                state: Arc::clone(&self.state),
                index,
            })
            .ok_or_else(|| EsperarError::ElementNotFound {
                locator: locator.to_string(),
            })
    }

    fn find_elements(&self, locator: &Locator) -> EsperarResult<Vec<MockElement>> {
        let state = lock(&self.state)?;
        Ok(state
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.matchers.contains(locator))
            .map(|(index, _)| MockElement {
                state: Arc::clone(&self.state),
                index,
            })
            .collect())
    }

    fn navigate_back(&self) -> EsperarResult<()> {
        let mut state = lock(&self.state)?;
        let (url, title) = state
            .history
            .pop()
            .ok_or_else(|| EsperarError::SessionError {
                message: String::from("no history to navigate back to"),
            })?;
        state.url = url;
        state.title = title;
        Ok(())
    }

    fn screenshot(&self) -> EsperarResult<Vec<u8>> {
        let state = lock(&self.state)?;
        if state.fail_screenshots {
            return Err(EsperarError::ScreenshotError {
                message: String::from("capture disabled by test script"),
            });
        }
        Ok(PNG_STUB.to_vec())
    }

    fn close(self) -> EsperarResult<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Handle to a scripted element
#[derive(Debug)]
pub struct MockElement {
    state: Arc<Mutex<PageState>>,
    index: usize,
}

impl MockElement {
    fn read<T>(&self, f: impl FnOnce(&MockElementSpec) -> T) -> EsperarResult<T> {
        let state = lock(&self.state)?;
        state
            .elements
            .get(self.index)
            .map(f)
            .ok_or_else(|| EsperarError::SessionError {
                message: String::from("stale mock element handle"),
            })
    }

    fn write<T>(&self, f: impl FnOnce(&mut MockElementSpec) -> T) -> EsperarResult<T> {
        let mut state = lock(&self.state)?;
        state
            .elements
            .get_mut(self.index)
            .map(f)
            .ok_or_else(|| EsperarError::SessionError {
                message: String::from("stale mock element handle"),
            })
    }
}

impl ElementHandle for MockElement {
    fn is_displayed(&self) -> EsperarResult<bool> {
        self.read(|e| e.displayed)
    }

    fn is_enabled(&self) -> EsperarResult<bool> {
        self.read(|e| e.enabled)
    }

    fn attribute(&self, name: &str) -> EsperarResult<Option<String>> {
        self.read(|e| {
            if name == "value" {
                Some(e.value.clone())
            } else {
                e.attributes.get(name).cloned()
            }
        })
    }

    fn click(&self) -> EsperarResult<()> {
        let mut state = lock(&self.state)?;
        let (displayed, enabled, matcher, effect) = {
            let element =
                state
                    .elements
                    .get(self.index)
                    .ok_or_else(|| EsperarError::SessionError {
                        message: String::from("stale mock element handle"),
                    })?;
            (
                element.displayed,
                element.enabled,
                element.matchers.first().cloned(),
                element.on_click.clone(),
            )
        };

        if !displayed || !enabled {
            return Err(EsperarError::ElementNotInteractable {
                locator: matcher.map_or_else(|| String::from("<unmatched>"), |m| m.to_string()),
                message: String::from("element is hidden or disabled"),
            });
        }

        if let Some(effect) = effect {
            let previous = (state.url.clone(), state.title.clone());
            state.history.push(previous);
            if let Some(url) = effect.url {
                state.url = url;
            }
            if let Some(title) = effect.title {
                state.title = title;
            }
        }
        Ok(())
    }

    fn send_keys(&self, text: &str) -> EsperarResult<()> {
        self.write(|e| e.value.push_str(text))
    }

    fn clear(&self) -> EsperarResult<()> {
        self.write(|e| e.value.clear())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> MockSession {
        MockSession::builder()
            .route("https://example.com/", "Example")
            .route("https://example.com/next", "Next")
            .element(
                MockElementSpec::new()
                    .matched_by(Locator::name("login"))
                    .attribute("placeholder", "Phone or email"),
            )
            .element(
                MockElementSpec::new()
                    .matched_by(Locator::xpath("//a[@id='go']"))
                    .attribute("href", "https://example.com/next")
                    .on_click(ClickEffect::navigate("https://example.com/next", "Next")),
            )
            .build()
    }

    #[test]
    fn test_navigate_applies_route_title() {
        let session = page();
        session.navigate("https://example.com/").unwrap();
        assert_eq!(session.current_url().unwrap(), "https://example.com/");
        assert_eq!(session.title().unwrap(), "Example");
    }

    #[test]
    fn test_unrouted_navigation_keeps_title() {
        let session = page();
        session.navigate("https://example.com/").unwrap();
        session.navigate("https://example.com/unknown").unwrap();
        assert_eq!(session.title().unwrap(), "Example");
    }

    #[test]
    fn test_find_element_by_any_matcher() {
        let session = page();
        assert!(session.find_element(&Locator::name("login")).is_ok());
        assert!(matches!(
            session.find_element(&Locator::name("missing")),
            Err(EsperarError::ElementNotFound { .. })
        ));
    }

    #[test]
    fn test_find_elements_empty_when_no_match() {
        let session = page();
        let found = session.find_elements(&Locator::class_name("absent")).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_value_round_trip() {
        let session = page();
        let field = session.find_element(&Locator::name("login")).unwrap();
        field.send_keys("test@example.com").unwrap();
        assert_eq!(
            field.attribute("value").unwrap().as_deref(),
            Some("test@example.com")
        );
        field.clear().unwrap();
        assert_eq!(field.attribute("value").unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_static_attribute_lookup() {
        let session = page();
        let field = session.find_element(&Locator::name("login")).unwrap();
        assert_eq!(
            field.attribute("placeholder").unwrap().as_deref(),
            Some("Phone or email")
        );
        assert_eq!(field.attribute("href").unwrap(), None);
    }

    #[test]
    fn test_click_effect_navigates_and_back_restores() {
        let session = page();
        session.navigate("https://example.com/").unwrap();
        let link = session.find_element(&Locator::xpath("//a[@id='go']")).unwrap();
        link.click().unwrap();
        assert_eq!(session.current_url().unwrap(), "https://example.com/next");
        assert_eq!(session.title().unwrap(), "Next");

        session.navigate_back().unwrap();
        assert_eq!(session.current_url().unwrap(), "https://example.com/");
        assert_eq!(session.title().unwrap(), "Example");
    }

    #[test]
    fn test_back_without_history_errors() {
        let session = MockSession::builder().build();
        assert!(matches!(
            session.navigate_back(),
            Err(EsperarError::SessionError { .. })
        ));
    }

    #[test]
    fn test_disabled_element_rejects_click() {
        let session = MockSession::builder()
            .element(
                MockElementSpec::new()
                    .matched_by(Locator::name("frozen"))
                    .enabled(false),
            )
            .build();
        let element = session.find_element(&Locator::name("frozen")).unwrap();
        assert!(matches!(
            element.click(),
            Err(EsperarError::ElementNotInteractable { .. })
        ));
    }

    #[test]
    fn test_close_counts_once() {
        let session = page();
        let closes = session.close_counter();
        session.close().unwrap();
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_screenshot_stub_and_failure_injection() {
        let session = page();
        assert_eq!(session.screenshot().unwrap(), PNG_STUB.to_vec());

        let broken = MockSession::builder().fail_screenshots().build();
        assert!(matches!(
            broken.screenshot(),
            Err(EsperarError::ScreenshotError { .. })
        ));
    }
}
