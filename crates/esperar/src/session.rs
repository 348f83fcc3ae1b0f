//! Browser session and element handle seams.
//!
//! A session is always passed explicitly (constructed by the harness on
//! setup, released on teardown), never held as ambient global state. The
//! trait covers exactly the surface the acceptance cases consume; backends
//! are `mock::MockSession` (always available) and `cdp::CdpSession`
//! (feature `browser`).

use crate::locator::Locator;
use crate::result::EsperarResult;

/// One running automated browser instance and its navigation/query API.
pub trait BrowserSession {
    /// Handle type for elements located in this session
    type Element: ElementHandle;

    /// Navigate to a URL
    ///
    /// # Errors
    ///
    /// Returns error if navigation fails
    fn navigate(&self, url: &str) -> EsperarResult<()>;

    /// Get the current document URL
    ///
    /// # Errors
    ///
    /// Returns error if the session is unusable
    fn current_url(&self) -> EsperarResult<String>;

    /// Get the current document title
    ///
    /// # Errors
    ///
    /// Returns error if the session is unusable
    fn title(&self) -> EsperarResult<String>;

    /// Find the first element matching a locator
    ///
    /// # Errors
    ///
    /// Returns [`crate::EsperarError::ElementNotFound`] if nothing matches
    fn find_element(&self, locator: &Locator) -> EsperarResult<Self::Element>;

    /// Find all elements matching a locator (empty if none)
    ///
    /// # Errors
    ///
    /// Returns error if the session is unusable
    fn find_elements(&self, locator: &Locator) -> EsperarResult<Vec<Self::Element>>;

    /// Navigate one step back in session history
    ///
    /// # Errors
    ///
    /// Returns error if there is no history to go back to
    fn navigate_back(&self) -> EsperarResult<()>;

    /// Capture a PNG screenshot of the current page
    ///
    /// # Errors
    ///
    /// Returns error if the capture fails
    fn screenshot(&self) -> EsperarResult<Vec<u8>>;

    /// Close the session, releasing the browser.
    ///
    /// Consumes the session: a closed handle cannot be used again and a
    /// double-close does not typecheck.
    ///
    /// # Errors
    ///
    /// Returns error if shutdown fails; the session is gone either way
    fn close(self) -> EsperarResult<()>;
}

/// An opaque reference to a located page element.
pub trait ElementHandle {
    /// Whether the element is rendered and visible
    ///
    /// # Errors
    ///
    /// Returns error if the element went away
    fn is_displayed(&self) -> EsperarResult<bool>;

    /// Whether the element accepts interaction
    ///
    /// # Errors
    ///
    /// Returns error if the element went away
    fn is_enabled(&self) -> EsperarResult<bool>;

    /// Read an attribute; `value` reads the live DOM property so typed
    /// text is observable, matching WebDriver semantics.
    ///
    /// # Errors
    ///
    /// Returns error if the element went away
    fn attribute(&self, name: &str) -> EsperarResult<Option<String>>;

    /// Click the element
    ///
    /// # Errors
    ///
    /// Returns error if the element is gone or not interactable
    fn click(&self) -> EsperarResult<()>;

    /// Type text into the element, appending to its current value
    ///
    /// # Errors
    ///
    /// Returns error if the element is gone or not interactable
    fn send_keys(&self, text: &str) -> EsperarResult<()>;

    /// Clear the element's value
    ///
    /// # Errors
    ///
    /// Returns error if the element is gone or not interactable
    fn clear(&self) -> EsperarResult<()>;
}
