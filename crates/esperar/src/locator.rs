//! Locator abstraction for element selection.
//!
//! A locator is a strategy + value pair. Keeping the strategy as a tagged
//! variant (instead of an opaque selector string) makes misuse a
//! construction-time concern and lets each backend translate the pair into
//! whatever query language it speaks.

use serde::{Deserialize, Serialize};

/// A strategy + value pair identifying a page element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locator {
    /// Match by the `name` attribute (e.g. `name="login"`)
    Name(String),
    /// Match by CSS class name
    ClassName(String),
    /// Match by XPath expression
    XPath(String),
}

/// Quote a string for safe embedding in a JavaScript expression.
fn js_string(value: &str) -> String {
    // serde_json string encoding is valid JS source for any input,
    // including quotes inside XPath expressions.
    serde_json::to_string(value).unwrap_or_else(|_| String::from("\"\""))
}

impl Locator {
    /// Create a by-name locator
    #[must_use]
    pub fn name(value: impl Into<String>) -> Self {
        Self::Name(value.into())
    }

    /// Create a by-class-name locator
    #[must_use]
    pub fn class_name(value: impl Into<String>) -> Self {
        Self::ClassName(value.into())
    }

    /// Create a by-XPath locator
    #[must_use]
    pub fn xpath(value: impl Into<String>) -> Self {
        Self::XPath(value.into())
    }

    /// Get the strategy name for diagnostics
    #[must_use]
    pub const fn strategy(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::ClassName(_) => "class name",
            Self::XPath(_) => "xpath",
        }
    }

    /// Get the raw locator value
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Name(v) | Self::ClassName(v) | Self::XPath(v) => v,
        }
    }

    /// Convert to a JavaScript expression yielding the first match or `null`
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Name(v) => {
                format!("(document.getElementsByName({})[0] || null)", js_string(v))
            }
            Self::ClassName(v) => format!(
                "(document.getElementsByClassName({})[0] || null)",
                js_string(v)
            ),
            Self::XPath(v) => format!(
                "document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
                js_string(v)
            ),
        }
    }

    /// Convert to a JavaScript expression yielding an array of all matches
    #[must_use]
    pub fn to_query_all(&self) -> String {
        match self {
            Self::Name(v) => format!("Array.from(document.getElementsByName({}))", js_string(v)),
            Self::ClassName(v) => format!(
                "Array.from(document.getElementsByClassName({}))",
                js_string(v)
            ),
            Self::XPath(v) => format!(
                "(() => {{ const r = document.evaluate({}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); const out = []; for (let i = 0; i < r.snapshotLength; i++) {{ out.push(r.snapshotItem(i)); }} return out; }})()",
                js_string(v)
            ),
        }
    }

    /// Convert to a JavaScript expression counting all matches
    #[must_use]
    pub fn to_count_query(&self) -> String {
        match self {
            Self::Name(v) => format!("document.getElementsByName({}).length", js_string(v)),
            Self::ClassName(v) => {
                format!("document.getElementsByClassName({}).length", js_string(v))
            }
            Self::XPath(v) => format!(
                "document.evaluate({}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null).snapshotLength",
                js_string(v)
            ),
        }
    }

    /// Convert to a JavaScript expression yielding the n-th match or `null`
    #[must_use]
    pub fn to_nth_query(&self, index: usize) -> String {
        format!("({}[{index}] || null)", self.to_query_all())
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod construction_tests {
        use super::*;

        #[test]
        fn test_name_locator() {
            let locator = Locator::name("login");
            assert_eq!(locator.strategy(), "name");
            assert_eq!(locator.value(), "login");
        }

        #[test]
        fn test_class_name_locator() {
            let locator = Locator::class_name("VkIdForm__header");
            assert_eq!(locator.strategy(), "class name");
            assert_eq!(locator.value(), "VkIdForm__header");
        }

        #[test]
        fn test_xpath_locator() {
            let locator = Locator::xpath("//button[@type='submit']");
            assert_eq!(locator.strategy(), "xpath");
            assert_eq!(locator.value(), "//button[@type='submit']");
        }

        #[test]
        fn test_display() {
            assert_eq!(Locator::name("login").to_string(), "name=login");
            assert_eq!(
                Locator::xpath("//a").to_string(),
                "xpath=//a"
            );
        }
    }

    mod query_tests {
        use super::*;

        #[test]
        fn test_name_query() {
            let query = Locator::name("password").to_query();
            assert!(query.contains("getElementsByName"));
            assert!(query.contains("\"password\""));
            assert!(query.contains("|| null"));
        }

        #[test]
        fn test_class_name_query() {
            let query = Locator::class_name("FlatButton").to_query();
            assert!(query.contains("getElementsByClassName"));
            assert!(query.contains("\"FlatButton\""));
        }

        #[test]
        fn test_xpath_query() {
            let query = Locator::xpath("//button").to_query();
            assert!(query.contains("document.evaluate"));
            assert!(query.contains("FIRST_ORDERED_NODE_TYPE"));
            assert!(query.contains("singleNodeValue"));
        }

        #[test]
        fn test_xpath_query_all() {
            let query = Locator::xpath("//a").to_query_all();
            assert!(query.contains("ORDERED_NODE_SNAPSHOT_TYPE"));
            assert!(query.contains("snapshotItem"));
        }

        #[test]
        fn test_count_query() {
            let query = Locator::name("login").to_count_query();
            assert!(query.ends_with(".length"));

            let query = Locator::xpath("//button").to_count_query();
            assert!(query.contains("snapshotLength"));
        }

        #[test]
        fn test_nth_query() {
            let query = Locator::class_name("item").to_nth_query(2);
            assert!(query.contains("[2]"));
            assert!(query.contains("|| null"));
        }

        #[test]
        fn test_quotes_are_escaped() {
            // The submit-button XPath carries single quotes; an XPath with a
            // double quote must not break out of the generated expression.
            let query = Locator::xpath(r#"//*[contains(text(), "error")]"#).to_query();
            assert!(query.contains(r#"\"error\""#));
        }
    }
}
