use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::browser::driver::PageDriver;
use crate::error::Result;

/// A single element-selection strategy understood by browser_server.js.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Locator {
    /// Plain CSS selector
    Css { selector: String },

    /// Visible text match
    Text { text: String, exact: bool },

    /// `data-testid` attribute match
    TestId { id: String },

    /// CSS selector narrowed to elements containing the given text
    HasText { selector: String, text: String },
}

impl Locator {
    pub fn css(selector: &str) -> Self {
        Locator::Css {
            selector: selector.to_string(),
        }
    }

    pub fn exact_text(text: &str) -> Self {
        Locator::Text {
            text: text.to_string(),
            exact: true,
        }
    }

    pub fn test_id(id: &str) -> Self {
        Locator::TestId { id: id.to_string() }
    }

    pub fn has_text(selector: &str, text: &str) -> Self {
        Locator::HasText {
            selector: selector.to_string(),
            text: text.to_string(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css { selector } => write!(f, "{}", selector),
            Locator::Text { text, exact: true } => write!(f, "text=\"{}\"", text),
            Locator::Text { text, exact: false } => write!(f, "text={}", text),
            Locator::TestId { id } => write!(f, "[data-testid=\"{}\"]", id),
            Locator::HasText { selector, text } => write!(f, "{}:has-text(\"{}\")", selector, text),
        }
    }
}

/// Ordered list of strategies; the first one that matches anything wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorChain {
    strategies: Vec<Locator>,
}

impl LocatorChain {
    pub fn new(strategies: Vec<Locator>) -> Self {
        Self { strategies }
    }

    /// Click targets: exact text, test id, then buttons and links containing the label.
    pub fn clickable(label: &str) -> Self {
        Self::new(vec![
            Locator::exact_text(label),
            Locator::test_id(label),
            Locator::has_text("button", label),
            Locator::has_text("a", label),
        ])
    }

    /// Email-like inputs, by type, name, id and placeholder.
    pub fn email_input() -> Self {
        Self::new(vec![
            Locator::css("input[type=\"email\"]"),
            Locator::css("input[name*=\"email\" i]"),
            Locator::css("input[id*=\"email\" i]"),
            Locator::css("input[placeholder*=\"email\" i]"),
        ])
    }

    pub fn password_input() -> Self {
        Self::new(vec![Locator::css("input[type=\"password\"]")])
    }

    pub fn submit_control() -> Self {
        Self::new(vec![
            Locator::css("button[type=\"submit\"]"),
            Locator::css("input[type=\"submit\"]"),
            Locator::has_text("button", "Login"),
            Locator::has_text("button", "Sign in"),
        ])
    }

    pub fn strategies(&self) -> &[Locator] {
        &self.strategies
    }

    /// Return the first strategy with at least one match on the current page.
    pub fn resolve(&self, driver: &mut dyn PageDriver) -> Result<Option<Locator>> {
        for locator in &self.strategies {
            let count = driver.count(locator)?;
            debug!(%locator, count, "locator probe");
            if count > 0 {
                return Ok(Some(locator.clone()));
            }
        }
        Ok(None)
    }
}
