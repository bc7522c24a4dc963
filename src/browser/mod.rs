// src/browser/mod.rs
//! The seam between the crawl engine and a real browser.
//!
//! The engine only ever talks to [`Session`] and [`Launcher`]; `chrome` drives
//! Chrome over CDP, and tests plug in a scripted fake.
pub mod chrome;
pub mod profile;

use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::error::BrowserError;

/// Where to find an element. XPath is needed for text/label matches CSS cannot express.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Locator {
    Css(String),
    XPath(String),
}

impl Locator {
    pub fn css(sel: impl Into<String>) -> Self { Locator::Css(sel.into()) }
    pub fn xpath(sel: impl Into<String>) -> Self { Locator::XPath(sel.into()) }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css `{s}`"),
            Locator::XPath(s) => write!(f, "xpath `{s}`"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickMode {
    /// Scroll into view, then a real mouse click.
    Native,
    /// `element.click()` from script; survives overlays that swallow mouse events.
    Script,
}

/// One live browser tab.
///
/// Waits are bounded: a locator that does not show up within `timeout` yields
/// [`BrowserError::Timeout`], which callers treat as "not there".
pub trait Session {
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Scroll the window by `dy` pixels.
    fn scroll_window(&mut self, dy: i64) -> Result<(), BrowserError>;

    fn wait_for(&mut self, locator: &Locator, timeout: Duration) -> Result<(), BrowserError>;

    /// Wait for `locator`, bring it into view and click it.
    fn click(&mut self, locator: &Locator, mode: ClickMode, timeout: Duration) -> Result<(), BrowserError>;

    /// Scroll a scrollable element to its bottom.
    fn scroll_to_end(&mut self, container: &Locator) -> Result<(), BrowserError>;

    /// Scroll a scrollable element by `dy` pixels.
    fn scroll_by(&mut self, container: &Locator, dy: i64) -> Result<(), BrowserError>;

    /// Serialized DOM as currently rendered.
    fn page_source(&mut self) -> Result<String, BrowserError>;

    fn quit(&mut self);
}

/// Starts sessions bound to a profile directory.
pub trait Launcher {
    fn launch(&mut self, profile: &Path) -> Result<Box<dyn Session>, BrowserError>;
}
