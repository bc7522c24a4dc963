// src/browser/chrome.rs
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::{Browser, Element, LaunchOptions, Tab};

use super::{ClickMode, Launcher, Locator, Session};
use crate::config::consts::{BROWSER_IDLE_TIMEOUT_SECS, WINDOW_SIZE};
use crate::error::BrowserError;

/// Launches desktop Chrome with a persistent profile directory.
pub struct ChromeLauncher {
    pub headless: bool,
    pub user_agent: String,
}

impl ChromeLauncher {
    pub fn new(headless: bool, user_agent: impl Into<String>) -> Self {
        Self { headless, user_agent: user_agent.into() }
    }
}

impl Launcher for ChromeLauncher {
    fn launch(&mut self, profile: &Path) -> Result<Box<dyn Session>, BrowserError> {
        let ua = format!("--user-agent={}", self.user_agent);
        let args: Vec<&OsStr> = vec![
            OsStr::new(&ua),
            OsStr::new("--disable-blink-features=AutomationControlled"),
            OsStr::new("--lang=en-US"),
        ];

        let browser = Browser::new(LaunchOptions {
            headless: self.headless,
            window_size: Some(WINDOW_SIZE),
            user_data_dir: Some(profile.to_path_buf()),
            idle_browser_timeout: Duration::from_secs(BROWSER_IDLE_TIMEOUT_SECS),
            args,
            ..Default::default()
        })
        .map_err(|e| BrowserError::Launch(format!("{e:#}")))?;

        let tab = browser.new_tab().map_err(|e| BrowserError::Launch(format!("{e:#}")))?;
        logd!("chrome: launched with profile {}", profile.display());

        Ok(Box::new(ChromeSession { browser: Some(browser), tab }))
    }
}

pub struct ChromeSession {
    browser: Option<Browser>,
    tab: Arc<Tab>,
}

impl ChromeSession {
    fn find(&self, locator: &Locator, timeout: Duration) -> Result<Element<'_>, BrowserError> {
        let found = match locator {
            Locator::Css(sel) => self.tab.wait_for_element_with_custom_timeout(sel, timeout),
            Locator::XPath(sel) => self.tab.wait_for_xpath_with_custom_timeout(sel, timeout),
        };
        found.map_err(|e| classify_wait(e, locator, timeout))
    }

    fn eval(&self, js: &str) -> Result<(), BrowserError> {
        self.tab.evaluate(js, false).map(|_| ()).map_err(classify)
    }
}

/// Generous enough for a container that is already on screen.
const SHORT_WAIT: Duration = Duration::from_secs(5);

impl Session for ChromeSession {
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.tab
            .navigate_to(url)
            .and_then(|t| t.wait_until_navigated())
            .map(|_| ())
            .map_err(classify)
    }

    fn scroll_window(&mut self, dy: i64) -> Result<(), BrowserError> {
        self.eval(&format!("window.scrollBy(0, {dy});"))
    }

    fn wait_for(&mut self, locator: &Locator, timeout: Duration) -> Result<(), BrowserError> {
        self.find(locator, timeout).map(|_| ())
    }

    fn click(&mut self, locator: &Locator, mode: ClickMode, timeout: Duration) -> Result<(), BrowserError> {
        let el = self.find(locator, timeout)?;
        el.scroll_into_view().map_err(classify)?;
        match mode {
            ClickMode::Native => el.click().map(|_| ()).map_err(classify),
            ClickMode::Script => el
                .call_js_fn("function() { this.click(); }", vec![], false)
                .map(|_| ())
                .map_err(classify),
        }
    }

    fn scroll_to_end(&mut self, container: &Locator) -> Result<(), BrowserError> {
        let el = self.find(container, SHORT_WAIT)?;
        el.call_js_fn("function() { this.scrollTop = this.scrollHeight; }", vec![], false)
            .map(|_| ())
            .map_err(classify)
    }

    fn scroll_by(&mut self, container: &Locator, dy: i64) -> Result<(), BrowserError> {
        let el = self.find(container, SHORT_WAIT)?;
        let js = format!("function() {{ this.scrollTop += {dy}; }}");
        el.call_js_fn(&js, vec![], false).map(|_| ()).map_err(classify)
    }

    fn page_source(&mut self) -> Result<String, BrowserError> {
        self.tab.get_content().map_err(classify)
    }

    fn quit(&mut self) {
        // Dropping the handle kills the Chrome process.
        if self.browser.take().is_some() {
            logd!("chrome: session closed");
        }
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.quit();
    }
}

/// `headless_chrome` reports everything as `anyhow::Error`; sort by message.
fn classify(e: anyhow::Error) -> BrowserError {
    let msg = format!("{e:#}");
    let lower = msg.to_lowercase();
    if SESSION_GONE.iter().any(|k| lower.contains(k)) {
        BrowserError::SessionLost(msg)
    } else {
        BrowserError::Script(msg)
    }
}

fn classify_wait(e: anyhow::Error, locator: &Locator, timeout: Duration) -> BrowserError {
    match classify(e) {
        BrowserError::Script(msg) if is_timeout(&msg) => BrowserError::Timeout {
            locator: locator.to_string(),
            waited: timeout,
        },
        other => other,
    }
}

fn is_timeout(msg: &str) -> bool {
    let lower = msg.to_lowercase();
    ["timed out", "timeout", "never came", "no element", "could not find"]
        .iter()
        .any(|k| lower.contains(k))
}

const SESSION_GONE: &[&str] = &[
    "connection is closed",
    "connection closed",
    "no such target",
    "target closed",
    "session closed",
    "invalid session",
    "browser has disconnected",
    "underlying connection",
];
