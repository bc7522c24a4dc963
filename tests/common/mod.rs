// tests/common/mod.rs
#![allow(dead_code)]
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use review_scrape::browser::{ClickMode, Launcher, Locator, Session};
use review_scrape::error::BrowserError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// Reading the page source while page `n` is shown.
    Source,
    /// Clicking the control that leads to page `n`.
    ClickTo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultKind {
    Transient,
    SessionLost,
}

#[derive(Clone, Debug)]
pub struct Fault {
    pub op: Op,
    pub page: u32,
    pub remaining: u32,
    pub kind: FaultKind,
}

/// A scripted website shared by every session the fake launcher hands out.
///
/// `pages[i]` is the DOM while page `i + 1` is shown. Numbered controls carry
/// their page number in the xpath; a control without digits is "load more".
#[derive(Default)]
pub struct SiteState {
    pub pages: Vec<String>,
    pub shown: u32,
    pub missing_css: Vec<String>,
    pub faults: Vec<Fault>,
    pub session: u32,
    pub alive: bool,
    pub launches: u32,
    pub navigations: u32,
    pub clicks: Vec<u32>,
    pub sources: Vec<u32>,
    pub profiles: Vec<PathBuf>,
}

impl SiteState {
    fn fire(&mut self, op: Op, page: u32) -> Result<(), BrowserError> {
        let Some(fault) = self
            .faults
            .iter_mut()
            .find(|f| f.op == op && f.page == page && f.remaining > 0)
        else {
            return Ok(());
        };
        fault.remaining -= 1;
        match fault.kind {
            FaultKind::Transient => Err(BrowserError::Script(format!("{op:?} {page}: boom"))),
            FaultKind::SessionLost => {
                self.alive = false;
                Err(BrowserError::SessionLost(s("invalid session id")))
            }
        }
    }
}

fn s(v: &str) -> String {
    v.to_string()
}

pub type Shared = Rc<RefCell<SiteState>>;

pub fn site(pages: Vec<String>) -> Shared {
    Rc::new(RefCell::new(SiteState { pages, ..Default::default() }))
}

pub struct FakeLauncher {
    pub state: Shared,
}

impl Launcher for FakeLauncher {
    fn launch(&mut self, profile: &Path) -> Result<Box<dyn Session>, BrowserError> {
        let mut st = self.state.borrow_mut();
        st.launches += 1;
        st.session += 1;
        st.alive = true;
        st.shown = 0;
        st.profiles.push(profile.to_path_buf());
        Ok(Box::new(FakeSession { state: self.state.clone(), id: st.session }))
    }
}

pub struct FakeSession {
    state: Shared,
    id: u32,
}

impl FakeSession {
    fn live(&self) -> Result<std::cell::RefMut<'_, SiteState>, BrowserError> {
        let st = self.state.borrow_mut();
        if st.alive && st.session == self.id {
            Ok(st)
        } else {
            Err(BrowserError::SessionLost(s("no such session")))
        }
    }
}

fn timeout(locator: &Locator) -> BrowserError {
    BrowserError::Timeout { locator: locator.to_string(), waited: Duration::from_secs(1) }
}

fn page_number(xpath: &str) -> Option<u32> {
    let digits: String = xpath.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

impl Session for FakeSession {
    fn navigate(&mut self, _url: &str) -> Result<(), BrowserError> {
        let mut st = self.live()?;
        st.navigations += 1;
        st.shown = 1;
        Ok(())
    }

    fn scroll_window(&mut self, _dy: i64) -> Result<(), BrowserError> {
        self.live().map(|_| ())
    }

    fn wait_for(&mut self, locator: &Locator, _timeout: Duration) -> Result<(), BrowserError> {
        let st = self.live()?;
        match locator {
            Locator::Css(sel) if st.missing_css.iter().any(|m| m == sel) => Err(timeout(locator)),
            _ => Ok(()),
        }
    }

    fn click(&mut self, locator: &Locator, _mode: ClickMode, _timeout: Duration) -> Result<(), BrowserError> {
        let mut st = self.live()?;
        let xpath = match locator {
            Locator::Css(sel) if st.missing_css.iter().any(|m| m == sel) => return Err(timeout(locator)),
            Locator::Css(_) => return Ok(()),
            Locator::XPath(x) => x.clone(),
        };
        let to = page_number(&xpath).unwrap_or(st.shown + 1);
        if to == 0 || to as usize > st.pages.len() {
            return Err(timeout(locator));
        }
        st.fire(Op::ClickTo, to)?;
        st.shown = to;
        st.clicks.push(to);
        Ok(())
    }

    fn scroll_to_end(&mut self, _container: &Locator) -> Result<(), BrowserError> {
        self.live().map(|_| ())
    }

    fn scroll_by(&mut self, _container: &Locator, _dy: i64) -> Result<(), BrowserError> {
        self.live().map(|_| ())
    }

    fn page_source(&mut self) -> Result<String, BrowserError> {
        let mut st = self.live()?;
        let shown = st.shown;
        st.fire(Op::Source, shown)?;
        st.sources.push(shown);
        Ok(st.pages[(shown as usize).saturating_sub(1)].clone())
    }

    fn quit(&mut self) {
        let mut st = self.state.borrow_mut();
        if st.session == self.id {
            st.alive = false;
        }
    }
}

/* HTML builders */

/// A TripAdvisor-shaped page with one card per `(name, text)`.
pub fn tripadvisor_page(reviews: &[(&str, &str)]) -> String {
    let cards: String = reviews
        .iter()
        .map(|(name, text)| {
            format!(
                r#"<div class="JVaPo Gi kQjeB">
  <a class="BMQDV _F Gv wSSLS SwZTJ FGwzt ukgoS">{name}</a>
  <svg data-automation="bubbleRatingImage"><title>4 of 5 bubbles</title></svg>
  <div class="hDWtV"><span title="March 1, 2024">Written March 1, 2024</span></div>
  <span class="_d _c" data-automation="reviewText_x">{text}</span>
</div>"#
            )
        })
        .collect();
    format!(
        r#"<html><body>
<div data-automation="bubbleRatingValue">4.5</div>
<div data-automation="bubbleReviewCount">12 reviews</div>
{cards}
</body></html>"#
    )
}

/// An Expedia-shaped review sheet holding `reviews` cards.
pub fn expedia_sheet(reviews: &[(&str, &str)]) -> String {
    let cards: String = reviews
        .iter()
        .map(|(name, text)| {
            format!(
                r#"<article itemprop="review">
  <span itemprop="ratingValue">8/10</span>
  <h4 class="uitk-heading uitk-heading-7">{name}</h4>
  <span itemprop="datePublished">Jan 5, 2024</span>
  <span itemprop="description">{text}</span>
</article>"#
            )
        })
        .collect();
    format!(
        r#"<html><body><section role="dialog">
<div class="uitk-sheet-content uitk-sheet-content-padded">{cards}</div>
</section></body></html>"#
    )
}
