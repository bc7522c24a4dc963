// src/engine/types.rs
use std::time::Duration;

use crate::browser::{ClickMode, Locator};
use crate::model::{RawField, Source};

/// Turns the raw text of a matched element into a stored value; `None` means unparseable.
pub type ParseFn = fn(&str) -> Option<String>;

/* Generic site spec */

/// Everything the engine needs to crawl one site's review list.
#[derive(Clone, Copy)]
pub struct SiteSpec {
    pub source: Source,
    pub url: &'static str,
    /// Must appear after load before anything else happens.
    pub ready: Option<&'static str>,
    pub entry: Option<Entry>,
    pub container: Option<Container>,
    pub pagination: Pagination,
    /// One element per review.
    pub card: &'static str,
    pub fields: &'static [FieldRule],
    pub totals: Totals,
    /// Raw file columns between `source` and the totals.
    pub columns: &'static [RawField],
    pub waits: Waits,
    pub delays: Delays,
    /// Safety ceiling on pages (or load-more clicks).
    pub max_pages: u32,
    /// A page with zero cards ends the crawl.
    pub stop_on_empty_page: bool,
}

/// The control that opens the review list.
#[derive(Clone, Copy)]
pub struct Entry {
    pub selector: &'static str,
    pub click: ClickMode,
    /// Pause once the control is found, before clicking it.
    pub before_click: Delay,
    /// Pause after the click, before `settle_scroll`.
    pub after_click: Delay,
    /// Window scroll after the click, letting the list render.
    pub settle_scroll: Option<i64>,
}

/// Scrollable review panel inside a dialog.
#[derive(Clone, Copy)]
pub struct Container {
    pub dialog: &'static str,
    pub scroller: &'static str,
    pub warmup: Warmup,
    /// Scroll the panel to its end before each page advance.
    pub scroll_before_advance: bool,
}

#[derive(Clone, Copy)]
pub enum Warmup {
    ToEnd { times: u32 },
    By { times: u32, px: i64 },
}

#[derive(Clone, Copy)]
pub enum Pagination {
    /// Extract a page, then click the control for page `n + 1`. `{n}` is substituted.
    Numbered { xpath: &'static str },
    /// Click one "more" control until it is gone, then extract everything at once.
    LoadMore { xpath: &'static str },
}

impl Pagination {
    /// Control that leads to page `n`.
    pub fn control(&self, n: u32) -> Locator {
        match self {
            Pagination::Numbered { xpath } => Locator::xpath(xpath.replace("{n}", &n.to_string())),
            Pagination::LoadMore { xpath } => Locator::xpath(*xpath),
        }
    }

    pub fn extracts_each_page(&self) -> bool {
        matches!(self, Pagination::Numbered { .. })
    }
}

/// What to read off a matched element.
#[derive(Clone, Copy)]
pub enum Pick {
    /// Text content, whitespace-normalized.
    Text,
    /// An attribute value.
    Attr(&'static str),
    /// Text of the n-th match instead of the first.
    Nth(usize),
}

/// One field of a review card.
///
/// With several selectors, their texts are joined by a space (missing parts are
/// skipped); the field is missing only when none match.
#[derive(Clone, Copy)]
pub struct FieldRule {
    pub field: RawField,
    pub selectors: &'static [&'static str],
    pub pick: Pick,
    pub parse: ParseFn,
}

/// A document-level value (listing aggregates).
#[derive(Clone, Copy)]
pub struct Probe {
    pub selector: &'static str,
    pub pick: Pick,
    pub parse: ParseFn,
}

#[derive(Clone, Copy)]
pub struct Totals {
    pub rating: Option<Probe>,
    pub reviews: Option<Probe>,
}

/// Bounded waits, per site.
#[derive(Clone, Copy)]
pub struct Waits {
    pub ready: Duration,
    pub entry: Duration,
    pub dialog: Duration,
    /// How long the next-page control may take to show up before we call it the end.
    pub next: Duration,
}

/// Inclusive `[min, max]` pause in milliseconds, drawn uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delay {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Delay {
    pub const fn ms(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }
}

/// Human-like pauses between steps.
#[derive(Clone, Copy)]
pub struct Delays {
    pub human_scroll: Delay,
    pub warmup: Delay,
    pub before_extract: Delay,
    /// After the container is scrolled to its end, before looking for the control.
    pub before_advance: Delay,
    /// Control found, not yet clicked.
    pub before_click: Delay,
    pub after_advance: Delay,
}

pub const DEFAULT_DELAYS: Delays = Delays {
    human_scroll: Delay::ms(1_500, 3_000),
    warmup: Delay::ms(1_500, 2_500),
    before_extract: Delay::ms(0, 0),
    before_advance: Delay::ms(2_000, 3_000),
    before_click: Delay::ms(1_000, 2_000),
    after_advance: Delay::ms(3_000, 5_000),
};
