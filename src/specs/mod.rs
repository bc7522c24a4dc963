// src/specs/mod.rs
//! # Site “specs” module
//!
//! One file per review site. Each spec is a declarative [`SiteSpec`]: *where the
//! reviews live in the rendered DOM* and *how to get them on screen*.
//!
//! ## What lives here
//! - **Landing and entry**: listing URL, the control that opens the review list,
//!   the dialog and its scrollable container, warm-up scrolling.
//! - **Pagination style**: numbered page controls (Booking, TripAdvisor) or a
//!   single load-more button (Expedia).
//! - **Field rules**: field → selector(s) + what to read + a parse function.
//!   Rules are applied per review card by `engine::extract_page`; a rule that
//!   misses yields null for that field only.
//! - **Listing totals**: overall score and review count probes.
//!
//! ## What does **not** live here
//! - **Browser driving, retries, session restarts** – `engine::engine` and
//!   `engine::recovery`.
//! - **Type coercion, date parsing, traveler buckets** – the normalizer in
//!   `clean::normalize`. Specs keep values as text, trimmed of labels.
//!
//! ## Typical call chain
//! ```text
//! runner → engine::crawl(spec) → Session (page source)
//!                              ↘ engine::extract_page(spec, html)
//!        → store::raw_dataset → <site>_reviews_<hotel>.csv
//! ```
//!
//! ## Testing notes
//! - Every spec is exercised offline against saved snapshots in `tests/fixtures/`.
//! - Selectors are a contract with one version of each site's markup. When a
//!   site ships new class names, update the selectors and the fixture together.
use crate::core::numbers;
use crate::core::sanitize::non_empty;
use crate::engine::types::SiteSpec;
use crate::model::Source;

pub mod booking;
pub mod expedia;
pub mod tripadvisor;

pub fn spec_for(source: Source) -> &'static SiteSpec {
    match source {
        Source::Booking => &booking::SPEC,
        Source::Expedia => &expedia::SPEC,
        Source::TripAdvisor => &tripadvisor::SPEC,
    }
}

/* Parse helpers shared by the specs */

/// Text as-is (whitespace-normalized); blank is a miss.
pub(crate) fn keep(raw: &str) -> Option<String> {
    non_empty(raw)
}

/// Numerator of `X/Y` or `X of Y`.
pub(crate) fn score(raw: &str) -> Option<String> {
    numbers::numerator(raw).map(numbers::fmt_number)
}

/// First number anywhere in the text.
pub(crate) fn number(raw: &str) -> Option<String> {
    numbers::first_number(raw).map(numbers::fmt_number)
}

/// Review count, separators removed.
pub(crate) fn count(raw: &str) -> Option<String> {
    numbers::count(raw).map(|n| n.to_string())
}
