// src/specs/booking.rs
//! Booking.com: reviews open in a modal from the "Guest reviews" tab, paged by
//! numbered buttons at the bottom of the modal.
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use super::{count, keep, score};
use crate::browser::ClickMode;
use crate::core::sanitize::{non_empty, strip_label};
use crate::engine::types::*;
use crate::model::{RawField, Source};

static NIGHTS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s+nights?").unwrap());

fn review_date(raw: &str) -> Option<String> {
    non_empty(strip_label(raw, "Reviewed:"))
}

fn nights(raw: &str) -> Option<String> {
    NIGHTS.captures(raw).map(|c| s!(&c[1]))
}

const SCORE: &str = "div.f63b14ab7a.dff2e52086";

pub static SPEC: SiteSpec = SiteSpec {
    source: Source::Booking,
    url: "https://www.booking.com/hotel/us/new-york-32-east-32nd-street.html?lang=en-us",
    ready: None,
    entry: Some(Entry {
        selector: "#reviews-tab-trigger",
        click: ClickMode::Native,
        before_click: Delay::ms(1_000, 1_000),
        after_click: Delay::ms(2_000, 2_000),
        settle_scroll: Some(500),
    }),
    container: Some(Container {
        dialog: r#"div[role="dialog"][aria-modal="true"]"#,
        scroller: "div.c1cb99b7ca",
        warmup: Warmup::ToEnd { times: 10 },
        scroll_before_advance: true,
    }),
    pagination: Pagination::Numbered { xpath: "//button[normalize-space()='{n}']" },
    card: "div[data-testid='review-card']",
    fields: &[
        FieldRule {
            field: RawField::Text,
            selectors: &[
                r#"div[data-testid="review-positive-text"]"#,
                r#"div[data-testid="review-negative-text"]"#,
            ],
            pick: Pick::Text,
            parse: keep,
        },
        FieldRule { field: RawField::Rating, selectors: &[SCORE], pick: Pick::Text, parse: score },
        FieldRule {
            field: RawField::Name,
            selectors: &["div.b08850ce41.f546354b44"],
            pick: Pick::Text,
            parse: keep,
        },
        FieldRule {
            field: RawField::Date,
            selectors: &["span[data-testid='review-date']"],
            pick: Pick::Text,
            parse: review_date,
        },
        FieldRule {
            field: RawField::LengthOfStay,
            selectors: &["span[data-testid='review-num-nights']"],
            pick: Pick::Text,
            parse: nights,
        },
        FieldRule {
            field: RawField::TravelerType,
            selectors: &["span[data-testid='review-traveler-type']"],
            pick: Pick::Text,
            parse: keep,
        },
    ],
    totals: Totals {
        rating: Some(Probe { selector: SCORE, pick: Pick::Text, parse: score }),
        reviews: Some(Probe {
            selector: "div.fff1944c52.fb14de7f14.eaa8455879",
            pick: Pick::Text,
            parse: count,
        }),
    },
    columns: &[
        RawField::Text,
        RawField::Rating,
        RawField::Name,
        RawField::Date,
        RawField::LengthOfStay,
        RawField::TravelerType,
    ],
    waits: Waits {
        ready: Duration::from_secs(10),
        entry: Duration::from_secs(10),
        dialog: Duration::from_secs(10),
        next: Duration::from_secs(5),
    },
    delays: DEFAULT_DELAYS,
    max_pages: 60,
    stop_on_empty_page: false,
};
