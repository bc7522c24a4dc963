// src/specs/expedia.rs
//! Expedia: reviews sit in a side sheet with a "More reviews" button that
//! appends to the same list. The list is read once, after the last click.
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use super::{count, keep, number, score};
use crate::browser::ClickMode;
use crate::engine::types::*;
use crate::model::{RawField, Source};

static STAYED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)stayed (\d+) nights?").unwrap());

fn nights(raw: &str) -> Option<String> {
    STAYED.captures(raw).map(|c| s!(&c[1]))
}

pub static SPEC: SiteSpec = SiteSpec {
    source: Source::Expedia,
    url: "https://www.expedia.com/Miami-Hotels-Boulan-South-Beach.h4599935.Hotel-Information\
          ?locale=en_US&siteid=1&pwaDialog=product-reviews",
    ready: None,
    entry: Some(Entry {
        selector: r#"button[data-stid="reviews-link"]"#,
        click: ClickMode::Script,
        // Sticky header needs to settle before the script click.
        before_click: Delay::ms(3_000, 3_000),
        after_click: Delay::ms(0, 0),
        settle_scroll: None,
    }),
    container: Some(Container {
        dialog: "section[role='dialog']",
        scroller: "div.uitk-sheet-content.uitk-sheet-content-padded",
        warmup: Warmup::By { times: 5, px: 500 },
        scroll_before_advance: true,
    }),
    pagination: Pagination::LoadMore { xpath: "//button[contains(text(), 'More reviews')]" },
    card: r#"article[itemprop="review"]"#,
    fields: &[
        FieldRule {
            field: RawField::Text,
            selectors: &["span[itemprop='description']"],
            pick: Pick::Text,
            parse: keep,
        },
        FieldRule {
            field: RawField::Rating,
            selectors: &["span[itemprop='ratingValue']"],
            pick: Pick::Text,
            parse: score,
        },
        FieldRule {
            field: RawField::Name,
            selectors: &["h4.uitk-heading.uitk-heading-7"],
            pick: Pick::Text,
            parse: keep,
        },
        FieldRule {
            field: RawField::Date,
            selectors: &["span[itemprop='datePublished']"],
            pick: Pick::Text,
            parse: keep,
        },
        FieldRule {
            field: RawField::LengthOfStay,
            selectors: &["div.uitk-text.uitk-type-200.uitk-text-standard-theme.uitk-layout-flex-item"],
            pick: Pick::Text,
            parse: nights,
        },
    ],
    totals: Totals {
        rating: Some(Probe {
            selector: "div.uitk-text.uitk-type-500.uitk-type-bold.uitk-text-default-theme",
            pick: Pick::Text,
            parse: number,
        }),
        reviews: Some(Probe {
            selector: "button.uitk-more-info-trigger > span",
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
    ],
    waits: Waits {
        ready: Duration::from_secs(15),
        entry: Duration::from_secs(15),
        dialog: Duration::from_secs(15),
        next: Duration::from_secs(5),
    },
    delays: Delays {
        warmup: Delay::ms(1_500, 3_000),
        before_click: Delay::ms(1_500, 2_500),
        after_advance: Delay::ms(2_500, 4_000),
        ..DEFAULT_DELAYS
    },
    max_pages: 60,
    stop_on_empty_page: false,
};
