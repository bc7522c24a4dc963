// src/specs/tripadvisor.rs
//! TripAdvisor: reviews are inline on the hotel page, paged by numbered links.
//! This is the site most prone to dropping the browser session mid-run.
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use super::{count, keep, number};
use crate::engine::types::*;
use crate::model::{RawField, Source};

static BUBBLES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d(?:\.\d)?) of 5 bubbles").unwrap());

fn bubbles(raw: &str) -> Option<String> {
    BUBBLES.captures(raw).map(|c| s!(&c[1]))
}

static MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b((?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+\d{4})\b").unwrap()
});

/// `"Date of stay: April 2023"` → `"April 2023"`.
fn visited(raw: &str) -> Option<String> {
    MONTH_YEAR.captures(raw).map(|c| s!(&c[1]))
}

const TRIP_LABELS: &str = "div.TgEgi div.biGQs._P.fiohW.fOtGX";

pub static SPEC: SiteSpec = SiteSpec {
    source: Source::TripAdvisor,
    url: "https://www.tripadvisor.com/Hotel_Review-g34439-d2443641-Reviews-Boulan_South_Beach-Miami_Beach_Florida.html",
    ready: Some("div.JVaPo.Gi.kQjeB"),
    entry: None,
    container: None,
    pagination: Pagination::Numbered { xpath: "//a[@aria-label='{n}']" },
    card: "div[class*='JVaPo']",
    fields: &[
        FieldRule {
            field: RawField::Text,
            selectors: &["span._d._c[data-automation^='reviewText']"],
            pick: Pick::Text,
            parse: keep,
        },
        FieldRule {
            field: RawField::Rating,
            selectors: &["svg[data-automation='bubbleRatingImage'] title"],
            pick: Pick::Text,
            parse: bubbles,
        },
        FieldRule {
            field: RawField::Name,
            selectors: &["a.BMQDV._F.Gv.wSSLS.SwZTJ.FGwzt.ukgoS"],
            pick: Pick::Text,
            parse: keep,
        },
        FieldRule {
            field: RawField::Title,
            selectors: &["div[data-test-target='review-title'] > div > a"],
            pick: Pick::Text,
            parse: keep,
        },
        FieldRule {
            field: RawField::Date,
            selectors: &["div.hDWtV span[title]"],
            pick: Pick::Attr("title"),
            parse: keep,
        },
        FieldRule {
            field: RawField::DateVisited,
            selectors: &[TRIP_LABELS],
            pick: Pick::Nth(0),
            parse: visited,
        },
        FieldRule {
            field: RawField::TravelerType,
            selectors: &[TRIP_LABELS],
            pick: Pick::Nth(1),
            parse: keep,
        },
    ],
    totals: Totals {
        rating: Some(Probe {
            selector: "div[data-automation='bubbleRatingValue']",
            pick: Pick::Text,
            parse: number,
        }),
        reviews: Some(Probe {
            selector: "div[data-automation='bubbleReviewCount']",
            pick: Pick::Text,
            parse: count,
        }),
    },
    columns: &[
        RawField::Text,
        RawField::Rating,
        RawField::Name,
        RawField::Title,
        RawField::Date,
        RawField::DateVisited,
        RawField::TravelerType,
    ],
    waits: Waits {
        ready: Duration::from_secs(15),
        entry: Duration::from_secs(15),
        dialog: Duration::from_secs(15),
        next: Duration::from_secs(15),
    },
    delays: Delays {
        before_extract: Delay::ms(3_000, 5_000),
        after_advance: Delay::ms(3_000, 6_000),
        ..DEFAULT_DELAYS
    },
    max_pages: 100,
    stop_on_empty_page: true,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stay_month_is_pulled_from_the_label() {
        assert_eq!(visited("Date of stay: April 2023").as_deref(), Some("April 2023"));
        assert_eq!(visited("Date of stay: Sept. 2019").as_deref(), Some("Sept. 2019"));
        assert_eq!(visited("Trip type: Traveled as a couple"), None);
    }

    #[test]
    fn bubble_rating() {
        assert_eq!(bubbles("4.5 of 5 bubbles").as_deref(), Some("4.5"));
        assert_eq!(bubbles("five stars"), None);
    }
}
