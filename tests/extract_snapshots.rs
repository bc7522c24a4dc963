// tests/extract_snapshots.rs
use review_scrape::browser::Locator;
use review_scrape::engine::extract_page;
use review_scrape::model::{RawField, Source};
use review_scrape::specs::{self, booking, expedia, tripadvisor};

const BOOKING: &str = include_str!("fixtures/booking_page.html");
const EXPEDIA: &str = include_str!("fixtures/expedia_page.html");
const TRIPADVISOR: &str = include_str!("fixtures/tripadvisor_page.html");

#[test]
fn booking_cards_and_totals() {
    let page = extract_page(&booking::SPEC, BOOKING);
    assert_eq!(page.reviews.len(), 3);

    let first = &page.reviews[0];
    assert_eq!(first.get(RawField::Text), Some("Great location, friendly staff. Small rooms."));
    assert_eq!(first.get(RawField::Rating), Some("9"));
    assert_eq!(first.get(RawField::Name), Some("Maria"));
    assert_eq!(first.get(RawField::Date), Some("March 3, 2024"));
    assert_eq!(first.get(RawField::LengthOfStay), Some("3"));
    assert_eq!(first.get(RawField::TravelerType), Some("Couple"));

    assert_eq!(page.reviews[1].get(RawField::LengthOfStay), Some("1"));
    assert_eq!(page.reviews[1].get(RawField::Text), Some("Spotless."));

    assert_eq!(page.totals.rating.as_deref(), Some("8.4"));
    assert_eq!(page.totals.reviews.as_deref(), Some("1234"));
}

#[test]
fn booking_missing_fields_null_only_that_field() {
    let page = extract_page(&booking::SPEC, BOOKING);
    let third = &page.reviews[2];
    assert_eq!(third.get(RawField::Text), Some("Noisy at night."));
    assert_eq!(third.get(RawField::Rating), None);
    assert_eq!(third.get(RawField::Name), None);
    assert_eq!(third.get(RawField::LengthOfStay), None);
    assert_eq!(third.get(RawField::Date), Some("12 December 2013"));
    // rating, name and stay on the third card
    assert_eq!(page.field_misses, 3);
}

#[test]
fn expedia_cards_and_totals() {
    let page = extract_page(&expedia::SPEC, EXPEDIA);
    assert_eq!(page.reviews.len(), 2);

    let ana = &page.reviews[0];
    assert_eq!(ana.get(RawField::Text), Some("Loved the pool."));
    assert_eq!(ana.get(RawField::Rating), Some("10"));
    assert_eq!(ana.get(RawField::Name), Some("Ana"));
    assert_eq!(ana.get(RawField::Date), Some("Feb 2, 2023"));
    assert_eq!(ana.get(RawField::LengthOfStay), Some("2"));
    assert_eq!(ana.get(RawField::TravelerType), None);

    assert_eq!(page.reviews[1].get(RawField::Rating), Some("8"));
    assert_eq!(page.reviews[1].get(RawField::LengthOfStay), None);

    assert_eq!(page.totals.rating.as_deref(), Some("9.2"));
    assert_eq!(page.totals.reviews.as_deref(), Some("1003"));
}

#[test]
fn tripadvisor_cards_and_totals() {
    let page = extract_page(&tripadvisor::SPEC, TRIPADVISOR);
    assert_eq!(page.reviews.len(), 2);

    let kim = &page.reviews[0];
    assert_eq!(kim.get(RawField::Text), Some("Quiet and clean."));
    assert_eq!(kim.get(RawField::Rating), Some("4.5"));
    assert_eq!(kim.get(RawField::Name), Some("Kim"));
    assert_eq!(kim.get(RawField::Title), Some("Great stay"));
    assert_eq!(kim.get(RawField::Date), Some("May 4, 2023"));
    assert_eq!(kim.get(RawField::DateVisited), Some("April 2023"));
    assert_eq!(kim.get(RawField::TravelerType), Some("Couples"));

    let lee = &page.reviews[1];
    assert_eq!(lee.get(RawField::Rating), Some("5"));
    assert_eq!(lee.get(RawField::Title), None);
    assert_eq!(lee.get(RawField::TravelerType), Some("Friends"));

    assert_eq!(page.totals.rating.as_deref(), Some("4.6"));
    assert_eq!(page.totals.reviews.as_deref(), Some("2345"));
}

#[test]
fn page_without_cards_is_empty_not_an_error() {
    let page = extract_page(&tripadvisor::SPEC, "<html><body><p>Please verify you are human</p></body></html>");
    assert!(page.reviews.is_empty());
    assert_eq!(page.totals.rating, None);
}

#[test]
fn registry_matches_sources() {
    for source in Source::ALL {
        let spec = specs::spec_for(source);
        assert_eq!(spec.source, source);
        assert!(spec.columns.contains(&RawField::Text));
        assert!(spec.columns.contains(&RawField::Rating));
        assert!(spec.max_pages >= 60);
    }
}

#[test]
fn numbered_controls_substitute_the_page() {
    let loc = tripadvisor::SPEC.pagination.control(7);
    assert_eq!(loc, Locator::xpath("//a[@aria-label='7']"));
    let loc = booking::SPEC.pagination.control(2);
    assert_eq!(loc, Locator::xpath("//button[normalize-space()='2']"));
}
