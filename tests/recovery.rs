// tests/recovery.rs
mod common;

use std::cell::Cell;
use std::time::Duration;

use common::{expedia_sheet, site, tripadvisor_page, FakeLauncher, Fault, FaultKind, Op};
use review_scrape::engine::recovery::{PageStep, PageTurner, RetryPolicy, Settled};
use review_scrape::engine::types::{Delay, SiteSpec};
use review_scrape::engine::{crawl, CrawlSettings};
use review_scrape::error::{BrowserError, Error};
use review_scrape::model::{RawField, Source};
use review_scrape::progress::NullProgress;
use review_scrape::specs::{booking, expedia, tripadvisor};

fn settings(dir: &tempfile::TempDir) -> CrawlSettings {
    CrawlSettings {
        url: "https://example.test/hotel".into(),
        profile_base: dir.path().join("profile"),
        retry: RetryPolicy::new(2, Duration::from_millis(0)),
        human_pacing: false,
    }
}

fn three_pages() -> Vec<String> {
    vec![
        tripadvisor_page(&[("a1", "first page one"), ("a2", "first page two")]),
        tripadvisor_page(&[("b1", "second page one"), ("b2", "second page two")]),
        tripadvisor_page(&[("c1", "third page one"), ("c2", "third page two")]),
    ]
}

fn texts(reviews: &[review_scrape::model::RawReview]) -> Vec<String> {
    reviews.iter().filter_map(|r| r.get(RawField::Text).map(String::from)).collect()
}

/* ---------------- Retry policy on its own ---------------- */

struct Scripted {
    steps: Vec<PageStep<&'static str>>,
    recovers: u32,
    backoffs: Cell<u32>,
    fail_recover: bool,
}

impl PageTurner for Scripted {
    type Output = &'static str;

    fn step(&mut self, _page: u32) -> PageStep<Self::Output> {
        if self.steps.is_empty() {
            PageStep::TransientFailure("out of script".into())
        } else {
            self.steps.remove(0)
        }
    }

    fn recover(&mut self) -> Result<(), BrowserError> {
        self.recovers += 1;
        if self.fail_recover {
            Err(BrowserError::Launch("no chrome".into()))
        } else {
            Ok(())
        }
    }

    fn backoff(&mut self, _delay: Duration) {
        self.backoffs.set(self.backoffs.get() + 1);
    }
}

fn scripted(steps: Vec<PageStep<&'static str>>) -> Scripted {
    Scripted { steps, recovers: 0, backoffs: Cell::new(0), fail_recover: false }
}

#[test]
fn transient_failure_backs_off_then_succeeds() {
    let mut t = scripted(vec![PageStep::TransientFailure("flaky".into()), PageStep::Success("ok")]);
    let got = RetryPolicy::new(2, Duration::ZERO).settle(&mut t, 1);
    assert_eq!(got, Settled::Advanced("ok"));
    assert_eq!(t.backoffs.get(), 1);
    assert_eq!(t.recovers, 0);
}

#[test]
fn lost_session_is_recovered_before_retrying() {
    let mut t = scripted(vec![PageStep::SessionLost("gone".into()), PageStep::NoMorePages("last")]);
    let got = RetryPolicy::new(2, Duration::ZERO).settle(&mut t, 4);
    assert_eq!(got, Settled::Finished("last"));
    assert_eq!(t.recovers, 1);
}

#[test]
fn exhausted_attempts_report_a_skip() {
    let mut t = scripted(vec![
        PageStep::TransientFailure("one".into()),
        PageStep::SessionLost("two".into()),
        PageStep::Success("never reached"),
    ]);
    t.fail_recover = true;
    let got = RetryPolicy::new(2, Duration::ZERO).settle(&mut t, 2);
    match got {
        Settled::Skipped { attempts, last_error } => {
            assert_eq!(attempts, 2);
            assert!(last_error.contains("no chrome"));
        }
        other => panic!("expected a skip, got {other:?}"),
    }
}

#[test]
fn zero_attempts_still_tries_once() {
    let mut t = scripted(vec![PageStep::Success("ok")]);
    assert_eq!(RetryPolicy::new(0, Duration::ZERO).settle(&mut t, 1), Settled::Advanced("ok"));
}

/* ---------------- Engine against a scripted site ---------------- */

#[test]
fn crawls_until_the_next_control_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let state = site(three_pages());
    let mut launcher = FakeLauncher { state: state.clone() };

    let out = crawl(&tripadvisor::SPEC, &mut launcher, &settings(&dir), &mut NullProgress).unwrap();

    assert_eq!(out.source, Source::TripAdvisor);
    assert_eq!(out.reviews.len(), 6);
    assert_eq!(out.pages, 3);
    assert!(out.skipped.is_empty());
    assert_eq!(out.totals.rating.as_deref(), Some("4.5"));
    assert_eq!(out.totals.reviews.as_deref(), Some("12"));

    let st = state.borrow();
    assert_eq!(st.launches, 1);
    assert_eq!(st.clicks, vec![2, 3]);
    assert_eq!(st.sources, vec![1, 2, 3]);
}

#[test]
fn page_ceiling_stops_before_the_next_click() {
    let dir = tempfile::tempdir().unwrap();
    let state = site(three_pages());
    let mut launcher = FakeLauncher { state: state.clone() };
    let spec = SiteSpec { max_pages: 2, ..tripadvisor::SPEC };

    let out = crawl(&spec, &mut launcher, &settings(&dir), &mut NullProgress).unwrap();

    assert_eq!(out.pages, 2);
    assert_eq!(out.reviews.len(), 4);
    assert!(out.skipped.is_empty());
    let st = state.borrow();
    assert_eq!(st.clicks, vec![2]);
    assert_eq!(st.sources, vec![1, 2]);
}

#[test]
fn sites_keep_their_own_pauses() {
    let b = booking::SPEC;
    let entry = b.entry.unwrap();
    assert_eq!(entry.before_click, Delay::ms(1_000, 1_000));
    assert_eq!(entry.after_click, Delay::ms(2_000, 2_000));
    assert_eq!(b.delays.before_advance, Delay::ms(2_000, 3_000));
    assert_eq!(b.delays.before_click, Delay::ms(1_000, 2_000));
    assert_eq!(b.delays.after_advance, Delay::ms(3_000, 5_000));

    let e = expedia::SPEC;
    assert_eq!(e.entry.unwrap().before_click, Delay::ms(3_000, 3_000));
    assert_eq!(e.delays.warmup, Delay::ms(1_500, 3_000));
    assert_eq!(e.delays.before_click, Delay::ms(1_500, 2_500));
    assert_eq!(e.delays.after_advance, Delay::ms(2_500, 4_000));

    let t = tripadvisor::SPEC;
    assert!(t.entry.is_none());
    assert_eq!(t.delays.before_extract, Delay::ms(3_000, 5_000));
    assert_eq!(t.delays.before_click, Delay::ms(1_000, 2_000));
    assert_eq!(t.delays.after_advance, Delay::ms(3_000, 6_000));
}

#[test]
fn lost_session_restarts_and_replays_to_the_page() {
    let dir = tempfile::tempdir().unwrap();
    let state = site(three_pages());
    state.borrow_mut().faults.push(Fault {
        op: Op::ClickTo,
        page: 3,
        remaining: 1,
        kind: FaultKind::SessionLost,
    });
    let mut launcher = FakeLauncher { state: state.clone() };

    let out = crawl(&tripadvisor::SPEC, &mut launcher, &settings(&dir), &mut NullProgress).unwrap();

    // Page 2 is committed once even though it was read twice.
    assert_eq!(
        texts(&out.reviews),
        vec![
            "first page one", "first page two",
            "second page one", "second page two",
            "third page one", "third page two",
        ]
    );
    assert_eq!(out.restarts, 1);
    assert!(out.skipped.is_empty());

    let st = state.borrow();
    assert_eq!(st.launches, 2);
    assert_eq!(st.navigations, 2);
    // 2, (3 lost), replay 2, then 3
    assert_eq!(st.clicks, vec![2, 2, 3]);
    // Same profile directory on restart.
    assert_eq!(st.profiles[0], st.profiles[1]);
}

#[test]
fn exhausted_retries_skip_the_page_and_continue() {
    let dir = tempfile::tempdir().unwrap();
    let state = site(three_pages());
    state.borrow_mut().faults.push(Fault {
        op: Op::Source,
        page: 2,
        remaining: 2,
        kind: FaultKind::Transient,
    });
    let mut launcher = FakeLauncher { state: state.clone() };

    let out = crawl(&tripadvisor::SPEC, &mut launcher, &settings(&dir), &mut NullProgress).unwrap();

    assert_eq!(out.skipped, vec![2]);
    assert_eq!(
        texts(&out.reviews),
        vec!["first page one", "first page two", "third page one", "third page two"]
    );
    assert_eq!(out.pages, 3);
    assert_eq!(state.borrow().launches, 1);
}

#[test]
fn empty_page_ends_the_crawl() {
    let dir = tempfile::tempdir().unwrap();
    let state = site(vec![
        tripadvisor_page(&[("a1", "only page")]),
        tripadvisor_page(&[]),
        tripadvisor_page(&[("c1", "never read")]),
    ]);
    let mut launcher = FakeLauncher { state: state.clone() };

    let out = crawl(&tripadvisor::SPEC, &mut launcher, &settings(&dir), &mut NullProgress).unwrap();

    assert_eq!(texts(&out.reviews), vec!["only page"]);
    assert_eq!(out.pages, 2);
    assert_eq!(state.borrow().clicks, vec![2]);
}

#[test]
fn missing_entry_control_is_a_navigation_error() {
    let dir = tempfile::tempdir().unwrap();
    let state = site(vec![expedia_sheet(&[("Ana", "Nice")])]);
    state.borrow_mut().missing_css.push(expedia::SPEC.entry.as_ref().unwrap().selector.to_string());
    let mut launcher = FakeLauncher { state: state.clone() };

    let err = crawl(&expedia::SPEC, &mut launcher, &settings(&dir), &mut NullProgress).unwrap_err();

    match &err {
        Error::Navigation { site, cause, .. } => {
            assert_eq!(*site, Source::Expedia);
            assert!(matches!(cause, BrowserError::Timeout { .. }));
        }
        other => panic!("expected a navigation error, got {other:?}"),
    }
    assert_eq!(err.exit_code(), 69);
    assert!(state.borrow().sources.is_empty());
}

#[test]
fn missing_dialog_is_a_navigation_error() {
    let dir = tempfile::tempdir().unwrap();
    let state = site(vec![tripadvisor_page(&[("a", "b")])]);
    let dialog = booking::SPEC.container.as_ref().unwrap().dialog;
    state.borrow_mut().missing_css.push(dialog.to_string());
    let mut launcher = FakeLauncher { state };

    let err = crawl(&booking::SPEC, &mut launcher, &settings(&dir), &mut NullProgress).unwrap_err();
    assert!(matches!(err, Error::Navigation { site: Source::Booking, .. }));
}

#[test]
fn load_more_reads_the_list_once_after_the_last_click() {
    let dir = tempfile::tempdir().unwrap();
    let state = site(vec![
        expedia_sheet(&[("Ana", "one"), ("Tom", "two")]),
        expedia_sheet(&[("Ana", "one"), ("Tom", "two"), ("Lia", "three"), ("Max", "four")]),
        expedia_sheet(&[("Ana", "one"), ("Tom", "two"), ("Lia", "three"), ("Max", "four"), ("Sam", "five")]),
    ]);
    let mut launcher = FakeLauncher { state: state.clone() };

    let out = crawl(&expedia::SPEC, &mut launcher, &settings(&dir), &mut NullProgress).unwrap();

    assert_eq!(texts(&out.reviews), vec!["one", "two", "three", "four", "five"]);
    let st = state.borrow();
    assert_eq!(st.clicks, vec![2, 3]);
    assert_eq!(st.sources, vec![3]);
}

#[test]
fn load_more_keeps_what_is_loaded_when_a_click_keeps_failing() {
    let dir = tempfile::tempdir().unwrap();
    let state = site(vec![
        expedia_sheet(&[("Ana", "one")]),
        expedia_sheet(&[("Ana", "one"), ("Tom", "two")]),
        expedia_sheet(&[("Ana", "one"), ("Tom", "two"), ("Lia", "three")]),
    ]);
    state.borrow_mut().faults.push(Fault {
        op: Op::ClickTo,
        page: 3,
        remaining: 2,
        kind: FaultKind::Transient,
    });
    let mut launcher = FakeLauncher { state: state.clone() };

    let out = crawl(&expedia::SPEC, &mut launcher, &settings(&dir), &mut NullProgress).unwrap();

    assert_eq!(texts(&out.reviews), vec!["one", "two"]);
    assert_eq!(out.skipped, vec![2]);
}
