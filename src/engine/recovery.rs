// src/engine/recovery.rs
use std::time::Duration;

use crate::error::BrowserError;

/// Outcome of one attempt at processing a page.
#[derive(Debug)]
pub enum PageStep<T> {
    /// Page done and the next one is reachable.
    Success(T),
    /// Page done and there is nothing after it.
    NoMorePages(T),
    /// Worth retrying in the same session after a short pause.
    TransientFailure(String),
    /// The browser session is gone; a new one is needed before retrying.
    SessionLost(String),
}

impl<T> PageStep<T> {
    /// Map a browser error that interrupted the attempt.
    pub fn failed(e: BrowserError) -> Self {
        match e {
            BrowserError::SessionLost(msg) => PageStep::SessionLost(msg),
            other => PageStep::TransientFailure(other.to_string()),
        }
    }
}

/// What became of a page once retries are settled.
#[derive(Debug, PartialEq)]
pub enum Settled<T> {
    Advanced(T),
    Finished(T),
    /// Every attempt failed; the caller moves on to the next page.
    Skipped { attempts: u32, last_error: String },
}

/// The page-turning operation the policy wraps.
pub trait PageTurner {
    type Output;

    /// One attempt at page `page` (1-based).
    fn step(&mut self, page: u32) -> PageStep<Self::Output>;

    /// Replace a lost session. Position on the site is restored lazily by the next `step`.
    fn recover(&mut self) -> Result<(), BrowserError>;

    /// Sleep between attempts (no-op in tests).
    fn backoff(&mut self, delay: Duration);
}

/// Bounded retry: `max_attempts` tries per page, a fixed `backoff` after a
/// transient failure, and a session restart after a lost session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), backoff }
    }

    pub fn settle<P: PageTurner>(&self, turner: &mut P, page: u32) -> Settled<P::Output> {
        let mut last_error = s!();

        for attempt in 1..=self.max_attempts {
            match turner.step(page) {
                PageStep::Success(out) => return Settled::Advanced(out),
                PageStep::NoMorePages(out) => return Settled::Finished(out),
                PageStep::TransientFailure(msg) => {
                    logw!("page {page}: attempt {attempt}/{} failed: {msg}", self.max_attempts);
                    last_error = msg;
                    turner.backoff(self.backoff);
                }
                PageStep::SessionLost(msg) => {
                    logw!("page {page}: session lost on attempt {attempt}/{}: {msg}", self.max_attempts);
                    last_error = msg;
                    if let Err(e) = turner.recover() {
                        loge!("page {page}: could not restart the session: {e}");
                        last_error = e.to_string();
                        turner.backoff(self.backoff);
                    }
                }
            }
        }

        Settled::Skipped { attempts: self.max_attempts, last_error }
    }
}
