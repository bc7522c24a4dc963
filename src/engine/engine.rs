// src/engine/engine.rs
use std::path::PathBuf;
use std::time::Duration;

use super::extract::{extract_page, PageExtract};
use super::pacing::Pacer;
use super::recovery::{PageStep, PageTurner, RetryPolicy, Settled};
use super::types::{SiteSpec, Warmup};
use crate::browser::{profile, ClickMode, Launcher, Locator, Session};
use crate::config::consts::HUMAN_SCROLL_STEPS;
use crate::config::options::ScrapeOptions;
use crate::error::{BrowserError, Error, Result};
use crate::model::{ListingTotals, RawReview, Source};
use crate::progress::Progress;

/// Per-run knobs for one site crawl.
#[derive(Clone, Debug)]
pub struct CrawlSettings {
    pub url: String,
    pub profile_base: PathBuf,
    pub retry: RetryPolicy,
    pub human_pacing: bool,
}

impl CrawlSettings {
    pub fn from_options(spec: &SiteSpec, opts: &ScrapeOptions) -> Self {
        Self {
            url: s!(opts.urls.get(spec.source).unwrap_or(spec.url)),
            profile_base: opts.profile_dir.clone(),
            retry: RetryPolicy::new(opts.retries, opts.backoff()),
            human_pacing: opts.human_pacing,
        }
    }
}

/// Everything one adapter run collected.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrapeOutput {
    pub source: Source,
    pub reviews: Vec<RawReview>,
    pub totals: ListingTotals,
    /// Last page (or load-more batch) reached.
    pub pages: u32,
    pub skipped: Vec<u32>,
    pub restarts: u32,
}

impl ScrapeOutput {
    fn new(source: Source) -> Self {
        Self {
            source,
            reviews: Vec::new(),
            totals: ListingTotals::default(),
            pages: 0,
            skipped: Vec::new(),
            restarts: 0,
        }
    }

    fn absorb(&mut self, page: u32, extract: Option<PageExtract>, progress: &mut dyn Progress) {
        self.pages = page;
        let n = match extract {
            Some(ex) => {
                let n = ex.reviews.len();
                self.reviews.extend(ex.reviews);
                self.totals.merge(ex.totals);
                n
            }
            None => 0,
        };
        logd!("{}: page {page} committed ({n} reviews)", self.source);
        progress.page_done(page, n);
    }
}

/// Drive one site from its landing page to the last review page.
///
/// Fails only when the review list cannot be opened at all; page-level trouble
/// is retried, recovered, or skipped inside.
pub fn crawl(
    spec: &SiteSpec,
    launcher: &mut dyn Launcher,
    settings: &CrawlSettings,
    progress: &mut dyn Progress,
) -> Result<ScrapeOutput> {
    let source = spec.source;
    progress.begin(source.as_str());

    let profile = profile::fresh(&settings.profile_base);
    let session = launcher
        .launch(&profile)
        .map_err(|cause| Error::Launch { site: source, cause })?;

    let mut crawl = Crawl {
        spec,
        settings,
        launcher,
        session,
        profile,
        pacer: Pacer::new(settings.human_pacing),
        shown: None,
        reached: 1,
        restarts: 0,
        harvest_only: false,
    };

    logf!("{source}: opening {}", settings.url);
    if let Err((step, cause)) = crawl.open() {
        crawl.session.quit();
        progress.finish();
        return Err(Error::Navigation { site: source, step, cause });
    }

    let mut out = ScrapeOutput::new(source);
    let mut page = 1;
    loop {
        match settings.retry.settle(&mut crawl, page) {
            Settled::Advanced(ex) => {
                out.absorb(page, ex, progress);
                page += 1;
            }
            Settled::Finished(ex) => {
                out.absorb(page, ex, progress);
                if page >= spec.max_pages {
                    logw!("{source}: stopped at the {}-page ceiling", spec.max_pages);
                } else {
                    logf!("{source}: no page {} found, finished after {page} page(s)", page + 1);
                }
                break;
            }
            Settled::Skipped { attempts, last_error } => {
                loge!("{source}: skipping page {page} after {attempts} attempt(s): {last_error}");
                progress.log(&format!("{source}: skipped page {page}"));
                out.skipped.push(page);
                out.pages = page;

                if !spec.pagination.extracts_each_page() {
                    // Stop loading more and keep what is already rendered.
                    crawl.harvest_only = true;
                    match settings.retry.settle(&mut crawl, page) {
                        Settled::Advanced(ex) | Settled::Finished(ex) => out.absorb(page, ex, progress),
                        Settled::Skipped { last_error, .. } => {
                            loge!("{source}: could not read the loaded list: {last_error}")
                        }
                    }
                    break;
                }
                if page >= spec.max_pages {
                    break;
                }
                page += 1;
            }
        }
    }

    out.restarts = crawl.restarts;
    crawl.session.quit();
    logf!(
        "{source}: {} reviews over {} page(s), {} skipped, {} session restart(s)",
        out.reviews.len(), out.pages, out.skipped.len(), out.restarts
    );
    progress.finish();
    Ok(out)
}

struct Crawl<'a> {
    spec: &'a SiteSpec,
    settings: &'a CrawlSettings,
    launcher: &'a mut dyn Launcher,
    session: Box<dyn Session>,
    profile: PathBuf,
    pacer: Pacer,
    /// Page on screen. `None` after a restart until the site is reopened.
    shown: Option<u32>,
    /// Furthest page reached so far.
    reached: u32,
    restarts: u32,
    /// Load-more only: stop clicking, extract whatever is on screen.
    harvest_only: bool,
}

type OpenError = (&'static str, BrowserError);

impl Crawl<'_> {
    /// Land on the listing and get the review list on screen (page 1).
    fn open(&mut self) -> std::result::Result<(), OpenError> {
        let spec = self.spec;
        let at = |step: &'static str| move |e: BrowserError| (step, e);

        self.session.navigate(&self.settings.url).map_err(at("loading the listing page"))?;
        self.human_scroll().map_err(at("scrolling the listing page"))?;

        if let Some(ready) = spec.ready {
            self.session
                .wait_for(&Locator::css(ready), spec.waits.ready)
                .map_err(at("waiting for reviews to render"))?;
        }

        if let Some(entry) = &spec.entry {
            let control = Locator::css(entry.selector);
            self.session
                .wait_for(&control, spec.waits.entry)
                .map_err(at("opening the review list"))?;
            self.pacer.pause(entry.before_click);
            self.session
                .click(&control, entry.click, spec.waits.entry)
                .map_err(at("opening the review list"))?;
            self.pacer.pause(entry.after_click);
            if let Some(dy) = entry.settle_scroll {
                self.session.scroll_window(dy).map_err(at("opening the review list"))?;
            }
        }

        if let Some(c) = &spec.container {
            self.session
                .wait_for(&Locator::css(c.dialog), spec.waits.dialog)
                .map_err(at("waiting for the review dialog"))?;
            let scroller = Locator::css(c.scroller);
            self.session
                .wait_for(&scroller, spec.waits.dialog)
                .map_err(at("locating the review container"))?;
            match c.warmup {
                Warmup::ToEnd { times } => {
                    for _ in 0..times {
                        self.session.scroll_to_end(&scroller).map_err(at("loading reviews"))?;
                        self.pacer.pause(spec.delays.warmup);
                    }
                }
                Warmup::By { times, px } => {
                    for _ in 0..times {
                        self.session.scroll_by(&scroller, px).map_err(at("loading reviews"))?;
                        self.pacer.pause(spec.delays.warmup);
                    }
                }
            }
        }

        self.shown = Some(1);
        Ok(())
    }

    fn human_scroll(&mut self) -> std::result::Result<(), BrowserError> {
        for _ in 0..HUMAN_SCROLL_STEPS {
            let dy = self.pacer.scroll_delta();
            self.session.scroll_window(dy)?;
            self.pacer.pause(self.spec.delays.human_scroll);
        }
        Ok(())
    }

    /// Put `page` on screen, reopening and replaying clicks from page 1 when needed.
    fn goto(&mut self, page: u32) -> std::result::Result<(), BrowserError> {
        if self.shown.is_some_and(|at| at > page) {
            self.shown = None;
        }
        if self.shown.is_none() {
            self.open().map_err(|(_, e)| e)?;
            if page > 1 {
                logf!("{}: replaying navigation up to page {page}", self.spec.source);
            }
        }
        while let Some(at) = self.shown.filter(|at| *at < page) {
            self.advance(at + 1)?;
        }
        Ok(())
    }

    fn advance(&mut self, to: u32) -> std::result::Result<(), BrowserError> {
        let spec = self.spec;
        if let Some(c) = spec.container.as_ref().filter(|c| c.scroll_before_advance) {
            self.session.scroll_to_end(&Locator::css(c.scroller))?;
            self.pacer.pause(spec.delays.before_advance);
        }
        let control = spec.pagination.control(to);
        self.session.wait_for(&control, spec.waits.next)?;
        self.pacer.pause(spec.delays.before_click);
        self.session.click(&control, ClickMode::Native, spec.waits.next)?;
        self.shown = Some(to);
        self.reached = self.reached.max(to);
        self.pacer.pause(spec.delays.after_advance);
        Ok(())
    }

    fn extract(&mut self) -> std::result::Result<PageExtract, BrowserError> {
        self.pacer.pause(self.spec.delays.before_extract);
        let html = self.session.page_source()?;
        Ok(extract_page(self.spec, &html))
    }

    fn try_step(&mut self, page: u32) -> std::result::Result<PageStep<Option<PageExtract>>, BrowserError> {
        let spec = self.spec;

        if self.harvest_only {
            let at = self.shown.unwrap_or(self.reached);
            self.goto(at)?;
            return Ok(PageStep::NoMorePages(Some(self.extract()?)));
        }

        self.goto(page)?;

        let extract = if spec.pagination.extracts_each_page() {
            let ex = self.extract()?;
            if ex.reviews.is_empty() && spec.stop_on_empty_page {
                logf!("{}: page {page} has no reviews, treating it as the last page", spec.source);
                return Ok(PageStep::NoMorePages(Some(ex)));
            }
            Some(ex)
        } else {
            None
        };

        if page >= spec.max_pages {
            let ex = match extract {
                Some(ex) => ex,
                None => self.extract()?,
            };
            return Ok(PageStep::NoMorePages(Some(ex)));
        }

        match self.advance(page + 1) {
            Ok(()) => Ok(PageStep::Success(extract)),
            // Control never showed up: this was the last page.
            Err(BrowserError::Timeout { .. }) => {
                let ex = match extract {
                    Some(ex) => ex,
                    None => self.extract()?,
                };
                Ok(PageStep::NoMorePages(Some(ex)))
            }
            Err(e) => Err(e),
        }
    }
}

impl PageTurner for Crawl<'_> {
    type Output = Option<PageExtract>;

    fn step(&mut self, page: u32) -> PageStep<Self::Output> {
        self.try_step(page).unwrap_or_else(PageStep::failed)
    }

    fn recover(&mut self) -> std::result::Result<(), BrowserError> {
        self.session.quit();
        self.shown = None;
        self.restarts += 1;
        self.profile = profile::reuse_or_fallback(&self.profile, &self.settings.profile_base);
        logf!(
            "{}: restarting browser session #{} with profile {}",
            self.spec.source, self.restarts, self.profile.display()
        );
        self.session = self.launcher.launch(&self.profile)?;
        Ok(())
    }

    fn backoff(&mut self, delay: Duration) {
        self.pacer.wait(delay);
    }
}
