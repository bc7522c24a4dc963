// src/runner.rs
use std::fmt;
use std::path::PathBuf;

use crate::browser::Launcher;
use crate::clean::{normalize, profile_for, reconcile, NormalizeReport, ReconcileReport};
use crate::config::options::AppOptions;
use crate::core::awake::KeepAwake;
use crate::engine::{crawl, CrawlSettings};
use crate::error::{Error, Result};
use crate::file;
use crate::model::Source;
use crate::progress::Progress;
use crate::specs;
use crate::store;

/// Summary of what a scrape run produced.
#[derive(Debug, Default)]
pub struct ScrapeSummary {
    pub files_written: Vec<(Source, PathBuf)>,
    pub failures: Vec<(Source, Error)>,
}

impl ScrapeSummary {
    /// Written files, or the first failure if any source failed.
    pub fn into_result(self) -> Result<Vec<PathBuf>> {
        match self.failures.into_iter().next() {
            Some((_, e)) => Err(e),
            None => Ok(self.files_written.into_iter().map(|(_, p)| p).collect()),
        }
    }
}

/// Run one adapter end to end. Nothing is written unless the crawl succeeds.
pub fn scrape_source(
    opts: &AppOptions,
    source: Source,
    launcher: &mut dyn Launcher,
    progress: &mut dyn Progress,
) -> Result<PathBuf> {
    let spec = specs::spec_for(source);
    let settings = CrawlSettings::from_options(spec, &opts.scrape);
    let out = crawl(spec, launcher, &settings, progress)?;

    let table = store::raw_dataset(source, spec.columns, &out.reviews, &out.totals);
    let path = file::raw_path(&opts.out_dir, source, &opts.hotel);
    store::save_dataset(&path, &table)?;
    logf!("{source}: wrote {} rows to {}", table.len(), path.display());
    Ok(path)
}

/// Run adapters one after another under a keep-awake guard. A failed source
/// does not stop the others.
pub fn scrape(
    opts: &AppOptions,
    sources: &[Source],
    launcher: &mut dyn Launcher,
    progress: &mut dyn Progress,
) -> ScrapeSummary {
    let _awake = if opts.scrape.keep_awake {
        KeepAwake::acquire("scraping hotel reviews")
    } else {
        KeepAwake::disabled()
    };

    let mut summary = ScrapeSummary::default();
    for &source in sources {
        match scrape_source(opts, source, launcher, progress) {
            Ok(path) => {
                progress.log(&format!("{source}: saved {}", path.display()));
                summary.files_written.push((source, path));
            }
            Err(e) => {
                loge!("{source}: {e}");
                progress.log(&format!("{source}: failed: {e}"));
                summary.failures.push((source, e));
            }
        }
    }
    summary
}

/// What the cleaning stage did.
#[derive(Debug)]
pub struct CleanSummary {
    pub sources: Vec<NormalizeReport>,
    pub missing: Vec<Source>,
    pub reconcile: ReconcileReport,
    pub written: PathBuf,
}

impl fmt::Display for CleanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for source in &self.missing {
            writeln!(f, "{source}: no raw file, skipped")?;
        }
        for report in &self.sources {
            writeln!(f, "{report}")?;
        }
        writeln!(f, "{}", self.reconcile)?;
        write!(f, "Saved {}", self.written.display())
    }
}

/// Normalize every raw file present, reconcile, and write `cleaned_reviews.csv`.
pub fn clean(opts: &AppOptions, progress: &mut dyn Progress) -> Result<CleanSummary> {
    progress.begin("clean");
    let mut tables = Vec::new();
    let mut sources = Vec::new();
    let mut missing = Vec::new();

    for source in Source::ALL {
        let path = file::raw_path(&opts.out_dir, source, &opts.hotel);
        if !path.exists() {
            logw!("{source}: {} not found, skipping", path.display());
            missing.push(source);
            continue;
        }
        let raw = store::load_dataset(&path)?;
        let (rows, report) = normalize(profile_for(source), &raw, &path)?;
        progress.log(&report.to_string());
        tables.push(rows);
        sources.push(report);
    }

    if tables.is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("no raw review files in {}", opts.out_dir.display()),
        )
        .into());
    }

    let (cleaned, reconcile) = reconcile(tables, opts.clean.cutoff);
    let written = file::cleaned_path(&opts.out_dir);
    store::save_dataset(&written, &store::clean_dataset(&cleaned))?;
    logf!("clean: wrote {} rows to {}", cleaned.len(), written.display());
    progress.finish();

    Ok(CleanSummary { sources, missing, reconcile, written })
}
