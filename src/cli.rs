// src/cli.rs
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::browser::chrome::ChromeLauncher;
use crate::config::options::AppOptions;
use crate::error::Result;
use crate::model::Source;
use crate::progress::ConsoleProgress;
use crate::runner;

#[derive(Debug, Parser)]
#[command(name = "review_scrape", version, about = "Scrape, clean and reconcile hotel reviews")]
pub struct Cli {
    /// TOML config file (default: ./review_scrape.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Hotel tag used in raw file names
    #[arg(long, global = true)]
    pub hotel: Option<String>,

    /// Output directory for raw and cleaned files
    #[arg(short, long, global = true)]
    pub out: Option<PathBuf>,

    /// Log filter (e.g. info, debug, review_scrape=trace); RUST_LOG wins
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Do not write the plain-text log file
    #[arg(long, global = true)]
    pub no_log_file: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run site adapter(s) and write <site>_reviews_<hotel>.csv
    Scrape {
        #[arg(value_enum)]
        site: Site,
        #[command(flatten)]
        browser: BrowserArgs,
    },
    /// Normalize the raw files, reconcile, and write cleaned_reviews.csv
    Clean {
        #[command(flatten)]
        clean: CleanArgs,
    },
    /// Scrape every site, then clean
    Run {
        #[command(flatten)]
        browser: BrowserArgs,
        #[command(flatten)]
        clean: CleanArgs,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Site {
    Booking,
    Expedia,
    Tripadvisor,
    All,
}

impl Site {
    pub fn sources(self) -> Vec<Source> {
        match self {
            Site::Booking => vec![Source::Booking],
            Site::Expedia => vec![Source::Expedia],
            Site::Tripadvisor => vec![Source::TripAdvisor],
            Site::All => Source::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Args)]
pub struct BrowserArgs {
    /// Run Chrome without a window
    #[arg(long)]
    pub headless: bool,
    /// Skip the randomized human-like pauses
    #[arg(long)]
    pub no_pacing: bool,
    /// Let the machine sleep during the run
    #[arg(long)]
    pub allow_sleep: bool,
}

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Keep reviews dated on or after this day (YYYY-MM-DD)
    #[arg(long)]
    pub cutoff: Option<NaiveDate>,
}

impl Cli {
    /// Config file first, then flags on top.
    pub fn options(&self) -> Result<AppOptions> {
        let mut opts = AppOptions::load(self.config.as_deref())?;
        if let Some(h) = &self.hotel { opts.hotel = h.clone(); }
        if let Some(o) = &self.out { opts.out_dir = o.clone(); }
        if let Some(l) = &self.log_level { opts.log.level = l.clone(); }
        if self.no_log_file { opts.log.file = None; }

        match &self.command {
            Command::Scrape { browser, .. } => browser.apply(&mut opts),
            Command::Clean { clean } => clean.apply(&mut opts),
            Command::Run { browser, clean } => {
                browser.apply(&mut opts);
                clean.apply(&mut opts);
            }
        }
        Ok(opts)
    }
}

impl BrowserArgs {
    fn apply(&self, opts: &mut AppOptions) {
        if self.headless { opts.scrape.headless = true; }
        if self.no_pacing { opts.scrape.human_pacing = false; }
        if self.allow_sleep { opts.scrape.keep_awake = false; }
    }
}

impl CleanArgs {
    fn apply(&self, opts: &mut AppOptions) {
        if let Some(c) = self.cutoff { opts.clean.cutoff = c; }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let opts = cli.options()?;
    crate::log::init(&opts.log.level, opts.log.file.as_deref())?;
    logd!("options: {opts:?}");

    let mut progress = ConsoleProgress::default();
    let mut launcher = ChromeLauncher::new(opts.scrape.headless, opts.scrape.user_agent.clone());

    match cli.command {
        Command::Scrape { site, .. } => {
            runner::scrape(&opts, &site.sources(), &mut launcher, &mut progress).into_result()?;
        }
        Command::Clean { .. } => {
            let summary = runner::clean(&opts, &mut progress)?;
            println!("{summary}");
        }
        Command::Run { .. } => {
            let scraped = runner::scrape(&opts, &Source::ALL, &mut launcher, &mut progress);
            let cleaned = runner::clean(&opts, &mut progress);
            if let Ok(summary) = &cleaned {
                println!("{summary}");
            }
            // Scrape failures take precedence over clean failures.
            scraped.into_result()?;
            cleaned?;
        }
    }
    Ok(())
}
