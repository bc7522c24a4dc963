// src/config/options.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;

use super::consts::*;
use crate::error::{Error, Result};
use crate::model::Source;

/// Everything a run can be configured with. Loaded from TOML, then overridden by CLI flags.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppOptions {
    /// Hotel tag used in raw file names.
    pub hotel: String,
    pub out_dir: PathBuf,
    pub scrape: ScrapeOptions,
    pub clean: CleanOptions,
    pub log: LogOptions,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            hotel: s!(DEFAULT_HOTEL),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            scrape: ScrapeOptions::default(),
            clean: CleanOptions::default(),
            log: LogOptions::default(),
        }
    }
}

impl AppOptions {
    /// Explicit path: must exist and parse. No path: `review_scrape.toml` if present, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(CONFIG_FILE), false),
        };
        if !required && !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_toml(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScrapeOptions {
    pub headless: bool,
    /// Randomized human-like delays; off means no sleeping at all.
    pub human_pacing: bool,
    pub keep_awake: bool,
    pub profile_dir: PathBuf,
    /// Attempts per page before the page is skipped.
    pub retries: u32,
    pub backoff_ms: u64,
    pub user_agent: String,
    pub urls: UrlOverrides,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            headless: false,
            human_pacing: true,
            keep_awake: true,
            profile_dir: std::env::temp_dir().join(PROFILE_DIR_NAME),
            retries: PAGE_ATTEMPTS,
            backoff_ms: RETRY_BACKOFF_MS,
            user_agent: s!(USER_AGENT),
            urls: UrlOverrides::default(),
        }
    }
}

impl ScrapeOptions {
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

/// Point a site at a different listing page (same markup, different hotel).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UrlOverrides {
    pub booking: Option<String>,
    pub expedia: Option<String>,
    pub tripadvisor: Option<String>,
}

impl UrlOverrides {
    pub fn get(&self, source: Source) -> Option<&str> {
        match source {
            Source::Booking => self.booking.as_deref(),
            Source::Expedia => self.expedia.as_deref(),
            Source::TripAdvisor => self.tripadvisor.as_deref(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CleanOptions {
    /// Inclusive lower bound on `review_date`.
    pub cutoff: NaiveDate,
}

impl Default for CleanOptions {
    fn default() -> Self {
        let (y, m, d) = DATE_CUTOFF;
        Self { cutoff: NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogOptions {
    pub level: String,
    /// Plain-text log sink; `None` disables it.
    pub file: Option<PathBuf>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: s!(LOG_LEVEL),
            file: Some(PathBuf::from(STORE_DIR).join(LOG_FILE)),
        }
    }
}
