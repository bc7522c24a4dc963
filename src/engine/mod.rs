// src/engine/mod.rs
pub mod engine;
pub mod extract;
pub mod pacing;
pub mod recovery;
pub mod types;

pub use engine::{crawl, CrawlSettings, ScrapeOutput};
pub use extract::{extract_page, PageExtract};
