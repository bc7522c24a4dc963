// src/config/consts.rs

// Target
pub const DEFAULT_HOTEL: &str = "Boulan";

// Output
pub const DEFAULT_OUT_DIR: &str = "out";
pub const CLEANED_FILE: &str = "cleaned_reviews.csv";
pub const CONFIG_FILE: &str = "review_scrape.toml";

// Local log
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = "debug.log";
pub const LOG_LEVEL: &str = "info";

// Browser
pub const PROFILE_DIR_NAME: &str = "review_scrape_profile";
pub const PROFILE_CLEAR_ATTEMPTS: u32 = 3;
pub const PROFILE_CLEAR_PAUSE_MS: u64 = 1_000;
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";
pub const WINDOW_SIZE: (u32, u32) = (1366, 900);
pub const BROWSER_IDLE_TIMEOUT_SECS: u64 = 600;

// Human-like warm-up before touching the page
pub const HUMAN_SCROLL_STEPS: u32 = 5;
pub const HUMAN_SCROLL_PX: (i64, i64) = (200, 400);

// Page-level retry
pub const PAGE_ATTEMPTS: u32 = 2;
pub const RETRY_BACKOFF_MS: u64 = 2_000;

// Cleaning
pub const DATE_CUTOFF: (i32, u32, u32) = (2014, 1, 1);
