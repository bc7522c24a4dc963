// src/browser/profile.rs
use std::fs;
use std::path::{Path, PathBuf};
use std::thread::sleep;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::config::consts::{PROFILE_CLEAR_ATTEMPTS, PROFILE_CLEAR_PAUSE_MS};

/// Chrome leaves this behind when it dies without a clean shutdown.
const SINGLETON_LOCK: &str = "SingletonLock";

/// A clean profile directory for a new run.
///
/// Tries to wipe `base` a few times; when something still holds it, falls back to
/// a unique sibling `<base>_<unix-secs>`.
pub fn fresh(base: &Path) -> PathBuf {
    for attempt in 1..=PROFILE_CLEAR_ATTEMPTS {
        match fs::remove_dir_all(base) {
            Ok(()) => return base.to_path_buf(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return base.to_path_buf(),
            Err(e) => {
                logw!("profile: cannot clear {} (attempt {attempt}): {e}", base.display());
                if attempt < PROFILE_CLEAR_ATTEMPTS {
                    sleep(Duration::from_millis(PROFILE_CLEAR_PAUSE_MS));
                }
            }
        }
    }
    let dir = unique(base);
    logf!("profile: using fallback directory {}", dir.display());
    dir
}

/// The directory to relaunch with after a lost session: `current` when it can be
/// reused, otherwise a fresh unique one next to `base`.
pub fn reuse_or_fallback(current: &Path, base: &Path) -> PathBuf {
    if is_reusable(current) {
        return current.to_path_buf();
    }
    let dir = unique(base);
    logw!("profile: {} is locked or unreadable, switching to {}", current.display(), dir.display());
    dir
}

/// Readable (or not yet created), and free of a stale singleton lock.
pub fn is_reusable(dir: &Path) -> bool {
    if !dir.exists() {
        return true;
    }
    if fs::read_dir(dir).is_err() {
        return false;
    }
    let lock = dir.join(SINGLETON_LOCK);
    // The lock is usually a dangling symlink, so `exists()` would miss it.
    if fs::symlink_metadata(&lock).is_ok() {
        return fs::remove_file(&lock).is_ok();
    }
    true
}

/// `<base>_<unix-secs>`, bumped with a counter if that name is taken.
pub fn unique(base: &Path) -> PathBuf {
    let secs = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
    let stem = format!("{}_{secs}", base.display());
    let mut dir = PathBuf::from(&stem);
    let mut n = 1;
    while dir.exists() {
        dir = PathBuf::from(format!("{stem}_{n}"));
        n += 1;
    }
    dir
}
