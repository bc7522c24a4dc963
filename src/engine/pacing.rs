// src/engine/pacing.rs
use std::thread::sleep;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::Delay;
use crate::config::consts::HUMAN_SCROLL_PX;

/// Randomized, blocking pauses between browser actions.
///
/// `instant()` keeps the same call sites but never sleeps, which is what tests
/// and `human_pacing = false` runs use.
pub struct Pacer {
    enabled: bool,
    rng: StdRng,
}

impl Pacer {
    pub fn human() -> Self {
        Self { enabled: true, rng: StdRng::from_entropy() }
    }

    pub fn instant() -> Self {
        Self { enabled: false, rng: StdRng::seed_from_u64(0) }
    }

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::human() } else { Self::instant() }
    }

    pub fn pause(&mut self, delay: Delay) {
        if !self.enabled {
            return;
        }
        let (lo, hi) = (delay.min_ms.min(delay.max_ms), delay.min_ms.max(delay.max_ms));
        sleep(Duration::from_millis(self.rng.gen_range(lo..=hi)));
    }

    pub fn wait(&mut self, d: Duration) {
        if self.enabled {
            sleep(d);
        }
    }

    /// Pixel delta for one human-like window scroll.
    pub fn scroll_delta(&mut self) -> i64 {
        let (lo, hi) = HUMAN_SCROLL_PX;
        self.rng.gen_range(lo..=hi)
    }
}
