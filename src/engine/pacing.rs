use std::time::Duration;

use anyhow::Result;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::page::Page;

/// Random human-like delays between micro-actions. Pacing only; nothing
/// relies on these for ordering.
pub struct Pacer {
    rng: SmallRng,
}

impl Pacer {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// A duration drawn uniformly from `lo_ms..=hi_ms`.
    pub fn between(&mut self, lo_ms: u64, hi_ms: u64) -> Duration {
        Duration::from_millis(self.rng.gen_range(lo_ms..=hi_ms))
    }

    pub fn jitter(&mut self, page: &mut dyn Page, lo_ms: u64, hi_ms: u64) {
        let d = self.between(lo_ms, hi_ms);
        page.pause(d);
    }

    /// Per-character typing delay.
    pub fn keystroke(&mut self) -> Duration {
        self.between(60, 120)
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounded polling: up to `attempts` checks, `interval` apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl RetryPolicy {
    /// Covers roughly `total` at `interval` granularity.
    pub fn within(total: Duration, interval: Duration) -> Self {
        let attempts = (total.as_millis() / interval.as_millis().max(1)) as u32;
        Self {
            attempts: attempts.max(1),
            interval,
        }
    }

    /// Submit buttons lag behind typed input.
    pub fn submit_enable() -> Self {
        Self::within(Duration::from_secs(3), Duration::from_millis(50))
    }

    /// Poll `check` until it returns true. `Ok(false)` once the attempts run
    /// out.
    pub fn wait_until(
        &self,
        page: &mut dyn Page,
        mut check: impl FnMut(&mut dyn Page) -> Result<bool>,
    ) -> Result<bool> {
        for attempt in 0..self.attempts {
            if check(&mut *page)? {
                return Ok(true);
            }
            if attempt + 1 < self.attempts {
                page.pause(self.interval);
            }
        }
        Ok(false)
    }
}
