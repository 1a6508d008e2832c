//! Exponential backoff with jitter while every pool is exhausted.

use rand::Rng;
use std::time::Duration;
use tokio::time::Instant;

use crate::config::BackoffConfig;

/// Calculate exponential backoff delay with jitter.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let delay_ms = base_ms.saturating_mul(2u64.saturating_pow(attempt - 1)).min(max_ms);

    // 0-10% jitter on top.
    let jitter_range = delay_ms / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(delay_ms + jitter)
}

/// Tracks consecutive exhausted cycles and when the next one may run.
#[derive(Debug)]
pub struct ExhaustionBackoff {
    config: BackoffConfig,
    streak: u32,
    resume_at: Option<Instant>,
}

impl ExhaustionBackoff {
    pub fn new(config: BackoffConfig) -> Self {
        Self {
            config,
            streak: 0,
            resume_at: None,
        }
    }

    /// Whether a scheduled cycle should be skipped right now.
    pub fn should_wait(&self, now: Instant) -> bool {
        matches!(self.resume_at, Some(at) if now < at)
    }

    /// Record a cycle outcome. Returns the delay applied, if any.
    pub fn record(&mut self, exhausted: bool, now: Instant) -> Option<Duration> {
        if !exhausted {
            self.streak = 0;
            self.resume_at = None;
            return None;
        }
        self.streak = self.streak.saturating_add(1);
        if !self.config.enabled {
            return None;
        }
        let delay = calculate_backoff(self.streak, self.config.base_delay_ms, self.config.max_delay_ms);
        self.resume_at = Some(now + delay);
        Some(delay)
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }
}
