//! Retry timing for uploads: per-attempt timeouts and jittered backoff.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

/// Attempt count and timeout growth for one upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Timeout for the first attempt; attempt `i` gets `base_timeout * (i + 1)`.
    pub base_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_timeout: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn timeout_for(&self, attempt: u32) -> Duration {
        self.base_timeout * (attempt + 1)
    }

    /// Delay before retrying after `attempt` failed: `2^attempt + jitter` seconds.
    pub fn backoff_delay(&self, attempt: u32, jitter: f64) -> Duration {
        let base = 2u64.saturating_pow(attempt) as f64;
        Duration::from_secs_f64(base + jitter.clamp(0.0, 1.0))
    }

    /// Whether another attempt follows `attempt`.
    pub fn has_next(&self, attempt: u32) -> bool {
        attempt + 1 < self.max_attempts
    }
}

/// Waits between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Source of backoff jitter in `[0, 1)`.
pub trait Jitter: Send + Sync {
    fn sample(&self) -> f64;
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

pub struct RandomJitter;

impl Jitter for RandomJitter {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen_range(0.0..1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_grow_linearly() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.timeout_for(0), Duration::from_secs(5));
        assert_eq!(policy.timeout_for(1), Duration::from_secs(10));
        assert_eq!(policy.timeout_for(2), Duration::from_secs(15));
    }

    #[test]
    fn backoff_doubles_and_adds_jitter() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_delay(0, 0.0), Duration::from_secs(1));
        assert_eq!(policy.backoff_delay(1, 0.0), Duration::from_secs(2));
        assert_eq!(policy.backoff_delay(1, 0.5), Duration::from_millis(2500));
        assert!(policy.backoff_delay(1, 0.0) >= policy.backoff_delay(0, 0.99));
    }

    #[test]
    fn no_attempt_follows_the_last() {
        let policy = RetryPolicy::default();
        assert!(policy.has_next(0));
        assert!(policy.has_next(1));
        assert!(!policy.has_next(2));
    }

    #[test]
    fn random_jitter_stays_in_unit_interval() {
        for _ in 0..100 {
            let sample = RandomJitter.sample();
            assert!((0.0..1.0).contains(&sample));
        }
    }
}
