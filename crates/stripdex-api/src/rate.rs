//! Token-bucket rate limiting.
//!
//! One process-global bucket exists per distinct configured rate, shared by
//! every request on routes wired to that rate. Burst is fixed at one token
//! to avoid a start-up spike.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

static LIMITERS: LazyLock<Mutex<HashMap<u32, Arc<RateLimiter>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Fetch (or create) the shared limiter for a rate.
pub fn shared(rps: u32) -> Arc<RateLimiter> {
    let mut limiters = LIMITERS.lock();
    limiters
        .entry(rps)
        .or_insert_with(|| Arc::new(RateLimiter::new(rps)))
        .clone()
}

struct Bucket {
    tokens: f64,
    last: Instant,
}

/// A token bucket refilling at `rps` tokens per second with capacity one.
pub struct RateLimiter {
    rps: u32,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    pub fn new(rps: u32) -> Self {
        Self {
            rps,
            bucket: Mutex::new(Bucket {
                tokens: 1.0,
                last: Instant::now(),
            }),
        }
    }

    /// Wait until a token is available, then take it. Callers bound the wait
    /// with their own timeout.
    pub async fn wait(&self) {
        loop {
            let delay = {
                let mut bucket = self.bucket.lock();
                let now = Instant::now();
                let elapsed = now.duration_since(bucket.last).as_secs_f64();
                bucket.tokens = (bucket.tokens + elapsed * f64::from(self.rps)).min(1.0);
                bucket.last = now;

                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    return;
                }
                Duration::from_secs_f64((1.0 - bucket.tokens) / f64::from(self.rps))
            };
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn burst_of_one_passes_immediately() {
        let limiter = RateLimiter::new(1);
        let started = Instant::now();
        limiter.wait().await;
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn sustained_load_is_paced() {
        let limiter = RateLimiter::new(20);
        let started = Instant::now();
        // First token is free, the remaining four refill at 20/s.
        for _ in 0..5 {
            limiter.wait().await;
        }
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(180), "elapsed: {elapsed:?}");
    }

    #[tokio::test]
    async fn registry_shares_buckets_per_rate() {
        let a = shared(42);
        let b = shared(42);
        let c = shared(43);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
