//! In-process fixed-window counter store.
//!
//! Counters live for the life of the process and reset implicitly when their
//! window elapses. State is per-process: behind multiple workers each process
//! counts independently, which over-admits by a worker-count factor. Use the
//! Redis backend when that matters.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::{RateDecision, RateLimitKey, RateLimiter};

/// Map size at which expired counters are swept before inserting a new key.
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct WindowCounter {
    count: u32,
    window_start: Instant,
}

/// Fixed-window limiter backed by a mutex-guarded map.
///
/// The mutex makes each admission check an atomic read-modify-write; a naive
/// unguarded read-then-write would under-count under true parallelism.
pub struct MemoryRateLimiter {
    counters: Mutex<HashMap<RateLimitKey, WindowCounter>>,
}

impl MemoryRateLimiter {
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(HashMap::new()),
        }
    }

    fn check(&self, key: &RateLimitKey, limit: u32, window: Duration, now: Instant) -> RateDecision {
        let mut counters = self.counters.lock().expect("rate limiter mutex poisoned");

        if let Some(counter) = counters.get_mut(key) {
            if now.duration_since(counter.window_start) < window {
                counter.count += 1;
                return if counter.count <= limit {
                    RateDecision {
                        allowed: true,
                        remaining: limit - counter.count,
                    }
                } else {
                    RateDecision {
                        allowed: false,
                        remaining: 0,
                    }
                };
            }
        }

        // Window elapsed, or first observation of this key: reset to 1 and admit.
        if !counters.contains_key(key) && counters.len() >= SWEEP_THRESHOLD {
            counters.retain(|_, c| now.duration_since(c.window_start) < window);
        }
        counters.insert(
            key.clone(),
            WindowCounter {
                count: 1,
                window_start: now,
            },
        );
        RateDecision {
            allowed: true,
            remaining: limit.saturating_sub(1),
        }
    }
}

impl Default for MemoryRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateLimiter for MemoryRateLimiter {
    async fn admit(&self, key: &RateLimitKey, limit: u32, window: Duration) -> RateDecision {
        self.check(key, limit, window, Instant::now())
    }
}
