//! Request admission control — fixed-window rate limiting.
//!
//! The counter store is behind a trait so single-process deployments can use
//! in-process memory while multi-process deployments share a Redis counter.
//! `AppState` holds an `Arc<dyn RateLimiter>`, picked at startup via config.
//!
//! Admission never fails: `admit` always returns a definite allow/deny
//! decision. A denial is a retryable condition for the caller
//! (`AppError::RateLimited` → 429), never an internal error.

pub mod memory;
pub mod redis;

use std::time::Duration;

use async_trait::async_trait;

pub use self::memory::MemoryRateLimiter;
pub use self::redis::RedisRateLimiter;

/// Default admission window.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(60_000);

/// Composite key: an action namespace plus a caller identity (peer address).
/// Limits are tracked independently per (action, identity) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateLimitKey {
    pub action: &'static str,
    pub identity: String,
}

impl RateLimitKey {
    pub fn new(action: &'static str, identity: impl Into<String>) -> Self {
        Self {
            action,
            identity: identity.into(),
        }
    }

    /// Flat key for stores that want a single string (Redis).
    pub fn cache_key(&self) -> String {
        format!("ratelimit:{}:{}", self.action, self.identity)
    }
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    /// Requests left in the current window (0 when denied).
    pub remaining: u32,
}

/// Fixed-window admission control.
///
/// Intentionally approximate: up to `limit` requests can land on each side of
/// a window boundary in quick succession. That burst is the price of O(1)
/// memory per key and no cross-request coordination, and is acceptable for an
/// abuse-deterrence control (this is not a billing-grade quota).
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn admit(&self, key: &RateLimitKey, limit: u32, window: Duration) -> RateDecision;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_includes_action_and_identity() {
        let key = RateLimitKey::new("save-profile", "203.0.113.9");
        assert_eq!(key.cache_key(), "ratelimit:save-profile:203.0.113.9");
    }

    #[test]
    fn test_same_identity_different_action_distinct_keys() {
        let a = RateLimitKey::new("save-profile", "203.0.113.9");
        let b = RateLimitKey::new("parse-document", "203.0.113.9");
        assert_ne!(a, b);
        assert_ne!(a.cache_key(), b.cache_key());
    }
}
