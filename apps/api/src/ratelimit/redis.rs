//! Redis-backed fixed-window counter store.
//!
//! `INCR` gives an atomic increment shared across worker processes; the key
//! TTL (`PEXPIRE`, set on the first hit of each window) is the window reset.
//! This is the backend to use when the service runs as multiple OS processes,
//! where in-process memory would over-admit by a worker-count factor.
//!
//! On a Redis transport error the limiter fails open and admits the request;
//! admission must still return a definite decision when Redis is unreachable.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::warn;

use super::{RateDecision, RateLimitKey, RateLimiter};

pub struct RedisRateLimiter {
    conn: MultiplexedConnection,
}

impl RedisRateLimiter {
    /// Opens the client and establishes the shared multiplexed connection.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self { conn })
    }

    async fn try_admit(
        &self,
        key: &RateLimitKey,
        limit: u32,
        window: Duration,
    ) -> redis::RedisResult<RateDecision> {
        let mut conn = self.conn.clone();
        let cache_key = key.cache_key();

        let count: i64 = conn.incr(&cache_key, 1).await?;
        if count == 1 {
            // First hit of this window: arm the expiry that resets the counter.
            let _: bool = conn
                .pexpire(&cache_key, window.as_millis() as i64)
                .await?;
        }

        Ok(if count <= i64::from(limit) {
            RateDecision {
                allowed: true,
                remaining: limit - count as u32,
            }
        } else {
            RateDecision {
                allowed: false,
                remaining: 0,
            }
        })
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn admit(&self, key: &RateLimitKey, limit: u32, window: Duration) -> RateDecision {
        match self.try_admit(key, limit, window).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!(action = key.action, "rate limiter Redis error, admitting: {e}");
                RateDecision {
                    allowed: true,
                    remaining: limit.saturating_sub(1),
                }
            }
        }
    }
}
