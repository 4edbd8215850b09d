use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::profile::store::ProfileStore;
use crate::ratelimit::RateLimiter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pool reserved for future read paths; the profile store holds its own clone.
    #[allow(dead_code)]
    pub db: PgPool,
    pub config: Config,
    /// Pluggable admission control. Default: in-process fixed window.
    /// `REDIS_URL` swaps in the shared Redis counter for multi-process deployments.
    pub limiter: Arc<dyn RateLimiter>,
    /// Pluggable profile store. Insert-only by contract — see `profile::store`.
    pub store: Arc<dyn ProfileStore>,
    /// S3 client for best-effort upload archival. `None` when archival is disabled.
    pub s3: Option<S3Client>,
}
