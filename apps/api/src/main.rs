mod config;
mod db;
mod errors;
mod intake;
mod profile;
mod ratelimit;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::profile::store::PgProfileStore;
use crate::ratelimit::{MemoryRateLimiter, RateLimiter, RedisRateLimiter};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareMatch intake API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Admission control: shared Redis counters when configured, otherwise
    // in-process fixed windows (per-process approximation).
    let limiter: Arc<dyn RateLimiter> = match &config.redis_url {
        Some(url) => match RedisRateLimiter::connect(url).await {
            Ok(limiter) => {
                info!("Rate limiter: shared Redis counter store");
                Arc::new(limiter)
            }
            Err(e) => {
                warn!("Redis unavailable ({e}); falling back to in-process rate limiting");
                Arc::new(MemoryRateLimiter::new())
            }
        },
        None => {
            info!("Rate limiter: in-process fixed windows");
            Arc::new(MemoryRateLimiter::new())
        }
    };

    // Best-effort upload archival (S3 / MinIO), only when configured
    let s3 = if config.archival_enabled() {
        let client = build_s3_client(&config).await;
        info!("Upload archival enabled");
        Some(client)
    } else {
        info!("Upload archival disabled (no S3 configuration)");
        None
    };

    let store = Arc::new(PgProfileStore::new(db.clone()));

    let state = AppState {
        db,
        config: config.clone(),
        limiter,
        store,
        s3,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    // Connect-info lets handlers key rate limits on the peer address.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        config.aws_access_key_id.clone().unwrap_or_default(),
        config.aws_secret_access_key.clone().unwrap_or_default(),
        None,
        None,
        "carematch-static",
    );

    let endpoint = config.s3_endpoint.clone().unwrap_or_default();
    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
