use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::profile::contact::is_email_shaped;
use crate::profile::models::CandidateProfile;
use crate::profile::store::{normalize_email, SaveOutcome, StoredProfile};
use crate::ratelimit::{RateLimitKey, DEFAULT_WINDOW};
use crate::state::AppState;

pub const SAVE_PROFILE_ACTION: &str = "save-profile";
pub const SAVE_PROFILE_LIMIT: u32 = 10;

#[derive(Debug, Deserialize)]
pub struct SaveProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile: CandidateProfile,
}

#[derive(Debug, Serialize)]
pub struct SaveProfileResponse {
    pub message: String,
}

/// POST /api/v1/profiles/save
///
/// Accepts the caller-reviewed profile plus identity fields. The response is
/// byte-identical for a fresh insert and a duplicate-email collision: the
/// endpoint must not leak whether an email already has a stored profile.
pub async fn handle_save_profile(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(req): Json<SaveProfileRequest>,
) -> Result<Json<SaveProfileResponse>, AppError> {
    if req.first_name.trim().is_empty() || req.last_name.trim().is_empty() {
        return Err(AppError::Validation(
            "first_name and last_name are required".to_string(),
        ));
    }
    if !is_email_shaped(&req.email) {
        return Err(AppError::Validation(
            "email must be a valid email address".to_string(),
        ));
    }

    let key = RateLimitKey::new(SAVE_PROFILE_ACTION, addr.ip().to_string());
    let decision = state
        .limiter
        .admit(&key, SAVE_PROFILE_LIMIT, DEFAULT_WINDOW)
        .await;
    if !decision.allowed {
        return Err(AppError::RateLimited);
    }

    let stored = StoredProfile {
        id: Uuid::new_v4(),
        email: normalize_email(&req.email),
        first_name: req.first_name.trim().to_string(),
        last_name: req.last_name.trim().to_string(),
        phone: req.profile.contact.phone.clone(),
        city: req.profile.contact.city.clone(),
        region: req.profile.contact.region.clone(),
        profile: req.profile,
        created_at: Utc::now(),
    };

    match state.store.save(&stored).await.map_err(AppError::Internal)? {
        SaveOutcome::Inserted => {
            info!(profile_id = %stored.id, "candidate profile saved");
        }
        SaveOutcome::DuplicateSuppressed => {
            // Internal log only — the response below stays indistinguishable.
            info!("duplicate profile submission suppressed");
        }
    }

    Ok(Json(SaveProfileResponse {
        message: "Profile received. Our team will review it and reach out.".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::profile::store::MemoryProfileStore;
    use crate::ratelimit::MemoryRateLimiter;
    use crate::routes::build_router;

    fn test_state() -> AppState {
        AppState {
            db: sqlx::PgPool::connect_lazy("postgres://postgres@localhost/test")
                .expect("lazy pool"),
            config: Config {
                database_url: "postgres://postgres@localhost/test".to_string(),
                redis_url: None,
                s3_bucket: None,
                s3_endpoint: None,
                aws_access_key_id: None,
                aws_secret_access_key: None,
                port: 0,
                rust_log: "info".to_string(),
            },
            limiter: Arc::new(MemoryRateLimiter::new()),
            store: Arc::new(MemoryProfileStore::new()),
            s3: None,
        }
    }

    fn save_request(email: &str) -> Request<Body> {
        let body = serde_json::json!({
            "first_name": "Jane",
            "last_name": "Doe",
            "email": email,
            "profile": CandidateProfile::default(),
        });
        Request::builder()
            .method("POST")
            .uri("/api/v1/profiles/save")
            .header(header::CONTENT_TYPE, "application/json")
            .extension(ConnectInfo(SocketAddr::from(([203, 0, 113, 9], 40000))))
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn test_duplicate_email_indistinguishable_from_insert() {
        let app = build_router(test_state());

        let first = app
            .clone()
            .oneshot(save_request("Jane.Doe@Example.org"))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let first_body = body_bytes(first).await;

        let second = app
            .clone()
            .oneshot(save_request("  jane.doe@example.org "))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::OK);
        let second_body = body_bytes(second).await;

        assert_eq!(first_body, second_body);
    }

    #[tokio::test]
    async fn test_missing_name_is_schema_validation_error() {
        let app = build_router(test_state());
        let body = serde_json::json!({
            "first_name": "",
            "last_name": "Doe",
            "email": "jane@example.org",
            "profile": CandidateProfile::default(),
        });
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/profiles/save")
            .header(header::CONTENT_TYPE, "application/json")
            .extension(ConnectInfo(SocketAddr::from(([203, 0, 113, 9], 40000))))
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let app = build_router(test_state());
        let response = app.oneshot(save_request("not-an-email")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_eleventh_save_in_window_rate_limited() {
        let app = build_router(test_state());

        for i in 0..10 {
            let response = app
                .clone()
                .oneshot(save_request(&format!("jane{i}@example.org")))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "call {}", i + 1);
        }

        let response = app
            .oneshot(save_request("jane10@example.org"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
