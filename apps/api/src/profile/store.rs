//! Profile persistence gateway.
//!
//! The store is insert-only, keyed by normalized email: a profile is never
//! upserted, and a uniqueness collision is swallowed into a generic success
//! at the HTTP layer. The `SaveOutcome` distinction exists solely for
//! internal logging — it must never shape the response, or an outside caller
//! could probe which email addresses already have profiles.
//!
//! Expected table:
//!
//! ```sql
//! CREATE TABLE candidate_profiles (
//!     id         UUID PRIMARY KEY,
//!     email      TEXT NOT NULL UNIQUE,
//!     first_name TEXT NOT NULL,
//!     last_name  TEXT NOT NULL,
//!     phone      TEXT,
//!     city       TEXT,
//!     region     TEXT,
//!     profile    JSONB NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL
//! );
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::models::CandidateProfile;

/// Lowercased, trimmed form used as the store key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// The immutable snapshot handed to the store.
#[derive(Debug, Clone)]
pub struct StoredProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub profile: CandidateProfile,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Inserted,
    /// An entry with this email already existed; nothing was written.
    DuplicateSuppressed,
}

/// Insert-only profile store. Carried in `AppState` as `Arc<dyn ProfileStore>`
/// so handlers never depend on a concrete backend.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn save(&self, profile: &StoredProfile) -> anyhow::Result<SaveOutcome>;
}

pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn save(&self, profile: &StoredProfile) -> anyhow::Result<SaveOutcome> {
        // Insert-only: ON CONFLICT DO NOTHING, never DO UPDATE. The existing
        // profile stays untouched and the collision is reported to the caller
        // of this trait only.
        let result = sqlx::query(
            r#"
            INSERT INTO candidate_profiles
                (id, email, first_name, last_name, phone, city, region, profile, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(profile.id)
        .bind(&profile.email)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.phone)
        .bind(&profile.city)
        .bind(&profile.region)
        .bind(serde_json::to_value(&profile.profile)?)
        .bind(profile.created_at)
        .execute(&self.pool)
        .await?;

        Ok(if result.rows_affected() == 0 {
            SaveOutcome::DuplicateSuppressed
        } else {
            SaveOutcome::Inserted
        })
    }
}

/// In-memory store for handler tests.
#[cfg(test)]
pub struct MemoryProfileStore {
    profiles: std::sync::Mutex<std::collections::HashMap<String, StoredProfile>>,
}

#[cfg(test)]
impl MemoryProfileStore {
    pub fn new() -> Self {
        Self {
            profiles: std::sync::Mutex::new(std::collections::HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.profiles.lock().unwrap().len()
    }
}

#[cfg(test)]
#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn save(&self, profile: &StoredProfile) -> anyhow::Result<SaveOutcome> {
        let mut profiles = self.profiles.lock().unwrap();
        if profiles.contains_key(&profile.email) {
            return Ok(SaveOutcome::DuplicateSuppressed);
        }
        profiles.insert(profile.email.clone(), profile.clone());
        Ok(SaveOutcome::Inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email_trims_and_lowercases() {
        assert_eq!(
            normalize_email("  Jane.Doe@Example.ORG "),
            "jane.doe@example.org"
        );
    }

    #[test]
    fn test_normalize_email_idempotent() {
        let once = normalize_email("Jane@Example.org");
        assert_eq!(normalize_email(&once), once);
    }

    #[tokio::test]
    async fn test_memory_store_is_insert_only() {
        let store = MemoryProfileStore::new();
        let profile = StoredProfile {
            id: Uuid::new_v4(),
            email: "jane@example.org".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            phone: None,
            city: None,
            region: None,
            profile: CandidateProfile::default(),
            created_at: Utc::now(),
        };

        assert_eq!(store.save(&profile).await.unwrap(), SaveOutcome::Inserted);

        let second = StoredProfile {
            id: Uuid::new_v4(),
            first_name: "Janet".to_string(),
            ..profile.clone()
        };
        assert_eq!(
            store.save(&second).await.unwrap(),
            SaveOutcome::DuplicateSuppressed
        );
        assert_eq!(store.len(), 1);
    }
}
