use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

use crate::auth::repo::SessionRepo;
use crate::auth::repo_types::{NewSession, UserSummary};
use crate::db::Insert;
use crate::error::AppError;

/// Token entropy before base64 (32 bytes -> 43 url-safe chars).
const TOKEN_BYTES: usize = 32;
const MAX_TOKEN_ATTEMPTS: usize = 3;

pub const DEFAULT_SESSION_TTL: Duration = Duration::days(30);

/// Opaque bearer sessions. Expiry is checked lazily on every resolve.
#[derive(Clone)]
pub struct SessionStore {
    repo: Arc<dyn SessionRepo>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(repo: Arc<dyn SessionRepo>, ttl: Duration) -> Self {
        Self { repo, ttl }
    }

    pub async fn create_session(&self, user_id: i64) -> Result<String, AppError> {
        self.create_session_at(user_id, OffsetDateTime::now_utc()).await
    }

    pub async fn create_session_at(
        &self,
        user_id: i64,
        now: OffsetDateTime,
    ) -> Result<String, AppError> {
        let expires_at = now.checked_add(self.ttl).ok_or_else(|| {
            AppError::Storage(anyhow::anyhow!("session expiry out of range (ttl {})", self.ttl))
        })?;
        for _ in 0..MAX_TOKEN_ATTEMPTS {
            let token = generate_token();
            let session = NewSession {
                user_id,
                token: token.clone(),
                created_at: now,
                expires_at,
            };
            match self.repo.insert_session(session).await? {
                Insert::Created(session_id) => {
                    debug!(user_id, session_id, "session created");
                    return Ok(token);
                }
                Insert::Conflict => warn!(user_id, "session token collision, regenerating"),
            }
        }
        Err(AppError::Storage(anyhow::anyhow!(
            "no unique session token after {MAX_TOKEN_ATTEMPTS} attempts"
        )))
    }

    /// `None` for unknown, revoked or expired tokens, and for inactive owners.
    pub async fn resolve(&self, token: &str) -> Result<Option<UserSummary>, AppError> {
        self.resolve_at(token, OffsetDateTime::now_utc()).await
    }

    pub async fn resolve_at(
        &self,
        token: &str,
        now: OffsetDateTime,
    ) -> Result<Option<UserSummary>, AppError> {
        if token.is_empty() {
            return Ok(None);
        }
        Ok(self.repo.find_user_by_token(token, now).await?)
    }

    /// Revoke a session. Unknown or already revoked tokens are a no-op.
    pub async fn invalidate(&self, token: &str) -> Result<(), AppError> {
        let revoked = self.repo.deactivate(token).await?;
        debug!(revoked, "session invalidated");
        Ok(())
    }

    /// Delete expired and revoked rows. Returns how many were removed.
    pub async fn purge_expired(&self) -> Result<u64, AppError> {
        Ok(self.repo.purge_expired(OffsetDateTime::now_utc()).await?)
    }
}

pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
