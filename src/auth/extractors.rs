use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::{debug, warn};

use crate::auth::repo_types::UserSummary;
use crate::error::AppError;
use crate::state::AppState;

/// Resolves the bearer session token to the user it belongs to.
///
/// Handlers taking `AuthUser` never run for anonymous, revoked or expired
/// sessions; the request is answered with 401 instead.
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserSummary);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            debug!("request without bearer token");
            return Err(AppError::Unauthenticated);
        };

        match state.sessions.resolve(token).await? {
            Some(user) => Ok(AuthUser(user)),
            None => {
                warn!("invalid or expired session token");
                Err(AppError::Unauthenticated)
            }
        }
    }
}

/// Token from `Authorization: Bearer <token>`; anything else counts as no token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
