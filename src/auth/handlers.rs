use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, error, info, instrument};

use crate::{
    auth::{
        dto::{
            LoginRequest, LoginResponse, LogoutResponse, MeResponse, RegisterRequest,
            RegisterResponse,
        },
        extractors::{bearer_token, AuthUser},
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(get_me))
}

#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let Json(payload) = payload?;
    let reg = payload.validate()?;

    let user_id = state
        .users
        .create_user(&reg.name, &reg.email, &reg.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "Usuário criado com sucesso",
            user_id,
        }),
    ))
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(payload) = payload?;
    let (email, password) = payload.validate()?;

    let user = state.users.authenticate(&email, &password).await?;
    let session_token = state.sessions.create_session(user.id).await?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Login realizado com sucesso",
        user,
        session_token,
    }))
}

/// Always answers 200; a missing or unknown token has nothing to revoke.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Json<LogoutResponse> {
    if let Some(token) = bearer_token(&headers) {
        match state.sessions.invalidate(token).await {
            Ok(()) => info!("session closed"),
            Err(e) => error!(error = %e, "invalidate session failed"),
        }
    }
    Json(LogoutResponse {
        success: true,
        message: "Logout realizado com sucesso",
    })
}

#[instrument(skip_all)]
pub async fn get_me(
    State(state): State<AppState>,
    auth: Result<AuthUser, AppError>,
) -> Result<Json<MeResponse>, AppError> {
    let AuthUser(session_user) = auth.map_err(|e| match e {
        AppError::Unauthenticated => AppError::NotLoggedIn,
        other => other,
    })?;
    debug!(user_id = session_user.id, "current user");
    let user = state
        .users
        .find_active(session_user.id)
        .await?
        .ok_or(AppError::NotLoggedIn)?;
    Ok(Json(MeResponse {
        success: true,
        user,
    }))
}
