use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{debug, instrument};

use crate::{error::AppError, state::AppState};

use super::catalog::{CatalogSummary, Exercise};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/exercises/:id", get(get_exercise))
        .route("/exercises/stats/summary", get(summary))
}

#[instrument(skip(state))]
pub async fn get_exercise(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Exercise>, AppError> {
    match state.catalog.get(&id) {
        Some(exercise) => Ok(Json(exercise.clone())),
        None => {
            debug!("exercise not found");
            Err(AppError::NotFound("Exercício não encontrado".into()))
        }
    }
}

pub async fn summary(State(state): State<AppState>) -> Json<CatalogSummary> {
    Json(state.catalog.summary())
}
