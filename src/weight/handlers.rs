use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{debug, instrument};

use crate::{auth::extractors::AuthUser, error::AppError, state::AppState};

use super::dto::{
    AddWeightRequest, LatestWeightResponse, Pagination, RecordCreatedResponse,
    WeightHistoryResponse,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/weight", get(list_weights).post(add_weight))
        .route("/weight/latest", get(latest_weight))
}

#[instrument(skip_all)]
pub async fn add_weight(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<AddWeightRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RecordCreatedResponse>), AppError> {
    let Json(body) = payload?;
    let weight = body.weight_kg()?;

    let record_id = state
        .weights
        .add_record(user.id, weight, body.date.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RecordCreatedResponse {
            success: true,
            message: "Peso registrado com sucesso",
            record_id,
        }),
    ))
}

#[instrument(skip_all)]
pub async fn list_weights(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    query: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<WeightHistoryResponse>, AppError> {
    let Query(p) = query?;
    let (data, total) = state
        .weights
        .list_records(user.id, p.limit, p.offset)
        .await?;
    debug!(user_id = user.id, returned = data.len(), total, "weight history");

    Ok(Json(WeightHistoryResponse {
        success: true,
        data,
        total,
        limit: p.limit,
        offset: p.offset,
        has_more: p.offset.saturating_add(p.limit) < total,
    }))
}

#[instrument(skip_all)]
pub async fn latest_weight(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<LatestWeightResponse>, AppError> {
    let data = state.weights.latest_record(user.id).await?;
    let message = if data.is_some() {
        "Peso mais recente"
    } else {
        "Nenhum peso registrado"
    };
    Ok(Json(LatestWeightResponse {
        success: true,
        data,
        message,
    }))
}
