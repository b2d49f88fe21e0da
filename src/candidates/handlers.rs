use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use time::OffsetDateTime;
use tracing::instrument;

use crate::error::AppError;
use crate::model::Candidate;
use crate::state::AppState;

use super::dto::{CandidateInput, DashboardStats, ListParams};
use super::stats;

#[instrument(skip(state))]
pub async fn list_candidates(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Candidate>>, AppError> {
    let session = state.sessions.require().await?;
    let candidates = state
        .candidates
        .list(&session, params.search.as_deref())
        .await?;
    Ok(Json(candidates))
}

#[instrument(skip(state, payload))]
pub async fn create_candidate(
    State(state): State<AppState>,
    Json(payload): Json<CandidateInput>,
) -> Result<(StatusCode, Json<Candidate>), AppError> {
    let session = state.sessions.require().await?;
    let candidate = state.candidates.create(&session, payload).await?;
    Ok((StatusCode::CREATED, Json(candidate)))
}

#[instrument(skip(state, payload))]
pub async fn update_candidate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CandidateInput>,
) -> Result<Json<Candidate>, AppError> {
    let session = state.sessions.require().await?;
    let candidate = state.candidates.update(&session, id, payload).await?;
    Ok(Json(candidate))
}

#[instrument(skip(state))]
pub async fn delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let session = state.sessions.require().await?;
    state.candidates.delete(&session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, AppError> {
    let session = state.sessions.require().await?;
    let candidates = state.candidates.list(&session, None).await?;
    let now = OffsetDateTime::now_utc();
    Ok(Json(DashboardStats {
        total: stats::total(&candidates),
        new_this_week: stats::new_this_week(&candidates, now),
    }))
}
