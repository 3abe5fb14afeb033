use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::repository::{
    list_for_candidate, list_for_job, transition_status, upsert_match,
};
use crate::matching::status::MatchStatus;
use crate::models::job_match::JobMatchRow;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UpsertMatchRequest {
    pub job_id: Uuid,
    pub candidate_user_id: Uuid,
    pub analysis_id: Uuid,
    /// "not_started" (default) or "completed" when the caller is the
    /// terminal step of an already-finished analysis pipeline.
    pub initial_status: Option<String>,
}

#[derive(Deserialize)]
pub struct TransitionRequest {
    pub status: String,
}

/// POST /api/v1/matches
pub async fn handle_upsert_match(
    State(state): State<AppState>,
    Json(req): Json<UpsertMatchRequest>,
) -> Result<Json<JobMatchRow>, AppError> {
    let initial_status = match req.initial_status.as_deref() {
        None => MatchStatus::NotStarted,
        Some(s) => parse_status(s)?,
    };
    let row = upsert_match(
        &state.db,
        state.scorer.as_ref(),
        req.job_id,
        req.candidate_user_id,
        req.analysis_id,
        initial_status,
    )
    .await?;
    Ok(Json(row))
}

/// PATCH /api/v1/matches/:id/status
pub async fn handle_transition_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TransitionRequest>,
) -> Result<Json<JobMatchRow>, AppError> {
    let next = parse_status(&req.status)?;
    let row = transition_status(&state.db, id, next).await?;
    Ok(Json(row))
}

/// GET /api/v1/jobs/:job_id/matches
pub async fn handle_list_for_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<JobMatchRow>>, AppError> {
    let rows = list_for_job(&state.db, job_id).await?;
    Ok(Json(rows))
}

/// GET /api/v1/candidates/:user_id/matches
pub async fn handle_list_for_candidate(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<JobMatchRow>>, AppError> {
    let rows = list_for_candidate(&state.db, user_id).await?;
    Ok(Json(rows))
}

fn parse_status(s: &str) -> Result<MatchStatus, AppError> {
    MatchStatus::parse(s)
        .ok_or_else(|| AppError::Validation(format!("unknown match status '{s}'")))
}
