use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::assignments::repository::{
    create_candidate_assignment, get_for_job, set_todo, upsert_assignment,
};
use crate::errors::AppError;
use crate::models::assignment::{AssignmentRow, CandidateAssignmentRow};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UpsertAssignmentRequest {
    pub repo_template_url: String,
    pub instructions: String,
}

#[derive(Deserialize)]
pub struct CreateCandidateAssignmentRequest {
    pub candidate_user_id: Uuid,
}

#[derive(Deserialize)]
pub struct SetTodoRequest {
    pub todo: Value,
}

/// PUT /api/v1/jobs/:job_id/assignment
pub async fn handle_upsert_assignment(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(req): Json<UpsertAssignmentRequest>,
) -> Result<Json<AssignmentRow>, AppError> {
    let row = upsert_assignment(&state.db, job_id, &req.repo_template_url, &req.instructions)
        .await?;
    Ok(Json(row))
}

/// GET /api/v1/jobs/:job_id/assignment
pub async fn handle_get_assignment(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<AssignmentRow>, AppError> {
    let row = get_for_job(&state.db, job_id).await?;
    Ok(Json(row))
}

/// POST /api/v1/assignments/:id/candidates
pub async fn handle_create_candidate_assignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateCandidateAssignmentRequest>,
) -> Result<Json<CandidateAssignmentRow>, AppError> {
    let row = create_candidate_assignment(&state.db, id, req.candidate_user_id).await?;
    Ok(Json(row))
}

/// PATCH /api/v1/candidate-assignments/:id/todo
pub async fn handle_set_todo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetTodoRequest>,
) -> Result<Json<CandidateAssignmentRow>, AppError> {
    let row = set_todo(&state.db, id, &req.todo).await?;
    Ok(Json(row))
}
