use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::assignments::progress::{empty_todo, is_valid_todo};
use crate::errors::AppError;
use crate::models::assignment::{AssignmentRow, CandidateAssignmentRow};

/// Creates or replaces the assignment template for a job. Keyed by the
/// unique job_id: a second create for the same job updates in place, a
/// duplicate row is a data-integrity defect.
pub async fn upsert_assignment(
    pool: &PgPool,
    job_id: Uuid,
    repo_template_url: &str,
    instructions: &str,
) -> Result<AssignmentRow, AppError> {
    let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }

    let row: AssignmentRow = sqlx::query_as(
        r#"
        INSERT INTO assignments (id, job_id, repo_template_url, instructions)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (job_id)
        DO UPDATE SET
            repo_template_url = EXCLUDED.repo_template_url,
            instructions = EXCLUDED.instructions,
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job_id)
    .bind(repo_template_url)
    .bind(instructions)
    .fetch_one(pool)
    .await?;

    info!("Upserted assignment {} for job {job_id}", row.id);
    Ok(row)
}

pub async fn get_for_job(pool: &PgPool, job_id: Uuid) -> Result<AssignmentRow, AppError> {
    sqlx::query_as::<_, AssignmentRow>("SELECT * FROM assignments WHERE job_id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No assignment for job {job_id}")))
}

/// Hands an assignment to a candidate, seeding the canonical empty
/// progress object.
pub async fn create_candidate_assignment(
    pool: &PgPool,
    assignment_id: Uuid,
    candidate_user_id: Uuid,
) -> Result<CandidateAssignmentRow, AppError> {
    let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM assignments WHERE id = $1")
        .bind(assignment_id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(AppError::NotFound(format!(
            "Assignment {assignment_id} not found"
        )));
    }

    let row: CandidateAssignmentRow = sqlx::query_as(
        r#"
        INSERT INTO candidate_assignments (id, assignment_id, candidate_user_id, todo)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(assignment_id)
    .bind(candidate_user_id)
    .bind(empty_todo())
    .fetch_one(pool)
    .await?;

    info!(
        "Assigned {assignment_id} to candidate {candidate_user_id} as {}",
        row.id
    );
    Ok(row)
}

/// Replaces a candidate's progress object. Values failing the shape check
/// are rejected before any write; the column never regresses to the legacy
/// bare-array shape.
pub async fn set_todo(
    pool: &PgPool,
    id: Uuid,
    todo: &Value,
) -> Result<CandidateAssignmentRow, AppError> {
    if !is_valid_todo(todo) {
        return Err(AppError::Validation(
            "todo must be an object with mainTask (string), subtasks (array) \
             and completedCount (non-negative integer)"
                .to_string(),
        ));
    }

    sqlx::query_as::<_, CandidateAssignmentRow>(
        "UPDATE candidate_assignments SET todo = $1, updated_at = now() \
         WHERE id = $2 RETURNING *",
    )
    .bind(todo)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Candidate assignment {id} not found")))
}
