use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Per-job coding assignment template. `job_id` is unique: a second create
/// for the same job replaces the row, never duplicates it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssignmentRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub repo_template_url: String,
    pub instructions: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A candidate's progress on an assignment. `todo` is always an object of
/// shape { mainTask, subtasks, completedCount } (see assignments::progress).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateAssignmentRow {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub candidate_user_id: Uuid,
    pub todo: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
