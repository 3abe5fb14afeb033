use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The scored, reviewable pairing of a job, a candidate, and one analyzed
/// repository. At most one row exists per
/// (job_id, candidate_user_id, repo_full_name).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobMatchRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_user_id: Uuid,
    /// Denormalized from the analysis that produced the match so the
    /// uniqueness key survives analysis deletion.
    pub repo_full_name: String,
    pub analysis_id: Option<Uuid>,
    /// 0-100 compatibility score. A snapshot: requirement edits after the
    /// fact do not rescore it.
    pub score: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
