use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One analysis run over a candidate repository. Immutable after creation;
/// re-analysis inserts a new row rather than mutating an old one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RepoAnalysisRow {
    pub id: Uuid,
    pub candidate_user_id: Uuid,
    /// owner/repo identifier. Globally meaningful but not unique across
    /// candidates (forks).
    pub repo_full_name: String,
    /// Technology -> normalized strength in 0-1.
    pub skills: Value,
    pub created_at: DateTime<Utc>,
}
