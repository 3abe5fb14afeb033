use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    /// Technology -> required weight, conventionally 0-1. Edits here do not
    /// rescore existing matches; scores are snapshots.
    pub required_stacks: Value,
    pub published: bool,
    pub created_at: DateTime<Utc>,
}
