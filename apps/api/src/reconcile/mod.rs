//! Structural repair for the match table.
//!
//! The match key changed shape from (job_id, candidate_user_id) to
//! (job_id, candidate_user_id, repo_full_name) after rows already existed
//! without the repository column. `reconcile_match_keys` brings such a
//! table into compliance in one transaction. Every step re-checks "if not
//! already satisfied", so a suspected partial prior run is safe to repeat
//! and a compliant table is a no-op. Callers ensure at-most-one in-flight
//! run; the procedure must not race itself.

use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;

use crate::errors::AppError;

/// Operator-facing counts from a reconciliation pass. All zeros on a
/// table that was already compliant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileReport {
    pub backfilled: u64,
    pub placeholders: u64,
    pub duplicates_removed: u64,
}

/// Keep the newest row per (job, candidate, repo); delete the rest. Rank 1
/// is latest created_at, ties broken by id, so re-ranking a clean table
/// deletes nothing.
const DEDUP_SQL: &str = r#"
DELETE FROM job_matches
WHERE id IN (
    SELECT id FROM (
        SELECT id,
               ROW_NUMBER() OVER (
                   PARTITION BY job_id, candidate_user_id, repo_full_name
                   ORDER BY created_at DESC, id DESC
               ) AS rank
        FROM job_matches
    ) ranked
    WHERE rank > 1
)
"#;

pub async fn reconcile_match_keys(pool: &PgPool) -> Result<ReconcileReport, AppError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::ReconciliationAborted(format!("begin transaction: {e}")))?;

    // 1. New key column, nullable until the table is clean.
    step(
        &mut tx,
        "add repo_full_name column",
        "ALTER TABLE job_matches ADD COLUMN IF NOT EXISTS repo_full_name TEXT",
    )
    .await?;

    // 2. Copy the repository name from the linked analysis.
    let backfilled = step(
        &mut tx,
        "backfill from analyses",
        r#"
        UPDATE job_matches m
        SET repo_full_name = a.repo_full_name
        FROM repo_analyses a
        WHERE m.analysis_id = a.id
          AND m.repo_full_name IS NULL
        "#,
    )
    .await?;

    // 3. Orphaned or never-linked rows get a placeholder derived from the
    //    row's own ids. Unique because the row id is unique; collision-free
    //    with real repositories because GitHub owner names cannot contain
    //    underscores.
    let placeholders = step(
        &mut tx,
        "synthesize placeholders",
        r#"
        UPDATE job_matches
        SET repo_full_name =
            '__orphaned__/' || id::text || COALESCE('-' || analysis_id::text, '')
        WHERE repo_full_name IS NULL
        "#,
    )
    .await?;

    // 4. Historical duplicates created before the constraint existed.
    let duplicates_removed = step(&mut tx, "deduplicate", DEDUP_SQL).await?;

    // 5. Index swap. Only now that steps 2-4 guarantee no duplicate would
    //    violate the new key.
    step(
        &mut tx,
        "drop legacy unique constraint",
        "ALTER TABLE job_matches DROP CONSTRAINT IF EXISTS job_matches_job_id_candidate_user_id_key",
    )
    .await?;
    step(
        &mut tx,
        "drop legacy unique index",
        "DROP INDEX IF EXISTS idx_job_matches_job_candidate",
    )
    .await?;
    step(
        &mut tx,
        "create three-column unique index",
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_job_matches_job_candidate_repo \
         ON job_matches (job_id, candidate_user_id, repo_full_name)",
    )
    .await?;

    // 6. The column is fully populated; lock the invariant in.
    step(
        &mut tx,
        "set repo_full_name NOT NULL",
        "ALTER TABLE job_matches ALTER COLUMN repo_full_name SET NOT NULL",
    )
    .await?;

    // 7. Supporting lookup index.
    step(
        &mut tx,
        "create repo lookup index",
        "CREATE INDEX IF NOT EXISTS idx_job_matches_repo ON job_matches (repo_full_name)",
    )
    .await?;

    tx.commit()
        .await
        .map_err(|e| AppError::ReconciliationAborted(format!("commit: {e}")))?;

    let report = ReconcileReport {
        backfilled,
        placeholders,
        duplicates_removed,
    };
    info!(
        "Match-key reconciliation complete: {} backfilled, {} placeholders, {} duplicates removed",
        report.backfilled, report.placeholders, report.duplicates_removed
    );
    Ok(report)
}

/// Replaces every `candidate_assignments.todo` failing the shape check with
/// the canonical empty-progress object. Returns the repaired-row count;
/// zero on a healthy table.
pub async fn repair_assignment_progress(pool: &PgPool) -> Result<u64, AppError> {
    let repaired = sqlx::query(
        r#"
        UPDATE candidate_assignments
        SET todo = '{"mainTask": "", "subtasks": [], "completedCount": 0}'::jsonb,
            updated_at = now()
        WHERE jsonb_typeof(todo) IS DISTINCT FROM 'object'
           OR jsonb_typeof(todo->'mainTask') IS DISTINCT FROM 'string'
           OR jsonb_typeof(todo->'subtasks') IS DISTINCT FROM 'array'
           OR jsonb_typeof(todo->'completedCount') IS DISTINCT FROM 'number'
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| AppError::ReconciliationAborted(format!("repair todo shape: {e}")))?
    .rows_affected();

    info!("Assignment progress repair complete: {repaired} rows reset");
    Ok(repaired)
}

/// Runs one reconciliation statement inside the transaction, converting any
/// failure into the fatal, operator-facing abort error. The transaction
/// rolls back on drop, so a failed step never persists partial state.
async fn step(
    tx: &mut Transaction<'_, Postgres>,
    name: &str,
    sql: &str,
) -> Result<u64, AppError> {
    match sqlx::query(sql).execute(&mut **tx).await {
        Ok(result) => {
            info!("Reconcile step '{name}': {} rows affected", result.rows_affected());
            Ok(result.rows_affected())
        }
        Err(e) => Err(AppError::ReconciliationAborted(format!("{name}: {e}"))),
    }
}
