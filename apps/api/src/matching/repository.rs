//! Match Repository: the only component touched by concurrent callers.
//! All coordination is delegated to PostgreSQL's conditional-write and
//! constraint guarantees; there are no application-level locks.

use sqlx::PgPool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::scoring::MatchScorer;
use crate::matching::status::MatchStatus;
use crate::matching::vectors::parse_stack_vector;
use crate::models::analysis::RepoAnalysisRow;
use crate::models::job::JobRow;
use crate::models::job_match::JobMatchRow;

/// Single atomic conditional write keyed by the unique triple. Existing rows
/// keep their status and created_at; only the score, the analysis link, and
/// updated_at move. Never a separate existence check followed by a write.
const UPSERT_SQL: &str = r#"
INSERT INTO job_matches
    (id, job_id, candidate_user_id, repo_full_name, analysis_id, score, status)
VALUES ($1, $2, $3, $4, $5, $6, $7)
ON CONFLICT (job_id, candidate_user_id, repo_full_name)
DO UPDATE SET
    score = EXCLUDED.score,
    analysis_id = EXCLUDED.analysis_id,
    updated_at = now()
RETURNING *
"#;

/// Scores an analysis against a job and writes the match record
/// insert-or-update. Idempotent: re-running for the same
/// (job, candidate, repo) updates the one existing row in place.
///
/// `initial_status` applies only when the row is inserted and must be
/// `not_started` (the default entry point) or `completed` (upsert invoked as
/// the terminal step of an already-finished analysis pipeline).
pub async fn upsert_match(
    pool: &PgPool,
    scorer: &dyn MatchScorer,
    job_id: Uuid,
    candidate_user_id: Uuid,
    analysis_id: Uuid,
    initial_status: MatchStatus,
) -> Result<JobMatchRow, AppError> {
    if !matches!(
        initial_status,
        MatchStatus::NotStarted | MatchStatus::Completed
    ) {
        return Err(AppError::Validation(format!(
            "initial status must be 'not_started' or 'completed', got '{initial_status}'"
        )));
    }

    let job: JobRow = sqlx::query_as("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let analysis: RepoAnalysisRow = sqlx::query_as("SELECT * FROM repo_analyses WHERE id = $1")
        .bind(analysis_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {analysis_id} not found")))?;

    if !job.published {
        // Permitted: publication gates front-end visibility, not scoring.
        debug!("Scoring against unpublished job {job_id}");
    }

    let requirements = parse_stack_vector("required_stacks", &job.required_stacks)?;
    let skills = parse_stack_vector("skills", &analysis.skills)?;
    let score = scorer.score(&requirements, &skills);

    let repo_full_name = analysis.repo_full_name.as_str();
    match write_match(
        pool,
        job_id,
        candidate_user_id,
        repo_full_name,
        analysis_id,
        score,
        initial_status,
    )
    .await
    {
        Ok(row) => {
            info!(
                "Upserted match {} for job {job_id}, candidate {candidate_user_id}, repo {repo_full_name} (score {score:.1})",
                row.id
            );
            Ok(row)
        }
        // ON CONFLICT on the key itself should absorb any race; a unique
        // violation surfacing anyway gets one retry, then a typed error the
        // caller may retry.
        Err(e) if is_unique_violation(&e) => {
            warn!("Upsert hit a unique violation despite ON CONFLICT; retrying once: {e}");
            write_match(
                pool,
                job_id,
                candidate_user_id,
                repo_full_name,
                analysis_id,
                score,
                initial_status,
            )
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::ConflictNotResolved(format!(
                        "upsert for ({job_id}, {candidate_user_id}, {repo_full_name}) did not resolve"
                    ))
                } else {
                    AppError::Database(e)
                }
            })
        }
        Err(e) => Err(AppError::Database(e)),
    }
}

async fn write_match(
    pool: &PgPool,
    job_id: Uuid,
    candidate_user_id: Uuid,
    repo_full_name: &str,
    analysis_id: Uuid,
    score: f64,
    initial_status: MatchStatus,
) -> Result<JobMatchRow, sqlx::Error> {
    sqlx::query_as::<_, JobMatchRow>(UPSERT_SQL)
        .bind(Uuid::new_v4())
        .bind(job_id)
        .bind(candidate_user_id)
        .bind(repo_full_name)
        .bind(analysis_id)
        .bind(score)
        .bind(initial_status.as_str())
        .fetch_one(pool)
        .await
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}

/// Advances a match through the review state machine. An unreachable target
/// fails with `InvalidTransition` and changes nothing. The update is a
/// compare-and-set on the status read here; a miss means a concurrent
/// reviewer moved the row first, which is surfaced as retry-safe.
pub async fn transition_status(
    pool: &PgPool,
    match_id: Uuid,
    next: MatchStatus,
) -> Result<JobMatchRow, AppError> {
    let existing: JobMatchRow = sqlx::query_as("SELECT * FROM job_matches WHERE id = $1")
        .bind(match_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Match {match_id} not found")))?;

    let current = MatchStatus::parse(&existing.status).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "match {match_id} carries unknown status '{}'",
            existing.status
        ))
    })?;

    if !current.can_transition_to(next) {
        return Err(AppError::InvalidTransition {
            from: current.to_string(),
            to: next.to_string(),
        });
    }

    let updated: Option<JobMatchRow> = sqlx::query_as(
        "UPDATE job_matches SET status = $1, updated_at = now() \
         WHERE id = $2 AND status = $3 RETURNING *",
    )
    .bind(next.as_str())
    .bind(match_id)
    .bind(current.as_str())
    .fetch_optional(pool)
    .await?;

    match updated {
        Some(row) => {
            info!("Match {match_id} transitioned {current} -> {next}");
            Ok(row)
        }
        None => Err(AppError::ConflictNotResolved(format!(
            "match {match_id} was modified concurrently; re-read and retry"
        ))),
    }
}

/// Matches for a job, most recent first. Point-in-time snapshot.
pub async fn list_for_job(pool: &PgPool, job_id: Uuid) -> Result<Vec<JobMatchRow>, AppError> {
    Ok(sqlx::query_as::<_, JobMatchRow>(
        "SELECT * FROM job_matches WHERE job_id = $1 ORDER BY created_at DESC",
    )
    .bind(job_id)
    .fetch_all(pool)
    .await?)
}

/// Matches for a candidate across all jobs, most recent first.
pub async fn list_for_candidate(
    pool: &PgPool,
    candidate_user_id: Uuid,
) -> Result<Vec<JobMatchRow>, AppError> {
    Ok(sqlx::query_as::<_, JobMatchRow>(
        "SELECT * FROM job_matches WHERE candidate_user_id = $1 ORDER BY created_at DESC",
    )
    .bind(candidate_user_id)
    .fetch_all(pool)
    .await?)
}
