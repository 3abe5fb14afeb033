use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

/// DDL bringing a fresh database to the current shape, including the
/// three-column match key. Every statement is guarded with IF NOT EXISTS so
/// startup is safe to repeat. Databases that predate the
/// (job, candidate, repo) key are healed by the `reconcile` binary instead.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS jobs (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        required_stacks JSONB NOT NULL DEFAULT '{}'::jsonb,
        published BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS repo_analyses (
        id UUID PRIMARY KEY,
        candidate_user_id UUID NOT NULL,
        repo_full_name TEXT NOT NULL,
        skills JSONB NOT NULL DEFAULT '{}'::jsonb,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS job_matches (
        id UUID PRIMARY KEY,
        job_id UUID NOT NULL REFERENCES jobs(id),
        candidate_user_id UUID NOT NULL,
        repo_full_name TEXT NOT NULL,
        analysis_id UUID REFERENCES repo_analyses(id),
        score DOUBLE PRECISION NOT NULL,
        status TEXT NOT NULL DEFAULT 'not_started'
            CHECK (status IN ('not_started', 'in_progress', 'completed', 'flagged',
                              'proceed', 'rejected', 'waitlisted', 'expired')),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_job_matches_job_candidate_repo \
     ON job_matches (job_id, candidate_user_id, repo_full_name)",
    "CREATE INDEX IF NOT EXISTS idx_job_matches_repo ON job_matches (repo_full_name)",
    "CREATE INDEX IF NOT EXISTS idx_job_matches_candidate ON job_matches (candidate_user_id)",
    r#"
    CREATE TABLE IF NOT EXISTS assignments (
        id UUID PRIMARY KEY,
        job_id UUID NOT NULL UNIQUE REFERENCES jobs(id),
        repo_template_url TEXT NOT NULL,
        instructions TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS candidate_assignments (
        id UUID PRIMARY KEY,
        assignment_id UUID NOT NULL REFERENCES assignments(id),
        candidate_user_id UUID NOT NULL,
        todo JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_candidate_assignments_candidate \
     ON candidate_assignments (candidate_user_id)",
];

/// Ensures all tables and indexes exist. Idempotent.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    for stmt in SCHEMA {
        sqlx::query(stmt).execute(pool).await?;
    }
    info!("Database schema ensured ({} statements)", SCHEMA.len());
    Ok(())
}
