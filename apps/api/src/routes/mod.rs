pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::assignments::handlers as assignments;
use crate::matching::handlers as matching;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Match engine
        .route("/api/v1/matches", post(matching::handle_upsert_match))
        .route(
            "/api/v1/matches/:id/status",
            patch(matching::handle_transition_status),
        )
        .route(
            "/api/v1/jobs/:job_id/matches",
            get(matching::handle_list_for_job),
        )
        .route(
            "/api/v1/candidates/:user_id/matches",
            get(matching::handle_list_for_candidate),
        )
        // Assignment templates
        .route(
            "/api/v1/jobs/:job_id/assignment",
            put(assignments::handle_upsert_assignment).get(assignments::handle_get_assignment),
        )
        .route(
            "/api/v1/assignments/:id/candidates",
            post(assignments::handle_create_candidate_assignment),
        )
        .route(
            "/api/v1/candidate-assignments/:id/todo",
            patch(assignments::handle_set_todo),
        )
        .with_state(state)
}
