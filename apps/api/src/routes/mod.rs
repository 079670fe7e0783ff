pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::proposal::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Proposal API
        .route("/api/v1/proposals", post(handlers::handle_generate_proposal))
        .route(
            "/api/v1/proposals/analyze",
            post(handlers::handle_analyze_job),
        )
        // Legacy path kept for existing callers
        .route("/api/proposal", post(handlers::handle_generate_proposal))
        // Slack slash command webhook
        .route("/slack/commands", post(handlers::handle_slash_command))
        .with_state(state)
}
