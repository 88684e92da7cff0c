use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/entries",
            get(handlers::recent).post(handlers::create_entry),
        )
        .route("/api/overview/week", get(handlers::week))
        .route("/api/overview/month", get(handlers::month))
        .route("/api/summary", get(handlers::summary))
        .route("/api/chart", get(handlers::chart))
        .with_state(state)
}
