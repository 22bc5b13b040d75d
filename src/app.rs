use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/sections", get(handlers::sections))
        .route("/api/view", get(handlers::get_view))
        .route("/api/progress", get(handlers::get_progress))
        .route("/api/items/:id/toggle", post(handlers::toggle_item))
        .route("/api/topics/:id/collapse", post(handlers::toggle_section))
        .with_state(state)
}
