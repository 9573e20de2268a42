//! API route definitions

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use super::handlers::{self, NotesState};

/// Create the API router
pub fn create_router(state: NotesState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/notes",
            get(handlers::list_notes).post(handlers::create_note),
        )
        // Static segments win over `{id}`
        .route("/notes/summaries", get(handlers::list_summaries))
        .route("/notes/filter", get(handlers::filter_notes))
        .route(
            "/notes/{id}",
            get(handlers::get_note)
                .put(handlers::update_note)
                .delete(handlers::delete_note),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
