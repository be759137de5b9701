//! Router assembly.

use crate::{api::handlers, state::AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/plan", post(handlers::create_plan))
        .route(
            "/v1/plan/:id",
            get(handlers::get_plan)
                .patch(handlers::update_plan)
                .delete(handlers::delete_plan),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
