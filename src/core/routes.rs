// HTTP routes configuration

use crate::core::state::AppState;
use axum::{routing::get, Router};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/students",
            get(crate::handlers::students::list_handler)
                .post(crate::handlers::students::create_handler)
                .put(crate::handlers::students::update_handler)
                .delete(crate::handlers::students::delete_handler),
        )
        .route("/health", get(crate::handlers::health::health_handler))

        // 404 fallback for all unmatched routes
        .fallback(crate::handlers::fallback::fallback_handler)

        .with_state(state)
}
