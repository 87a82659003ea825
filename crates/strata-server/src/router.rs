use std::sync::Arc;

use axum::{routing::get, Router};
use strata_page::ContentPage;
use tower_http::trace::TraceLayer;

use crate::handler;

/// Build the axum router serving `page` at every path.
pub fn build_router(page: Arc<ContentPage>) -> Router {
    Router::new()
        .route("/", get(handler::serve_content))
        .route("/*path", get(handler::serve_content))
        .layer(TraceLayer::new_for_http())
        .with_state(page)
}
