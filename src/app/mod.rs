//! HTTP surface: routes, handlers and the pipelines they drive.

pub mod charts;
mod error;
pub mod handlers;
pub mod state;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub use charts::EncodedChart;
pub use state::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/contributors_graph", get(handlers::contributors_graph))
        .route("/lines_graph", get(handlers::lines_graph))
        .route("/commits_graph", get(handlers::commits_graph))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
