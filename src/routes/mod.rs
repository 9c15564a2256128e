//! Router assembly.

mod common;
mod users;

pub use common::common_routes_with_ready;
pub use users::user_routes;

use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// The full application: common routes, user routes, request tracing and a body size limit.
pub fn app(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .merge(user_routes(state))
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(TraceLayer::new_for_http())
}
