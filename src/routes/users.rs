//! User resource routes.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn user_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::raw_lookup))
        .route("/users", get(handlers::list).post(handlers::create))
        .route("/users/batch", post(handlers::batch_create))
        .route("/users/stats", get(handlers::stats))
        .route("/users/upsert", put(handlers::upsert))
        .route(
            "/users/:id",
            get(handlers::read).put(handlers::update).delete(handlers::delete),
        )
        .route("/txSimple", post(handlers::tx_simple))
        .route("/tx", post(handlers::tx_interactive))
        .with_state(state)
}
