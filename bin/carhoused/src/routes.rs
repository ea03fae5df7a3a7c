//! Route registration — maps each navigation key to its page module and
//! collects the mutation endpoints, system endpoints and the session gate.

use std::sync::Arc;

use axum::middleware;
use axum::response::{IntoResponse, Redirect};
use axum::routing::{get, post};
use axum::Router;

use carhouse_client::Backend;

use crate::config::ServerConfig;
use crate::pages;
use crate::session;

/// Application shared state.
#[derive(Clone)]
pub struct AppState {
    pub backend: Backend,
    pub config: Arc<ServerConfig>,
}

/// Build the complete router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/dashboard") }))
        .route("/login", get(pages::login::page).post(pages::login::submit))
        .route("/logout", post(pages::login::logout))
        .route("/dashboard", get(pages::dashboard::page))
        .merge(pages::products::routes())
        .merge(pages::categories::routes())
        .merge(pages::orders::routes())
        .merge(pages::users::routes())
        .route("/health", get(health))
        .route("/version", get(version))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::session_gate,
        ))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "carhoused",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
