//! Axum router for the relay.
//!
//! `build_router` returns the bare router; `with_layers` adds CORS and
//! request tracing. Tests drive the bare router in-process.
//!
//! When a static directory is configured every file under it is served as a
//! fallback, so `/` resolves to `index.html` and `/payment-success` to
//! `success.html`.

pub mod dto;
mod handlers;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::application::lifecycle::OrderLifecycle;

/// Shared state behind every handler.
pub struct AppState {
    pub lifecycle: Arc<OrderLifecycle>,
    /// Directory of pages and assets, if any are served.
    pub static_dir: Option<PathBuf>,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let static_dir = state.static_dir.clone();
    let router = Router::new()
        .route("/health", get(handlers::health))
        .route("/create-order", post(handlers::create_order))
        .route("/verify-payment", post(handlers::verify_payment))
        .with_state(state);

    match static_dir {
        Some(dir) => router
            .route_service("/payment-success", ServeFile::new(dir.join("success.html")))
            .fallback_service(ServeDir::new(dir)),
        None => router,
    }
}

pub fn with_layers(router: Router) -> Router {
    router
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(Any),
        )
}
