//! Smart Gadgets store library.
//!
//! The whole web application lives here so that the binary, the CLI and the
//! integration tests share one router and one database layer.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, header::CACHE_CONTROL},
};
use tower::Layer;
use tower_http::{
    services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tower_sessions::SessionStore;

use crate::middleware::{
    create_session_layer, drain_rendered_notices, request_id_middleware,
    security_headers_middleware,
};
use crate::state::AppState;

/// Build the complete application router around a session store.
///
/// Production passes the SQLite store from [`middleware::sqlite_store`];
/// tests pass a `MemoryStore`.
pub fn build_router<S>(state: AppState, session_store: S) -> Router
where
    S: SessionStore + Clone,
{
    let config = state.config();

    let static_files = SetResponseHeaderLayer::if_not_present(
        CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=3600"),
    )
    .layer(ServeDir::new(&config.static_dir));
    let uploads = ServeDir::new(&config.upload_dir);
    let session_layer = create_session_layer(session_store, config);

    let router = routes::routes(config)
        .nest_service("/static", static_files)
        .nest_service("/uploads", uploads)
        .layer(axum::middleware::from_fn(drain_rendered_notices))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }));

    router
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
