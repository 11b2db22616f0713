use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::handlers::{auth, rag};
use crate::state::AppState;

/// Builds the application router: CORS for the SPA client, request
/// tracing, and the six API routes. Everything except `/login` expects a
/// bearer token, checked inside the handlers.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/login", post(auth::login))
        .route("/health", get(auth::health))
        .route("/index", post(rag::index_urls))
        .route("/create_collection", post(rag::create_collection))
        .route("/fetch_records", post(rag::fetch_records))
        .route("/chat", post(rag::chat))
        .with_state(state)
        .layer(build_cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE, header::AUTHORIZATION])
}
