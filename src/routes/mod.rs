use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::{Catalog, SessionStore},
    middleware::{make_span_with_request_id, request_id_middleware},
    services::MetadataFetcher,
};

pub mod movies;
pub mod recommendations;
pub mod sessions;

/// Shared state handed to every handler
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub metadata: MetadataFetcher,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(catalog: Catalog, metadata: MetadataFetcher) -> Self {
        Self::with_sessions(catalog, metadata, SessionStore::new())
    }

    pub fn with_sessions(catalog: Catalog, metadata: MetadataFetcher, sessions: SessionStore) -> Self {
        Self {
            catalog: Arc::new(catalog),
            metadata,
            sessions,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies", get(movies::list))
        .route("/movies/random", get(movies::random))
        .route("/recommendations", get(recommendations::recommend))
        .route("/sessions", post(sessions::create))
        .route("/sessions/:id", delete(sessions::delete))
        .route("/sessions/:id/history", get(sessions::history))
        .route("/sessions/:id/view", post(sessions::view))
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "healthy", "movies": state.catalog.len() })),
    )
}
