use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::Catalog,
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{session::RECENT_LIMIT, Movie, MovieView},
    routes::AppState,
    services::recommendations,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ViewRequest {
    pub title: String,
}

/// Opens a browsing session
pub async fn create(State(state): State<Arc<AppState>>) -> (StatusCode, Json<SessionResponse>) {
    let id = state.sessions.create().await;
    (StatusCode::CREATED, Json(SessionResponse { id }))
}

/// Ends a browsing session
pub async fn delete(
    State(state): State<Arc<AppState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = path?;
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::SessionNotFound(id))
    }
}

/// Recently viewed titles, most recent first
pub async fn history(
    State(state): State<Arc<AppState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Vec<Movie>>> {
    let Path(id) = path?;
    let ids = state.sessions.recent(id, RECENT_LIMIT).await?;
    Ok(Json(resolve_ids(&state.catalog, &ids)))
}

/// Detail view for a title: records the view, then gathers metadata and similar titles
///
/// Missing metadata shows up as `null` fields. Only an unknown title or session is an error.
pub async fn view(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<ViewRequest>, JsonRejection>,
) -> AppResult<Json<MovieView>> {
    let Path(id) = path?;
    let Json(request) = body?;
    if request.title.trim().is_empty() {
        return Err(AppError::InvalidInput("title cannot be empty".to_string()));
    }

    // Resolve the title before touching the session
    let index = state
        .catalog
        .index_of(&request.title)
        .ok_or_else(|| AppError::UnknownTitle(request.title.clone()))?;
    let movie = state
        .catalog
        .get(index)
        .cloned()
        .ok_or_else(|| AppError::Internal(format!("Catalog index {} out of range", index)))?;

    // History is recorded before any metadata is fetched
    state
        .sessions
        .record_view(id, movie.movie_id, &movie.title)
        .await?;

    tracing::info!(
        request_id = %request_id,
        session_id = %id,
        movie_id = movie.movie_id,
        title = %movie.title,
        "Building movie view"
    );

    let similar = recommendations::recommend(&state.catalog, &movie.title)?;

    // Details, poster and every recommendation card are fetched concurrently
    let metadata = &state.metadata;
    let (details, poster, cards) = tokio::join!(
        metadata.get_movie_details(movie.movie_id),
        metadata.fetch_poster(movie.movie_id),
        join_all(similar.iter().map(|r| metadata.card(r))),
    );

    // Trailer only accompanies a successful detail lookup
    let trailer = match details {
        Some(_) => metadata.fetch_trailer(movie.movie_id).await,
        None => None,
    };

    let recent = state.sessions.recent(id, RECENT_LIMIT).await?;

    tracing::info!(
        request_id = %request_id,
        movie_id = movie.movie_id,
        has_details = details.is_some(),
        has_poster = poster.is_some(),
        has_trailer = trailer.is_some(),
        recommendations = cards.len(),
        "Movie view built"
    );

    Ok(Json(MovieView {
        movie_id: movie.movie_id,
        title: movie.title,
        poster,
        details,
        trailer,
        recommendations: cards,
        history: resolve_ids(&state.catalog, &recent),
    }))
}

fn resolve_ids(catalog: &Catalog, ids: &[u64]) -> Vec<Movie> {
    ids.iter()
        .filter_map(|id| catalog.find_by_id(*id).cloned())
        .collect()
}
