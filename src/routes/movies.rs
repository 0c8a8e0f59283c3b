use std::sync::Arc;

use axum::{extract::State, Json};
use rand::seq::SliceRandom;

use crate::{
    error::{AppError, AppResult},
    models::Movie,
    routes::AppState,
};

/// Every title a caller may pick from
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<Movie>> {
    Json(state.catalog.movies().to_vec())
}

/// One catalog entry chosen at random
pub async fn random(State(state): State<Arc<AppState>>) -> AppResult<Json<Movie>> {
    let movie = state
        .catalog
        .movies()
        .choose(&mut rand::thread_rng())
        .cloned()
        .ok_or_else(|| AppError::Artifact("Catalog is empty".to_string()))?;

    tracing::debug!(movie_id = movie.movie_id, title = %movie.title, "Random pick");

    Ok(Json(movie))
}
