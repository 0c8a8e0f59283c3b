use crate::{
    db::Catalog,
    error::{AppError, AppResult},
    models::Recommendation,
};

/// Number of similar titles returned per lookup
pub const RECOMMENDATION_COUNT: usize = 5;

/// Top similar titles for `title`
pub fn recommend(catalog: &Catalog, title: &str) -> AppResult<Vec<Recommendation>> {
    recommend_n(catalog, title, RECOMMENDATION_COUNT)
}

/// Up to `limit` titles most similar to `title`, best first
///
/// Scores come from the title's row in the similarity matrix. Equal scores keep catalog
/// order. The queried title itself is dropped by index, wherever its score lands.
pub fn recommend_n(catalog: &Catalog, title: &str, limit: usize) -> AppResult<Vec<Recommendation>> {
    let index = catalog
        .index_of(title)
        .ok_or_else(|| AppError::UnknownTitle(title.to_string()))?;

    let row = catalog.similarity_row(index).ok_or_else(|| {
        AppError::Internal(format!("No similarity row for catalog index {}", index))
    })?;

    let mut ranked: Vec<(usize, f32)> = row
        .iter()
        .copied()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .collect();

    // Stable sort, NaN ranks below every real score.
    ranked.sort_by(|a, b| rank_key(b.1).total_cmp(&rank_key(a.1)));

    let recommendations: Vec<Recommendation> = ranked
        .into_iter()
        .take(limit)
        .filter_map(|(i, score)| {
            catalog.get(i).map(|movie| Recommendation {
                movie_id: movie.movie_id,
                title: movie.title.clone(),
                score,
            })
        })
        .collect();

    tracing::debug!(
        title = %title,
        results = recommendations.len(),
        "Recommendations computed"
    );

    Ok(recommendations)
}

fn rank_key(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        score
    }
}
