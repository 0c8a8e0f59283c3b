use std::sync::Arc;

use crate::{
    models::{MovieDetails, Recommendation, RecommendationCard},
    services::providers::{MetadataError, MetadataProvider, MetadataResult},
};

/// Caller-facing metadata lookups
///
/// Every failure becomes `None` so the caller can simply leave that part of the page out.
/// The underlying [`MetadataError`] is logged, not returned.
#[derive(Clone)]
pub struct MetadataFetcher {
    provider: Arc<dyn MetadataProvider>,
}

impl MetadataFetcher {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self { provider }
    }

    pub async fn fetch_poster(&self, movie_id: u64) -> Option<String> {
        let result = self.provider.try_fetch_poster(movie_id).await;
        self.found(result, "poster", movie_id).flatten()
    }

    pub async fn fetch_trailer(&self, movie_id: u64) -> Option<String> {
        let result = self.provider.try_fetch_trailer(movie_id).await;
        self.found(result, "trailer", movie_id).flatten()
    }

    pub async fn get_movie_details(&self, movie_id: u64) -> Option<MovieDetails> {
        let result = self.provider.try_get_movie_details(movie_id).await;
        self.found(result, "details", movie_id)
    }

    /// Poster and trailer for a recommended title
    pub async fn card(&self, recommendation: &Recommendation) -> RecommendationCard {
        let (poster, trailer) = tokio::join!(
            self.fetch_poster(recommendation.movie_id),
            self.fetch_trailer(recommendation.movie_id)
        );

        RecommendationCard {
            movie_id: recommendation.movie_id,
            title: recommendation.title.clone(),
            poster,
            trailer,
        }
    }

    fn found<T>(&self, result: MetadataResult<T>, kind: &'static str, movie_id: u64) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(MetadataError::NotFound(_)) => {
                tracing::debug!(movie_id, kind, provider = self.provider.name(), "Metadata not found");
                None
            }
            Err(e) => {
                tracing::warn!(
                    movie_id,
                    kind,
                    provider = self.provider.name(),
                    error = %e,
                    "Metadata lookup failed"
                );
                None
            }
        }
    }
}
