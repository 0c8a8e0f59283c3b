/// TMDB v3 provider
///
/// Endpoints used, all keyed by TMDB movie id and authenticated with the `api_key` query
/// parameter:
/// 1. Detail: /movie/{id} → `poster_path`
/// 2. Detail + credits: /movie/{id}?append_to_response=credits → detail record
/// 3. Videos: /movie/{id}/videos → trailer key
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::{
    models::{MovieDetails, TmdbMovie, TmdbVideoList},
    services::{
        http::RetryingClient,
        providers::{MetadataError, MetadataProvider, MetadataResult},
    },
};

const POSTER_SIZE: &str = "w500";
const TRAILER_TYPE: &str = "Trailer";
const TRAILER_SITE: &str = "YouTube";
const TRAILER_URL: &str = "https://youtu.be";

#[derive(Clone)]
pub struct TmdbProvider {
    client: RetryingClient,
    api_key: String,
    api_url: String,
    image_url: String,
}

impl TmdbProvider {
    pub fn new(client: RetryingClient, api_key: String, api_url: String, image_url: String) -> Self {
        Self {
            client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            image_url: image_url.trim_end_matches('/').to_string(),
        }
    }

    /// Issues a GET through the retrying client and decodes a 200 body
    async fn get_json<T: DeserializeOwned>(
        &self,
        movie_id: u64,
        path: &str,
        extra_query: &[(&str, &str)],
    ) -> MetadataResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let mut query = vec![("api_key", self.api_key.as_str())];
        query.extend_from_slice(extra_query);

        let response = self
            .client
            .get(&url, &query)
            .await
            .map_err(|e| MetadataError::Transient(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(self.classify_status(movie_id, status));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| MetadataError::Transient(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| {
            tracing::debug!(
                movie_id,
                path = %path,
                error = %e,
                "Failed to deserialize TMDB response"
            );
            MetadataError::Malformed(e.to_string())
        })
    }

    fn classify_status(&self, movie_id: u64, status: StatusCode) -> MetadataError {
        if status == StatusCode::NOT_FOUND {
            MetadataError::NotFound(movie_id)
        } else if self.client.policy().is_retryable_status(status) {
            MetadataError::Transient(format!("status {} after retries", status))
        } else {
            MetadataError::Status(status)
        }
    }

    fn poster_url(&self, poster_path: Option<String>) -> Option<String> {
        poster_path
            .filter(|p| !p.is_empty())
            .map(|p| format!("{}/{}{}", self.image_url, POSTER_SIZE, p))
    }

    fn trailer_url(videos: TmdbVideoList) -> Option<String> {
        videos
            .results
            .unwrap_or_default()
            .into_iter()
            .find(|v| {
                v.video_type.as_deref() == Some(TRAILER_TYPE) && v.site.as_deref() == Some(TRAILER_SITE)
            })
            .and_then(|v| v.key)
            .map(|key| format!("{}/{}", TRAILER_URL, key))
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn try_fetch_poster(&self, movie_id: u64) -> MetadataResult<Option<String>> {
        let movie: TmdbMovie = self
            .get_json(movie_id, &format!("/movie/{}", movie_id), &[])
            .await?;
        Ok(self.poster_url(movie.poster_path))
    }

    async fn try_fetch_trailer(&self, movie_id: u64) -> MetadataResult<Option<String>> {
        let videos: TmdbVideoList = self
            .get_json(movie_id, &format!("/movie/{}/videos", movie_id), &[])
            .await?;
        Ok(Self::trailer_url(videos))
    }

    async fn try_get_movie_details(&self, movie_id: u64) -> MetadataResult<MovieDetails> {
        let movie: TmdbMovie = self
            .get_json(
                movie_id,
                &format!("/movie/{}", movie_id),
                &[("append_to_response", "credits")],
            )
            .await?;

        let details = MovieDetails::from(movie);

        tracing::debug!(
            movie_id,
            cast = details.cast.len(),
            provider = "tmdb",
            "Movie details fetched"
        );

        Ok(details)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
