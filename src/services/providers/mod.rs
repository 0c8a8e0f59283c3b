/// Movie metadata provider abstraction
///
/// Providers answer three lookups keyed by TMDB id: poster, trailer and detail record.
/// They report failures precisely through [`MetadataError`]; collapsing those into
/// "nothing found" is the job of [`crate::services::metadata::MetadataFetcher`].
use reqwest::StatusCode;

use crate::models::MovieDetails;

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Why a metadata lookup produced nothing
#[derive(thiserror::Error, Debug)]
pub enum MetadataError {
    /// The remote service has no such movie
    #[error("Movie {0} not found")]
    NotFound(u64),

    /// Connection/read failure or retryable status that outlived the retry policy
    #[error("Transient failure: {0}")]
    Transient(String),

    /// Any other non-200 status
    #[error("Unexpected status {0}")]
    Status(StatusCode),

    /// Body could not be decoded
    #[error("Malformed response: {0}")]
    Malformed(String),
}

pub type MetadataResult<T> = Result<T, MetadataError>;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Full poster image URL, `Ok(None)` when the movie has no poster
    async fn try_fetch_poster(&self, movie_id: u64) -> MetadataResult<Option<String>>;

    /// Watch URL of the first YouTube trailer, `Ok(None)` when there is none
    async fn try_fetch_trailer(&self, movie_id: u64) -> MetadataResult<Option<String>>;

    /// Detail record including director and leading cast
    async fn try_get_movie_details(&self, movie_id: u64) -> MetadataResult<MovieDetails>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
