mod common;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use movie_rec_api::services::{
    http::RetryPolicy,
    providers::{MetadataError, MetadataProvider},
    MetadataFetcher,
};

use common::{fast_policy, inception, provider, trailers, FakeTmdb};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_fetch_poster_success() {
    let fake = FakeTmdb::new().with_movie(27205, inception());
    let url = fake.spawn().await;
    let fetcher = MetadataFetcher::new(Arc::new(provider(&url, fast_policy(5), TIMEOUT)));

    assert_eq!(
        fetcher.fetch_poster(27205).await,
        Some("https://image.tmdb.org/t/p/w500/inception.jpg".to_string())
    );
    assert_eq!(fake.hits(), 1);
}

#[tokio::test]
async fn test_fetch_poster_null_path_is_none() {
    let fake = FakeTmdb::new().with_movie(1, json!({"poster_path": null}));
    let url = fake.spawn().await;
    let tmdb = provider(&url, fast_policy(5), TIMEOUT);

    assert!(matches!(tmdb.try_fetch_poster(1).await, Ok(None)));
    assert_eq!(MetadataFetcher::new(Arc::new(tmdb)).fetch_poster(1).await, None);
}

#[tokio::test]
async fn test_retries_exactly_max_retries_on_server_errors() {
    let fake = FakeTmdb::new()
        .with_movie(1, inception())
        .with_statuses(&[500, 502, 504, 500, 502, 504, 500]);
    let url = fake.spawn().await;
    let tmdb = provider(&url, fast_policy(5), TIMEOUT);

    let result = tmdb.try_fetch_poster(1).await;

    assert!(matches!(result, Err(MetadataError::Transient(_))));
    // One initial attempt plus five retries.
    assert_eq!(fake.hits(), 6);
}

#[tokio::test]
async fn test_retry_succeeds_after_transient_statuses() {
    let fake = FakeTmdb::new()
        .with_movie(1, inception())
        .with_statuses(&[502, 504]);
    let url = fake.spawn().await;
    let fetcher = MetadataFetcher::new(Arc::new(provider(&url, fast_policy(5), TIMEOUT)));

    assert!(fetcher.fetch_poster(1).await.is_some());
    assert_eq!(fake.hits(), 3);
}

#[tokio::test]
async fn test_non_retryable_status_stops_immediately() {
    let fake = FakeTmdb::new()
        .with_movie(1, inception())
        .with_statuses(&[503]);
    let url = fake.spawn().await;
    let tmdb = provider(&url, fast_policy(5), TIMEOUT);

    assert!(matches!(
        tmdb.try_fetch_poster(1).await,
        Err(MetadataError::Status(status)) if status.as_u16() == 503
    ));
    assert_eq!(fake.hits(), 1);
}

#[tokio::test]
async fn test_unknown_movie_is_not_found() {
    let fake = FakeTmdb::new();
    let url = fake.spawn().await;
    let tmdb = provider(&url, fast_policy(5), TIMEOUT);

    assert!(matches!(
        tmdb.try_get_movie_details(404).await,
        Err(MetadataError::NotFound(404))
    ));
    assert_eq!(fake.hits(), 1);

    let fetcher = MetadataFetcher::new(Arc::new(tmdb));
    assert_eq!(fetcher.fetch_poster(404).await, None);
    assert_eq!(fetcher.fetch_trailer(404).await, None);
    assert_eq!(fetcher.get_movie_details(404).await, None);
}

#[tokio::test]
async fn test_wrong_api_key_is_status_error() {
    let fake = FakeTmdb::new().with_movie(1, inception());
    let url = fake.spawn().await;
    let client = movie_rec_api::services::http::RetryingClient::new(
        fast_policy(0),
        Duration::from_secs(1),
        TIMEOUT,
    )
    .unwrap();
    let tmdb = movie_rec_api::services::providers::TmdbProvider::new(
        client,
        "wrong".to_string(),
        url,
        "https://image.tmdb.org/t/p".to_string(),
    );

    assert!(matches!(
        tmdb.try_fetch_poster(1).await,
        Err(MetadataError::Status(status)) if status.as_u16() == 401
    ));
}

#[tokio::test]
async fn test_malformed_body_is_none() {
    let fake = FakeTmdb::new().with_movie(1, json!({"genres": "not-a-list"}));
    let url = fake.spawn().await;
    let tmdb = provider(&url, fast_policy(5), TIMEOUT);

    assert!(matches!(
        tmdb.try_get_movie_details(1).await,
        Err(MetadataError::Malformed(_))
    ));
    assert_eq!(MetadataFetcher::new(Arc::new(tmdb)).get_movie_details(1).await, None);
}

#[tokio::test]
async fn test_connection_refused_is_none() {
    // Reserve a port, then free it so nothing is listening there.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let tmdb = provider(&format!("http://{}/3", addr), fast_policy(2), TIMEOUT);

    assert!(matches!(
        tmdb.try_fetch_trailer(1).await,
        Err(MetadataError::Transient(_))
    ));
    assert_eq!(MetadataFetcher::new(Arc::new(tmdb)).fetch_trailer(1).await, None);
}

#[tokio::test]
async fn test_timeout_is_retried_then_none() {
    let fake = FakeTmdb::new()
        .with_movie(1, inception())
        .with_delay(Duration::from_secs(2));
    let url = fake.spawn().await;
    let policy = RetryPolicy {
        max_retries: 1,
        backoff_factor: Duration::ZERO,
        ..RetryPolicy::default()
    };
    let tmdb = provider(&url, policy, Duration::from_millis(200));

    assert!(matches!(
        tmdb.try_fetch_poster(1).await,
        Err(MetadataError::Transient(_))
    ));
    assert_eq!(fake.hits(), 2);
}

#[tokio::test]
async fn test_fetch_trailer_first_youtube_trailer() {
    let fake = FakeTmdb::new().with_videos(27205, trailers("YoHD9XEInc0"));
    let url = fake.spawn().await;
    let fetcher = MetadataFetcher::new(Arc::new(provider(&url, fast_policy(5), TIMEOUT)));

    assert_eq!(
        fetcher.fetch_trailer(27205).await,
        Some("https://youtu.be/YoHD9XEInc0".to_string())
    );
}

#[tokio::test]
async fn test_fetch_trailer_none_without_trailer() {
    let fake = FakeTmdb::new().with_videos(
        1,
        json!({"results": [{"type": "Teaser", "site": "YouTube", "key": "t"}]}),
    );
    let url = fake.spawn().await;
    let fetcher = MetadataFetcher::new(Arc::new(provider(&url, fast_policy(5), TIMEOUT)));

    assert_eq!(fetcher.fetch_trailer(1).await, None);
}

#[tokio::test]
async fn test_get_movie_details_requests_credits() {
    let fake = FakeTmdb::new().with_movie(27205, inception());
    let url = fake.spawn().await;
    let fetcher = MetadataFetcher::new(Arc::new(provider(&url, fast_policy(5), TIMEOUT)));

    let details = fetcher.get_movie_details(27205).await.unwrap();

    assert_eq!(details.rating, 8.4);
    assert_eq!(details.runtime_minutes, Some(148));
    assert_eq!(details.genres, "Action, Science Fiction");
    // Credits are only served when append_to_response=credits was sent.
    assert_eq!(details.director, "Christopher Nolan");
    assert_eq!(details.cast.len(), 5);
    assert_eq!(
        details.tagline.as_deref(),
        Some("Your mind is the scene of the crime.")
    );
}
