#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use movie_rec_api::services::{
    http::{RetryPolicy, RetryingClient},
    providers::TmdbProvider,
};

pub const API_KEY: &str = "test_key";

/// Scripted stand-in for TMDB
///
/// Each request pops the next queued status; once the queue is empty the movie's canned
/// body is served with 200. Unknown ids get 404.
#[derive(Clone, Default)]
pub struct FakeTmdb {
    pub hits: Arc<AtomicUsize>,
    statuses: Arc<Mutex<VecDeque<u16>>>,
    movies: Arc<Mutex<HashMap<u64, Value>>>,
    videos: Arc<Mutex<HashMap<u64, Value>>>,
    delay: Arc<Mutex<Option<Duration>>>,
}

impl FakeTmdb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_movie(self, id: u64, body: Value) -> Self {
        self.movies.lock().unwrap().insert(id, body);
        self
    }

    pub fn with_videos(self, id: u64, body: Value) -> Self {
        self.videos.lock().unwrap().insert(id, body);
        self
    }

    pub fn with_statuses(self, statuses: &[u16]) -> Self {
        self.statuses.lock().unwrap().extend(statuses.iter().copied());
        self
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    async fn respond(
        &self,
        store: &Mutex<HashMap<u64, Value>>,
        id: u64,
        params: HashMap<String, String>,
    ) -> Response {
        self.hits.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if params.get("api_key").map(String::as_str) != Some(API_KEY) {
            return (StatusCode::UNAUTHORIZED, Json(json!({"status_code": 7}))).into_response();
        }

        let queued = self.statuses.lock().unwrap().pop_front();
        if let Some(code) = queued {
            let status = StatusCode::from_u16(code).unwrap();
            return (status, Json(json!({"status_message": "scripted"}))).into_response();
        }

        let body = store.lock().unwrap().get(&id).cloned();
        match body {
            Some(mut body) => {
                if params.get("append_to_response").map(String::as_str) != Some("credits") {
                    if let Some(obj) = body.as_object_mut() {
                        obj.remove("credits");
                    }
                }
                (StatusCode::OK, Json(body)).into_response()
            }
            None => (StatusCode::NOT_FOUND, Json(json!({"status_code": 34}))).into_response(),
        }
    }

    pub fn router(&self) -> Router {
        let movie = self.clone();
        let videos = self.clone();

        Router::new()
            .route(
                "/3/movie/:id",
                get(
                    move |Path(id): Path<u64>, Query(params): Query<HashMap<String, String>>| {
                        let fake = movie.clone();
                        async move { fake.respond(&fake.movies, id, params).await }
                    },
                ),
            )
            .route(
                "/3/movie/:id/videos",
                get(
                    move |Path(id): Path<u64>, Query(params): Query<HashMap<String, String>>| {
                        let fake = videos.clone();
                        async move { fake.respond(&fake.videos, id, params).await }
                    },
                ),
            )
    }

    /// Serves the fake on an ephemeral port and returns its base URL
    pub async fn spawn(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = self.router();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/3", addr)
    }
}

/// Retry policy with no sleeping so tests run fast
pub fn fast_policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        backoff_factor: Duration::ZERO,
        ..RetryPolicy::default()
    }
}

pub fn provider(api_url: &str, policy: RetryPolicy, timeout: Duration) -> TmdbProvider {
    let client = RetryingClient::new(policy, Duration::from_secs(1), timeout).unwrap();
    TmdbProvider::new(
        client,
        API_KEY.to_string(),
        api_url.to_string(),
        "https://image.tmdb.org/t/p".to_string(),
    )
}

pub fn inception() -> Value {
    json!({
        "id": 27205,
        "poster_path": "/inception.jpg",
        "vote_average": 8.369,
        "runtime": 148,
        "tagline": "Your mind is the scene of the crime.",
        "overview": "Cobb, a skilled thief who commits corporate espionage...",
        "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
        "credits": {
            "cast": [
                {"name": "Leonardo DiCaprio", "character": "Cobb"},
                {"name": "Joseph Gordon-Levitt", "character": "Arthur"},
                {"name": "Elliot Page", "character": "Ariadne"},
                {"name": "Tom Hardy", "character": "Eames"},
                {"name": "Ken Watanabe", "character": "Saito"},
                {"name": "Cillian Murphy", "character": "Robert Fischer"}
            ],
            "crew": [
                {"name": "Christopher Nolan", "job": "Director"},
                {"name": "Hans Zimmer", "job": "Original Music Composer"}
            ]
        }
    })
}

pub fn trailers(key: &str) -> Value {
    json!({
        "id": 27205,
        "results": [
            {"type": "Featurette", "site": "YouTube", "key": "featurette"},
            {"type": "Trailer", "site": "YouTube", "key": key}
        ]
    })
}
