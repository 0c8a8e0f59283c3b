use serde::{Deserialize, Serialize};

pub mod session;

pub use session::Session;

/// Number of cast entries kept on a detail record
pub const CAST_LIMIT: usize = 5;

/// One row of the catalog artifact. Row order is the similarity matrix index space.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movie {
    /// TMDB id
    pub movie_id: u64,
    pub title: String,
}

impl Movie {
    pub fn new(movie_id: u64, title: impl Into<String>) -> Self {
        Self {
            movie_id,
            title: title.into(),
        }
    }
}

/// A similar title returned by the recommendation engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub movie_id: u64,
    pub title: String,
    pub score: f32,
}

/// Enrichment data for a single title, built from TMDB's detail+credits response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    /// Vote average rounded to one decimal, 0 when absent
    pub rating: f64,
    pub runtime_minutes: Option<u32>,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    /// Genre names joined with ", "
    pub genres: String,
    /// Names of every crew member credited as Director, joined with ", "
    pub director: String,
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Card for a recommended title in the detail view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationCard {
    pub movie_id: u64,
    pub title: String,
    pub poster: Option<String>,
    pub trailer: Option<String>,
}

/// Everything a caller needs to render a title's page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieView {
    pub movie_id: u64,
    pub title: String,
    pub poster: Option<String>,
    pub details: Option<MovieDetails>,
    pub trailer: Option<String>,
    pub recommendations: Vec<RecommendationCard>,
    /// Recently viewed, most recent first
    pub history: Vec<Movie>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Response from GET /movie/{id}, optionally with `append_to_response=credits`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<TmdbGenre>>,
    #[serde(default)]
    pub credits: Option<TmdbCredits>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Option<Vec<CastMember>>,
    #[serde(default)]
    pub crew: Option<Vec<TmdbCrewMember>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCrewMember {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub job: Option<String>,
}

/// Response from GET /movie/{id}/videos
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideoList {
    #[serde(default)]
    pub results: Option<Vec<TmdbVideo>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideo {
    #[serde(rename = "type", default)]
    pub video_type: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

impl From<TmdbMovie> for MovieDetails {
    fn from(movie: TmdbMovie) -> Self {
        let credits = movie.credits.unwrap_or_default();

        let genres = movie
            .genres
            .unwrap_or_default()
            .into_iter()
            .map(|g| g.name)
            .collect::<Vec<_>>()
            .join(", ");

        let director = credits
            .crew
            .unwrap_or_default()
            .into_iter()
            .filter(|c| c.job.as_deref() == Some("Director"))
            .map(|c| c.name)
            .collect::<Vec<_>>()
            .join(", ");

        let cast = credits
            .cast
            .unwrap_or_default()
            .into_iter()
            .take(CAST_LIMIT)
            .collect();

        MovieDetails {
            rating: round_to_tenth(movie.vote_average.unwrap_or(0.0)),
            runtime_minutes: movie.runtime,
            tagline: movie.tagline.filter(|t| !t.is_empty()),
            overview: movie.overview,
            genres,
            director,
            cast,
        }
    }
}

/// Rounds on the exact decimal value, ties to even, so 8.25 becomes 8.2
fn round_to_tenth(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}
