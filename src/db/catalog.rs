use std::path::Path;

use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    models::Movie,
};

pub const MOVIE_LIST_FILE: &str = "movie_list.json";
pub const SIMILARITY_FILE: &str = "similarity.json";

/// Read-only movie catalog with its precomputed similarity matrix
///
/// `similarity[i][j]` is the similarity of `movies[i]` to `movies[j]`. Both are loaded once
/// at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Catalog {
    movies: Vec<Movie>,
    similarity: Vec<Vec<f32>>,
}

impl Catalog {
    /// Builds a catalog, rejecting a matrix that is not square over the movie list
    pub fn new(movies: Vec<Movie>, similarity: Vec<Vec<f32>>) -> AppResult<Self> {
        if similarity.len() != movies.len() {
            return Err(AppError::Artifact(format!(
                "similarity matrix has {} rows but catalog has {} movies",
                similarity.len(),
                movies.len()
            )));
        }

        if let Some((row, cols)) = similarity
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != movies.len())
            .map(|(i, r)| (i, r.len()))
        {
            return Err(AppError::Artifact(format!(
                "similarity row {} has {} columns, expected {}",
                row,
                cols,
                movies.len()
            )));
        }

        Ok(Self { movies, similarity })
    }

    /// Loads `movie_list.json` and `similarity.json` from `data_dir`
    pub fn load(data_dir: &Path) -> AppResult<Self> {
        let movies: Vec<Movie> = read_json(&data_dir.join(MOVIE_LIST_FILE))?;
        let similarity: Vec<Vec<f32>> = read_json(&data_dir.join(SIMILARITY_FILE))?;

        let catalog = Self::new(movies, similarity)?;

        tracing::info!(
            data_dir = %data_dir.display(),
            movies = catalog.len(),
            "Loaded catalog and similarity matrix"
        );

        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn get(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    /// Row index of the first movie whose title matches exactly
    pub fn index_of(&self, title: &str) -> Option<usize> {
        self.movies.iter().position(|m| m.title == title)
    }

    /// First movie with the given TMDB id
    pub fn find_by_id(&self, movie_id: u64) -> Option<&Movie> {
        self.movies.iter().find(|m| m.movie_id == movie_id)
    }

    pub fn similarity_row(&self, index: usize) -> Option<&[f32]> {
        self.similarity.get(index).map(Vec::as_slice)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let bytes = std::fs::read(path).map_err(|e| {
        AppError::Artifact(format!("Failed to read {}: {}", path.display(), e))
    })?;

    serde_json::from_slice(&bytes).map_err(|e| {
        AppError::Artifact(format!("Failed to parse {}: {}", path.display(), e))
    })
}
