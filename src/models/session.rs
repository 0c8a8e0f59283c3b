use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of entries shown in the recently-viewed list
pub const RECENT_LIMIT: usize = 5;

/// Per-caller browsing context
///
/// Created when a caller opens a session and dropped when it is deleted. Only request
/// handlers read or write it, through the session store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub id: Uuid,
    /// Latest viewed TMDB ids in viewing order, at most `RECENT_LIMIT`
    pub history: Vec<u64>,
    /// Title currently on display
    pub selected_title: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Last time a handler read or wrote the session
    pub last_seen: DateTime<Utc>,
}

impl Session {
    /// Creates an empty session
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            history: Vec::new(),
            selected_title: None,
            created_at: now,
            last_seen: now,
        }
    }

    /// Appends a viewed movie unless it repeats the immediately preceding entry
    ///
    /// Only the newest `RECENT_LIMIT` entries are kept.
    pub fn push_history(&mut self, movie_id: u64) {
        if self.history.last() != Some(&movie_id) {
            self.history.push(movie_id);
        }
        if self.history.len() > RECENT_LIMIT {
            let excess = self.history.len() - RECENT_LIMIT;
            self.history.drain(..excess);
        }
    }

    pub fn touch(&mut self) {
        self.last_seen = Utc::now();
    }

    /// Whether the session has gone unused for at least `ttl`
    pub fn is_idle(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.last_seen >= ttl
    }

    /// Returns up to `limit` of the latest history entries, most recent first
    pub fn recent(&self, limit: usize) -> Vec<u64> {
        self.history.iter().rev().take(limit).copied().collect()
    }

    /// Records a view: updates the selection and history together
    pub fn view(&mut self, movie_id: u64, title: &str) {
        self.selected_title = Some(title.to_string());
        self.push_history(movie_id);
        self.touch();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
