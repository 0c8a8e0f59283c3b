use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::Session,
};

/// Idle time after which a session may be evicted
pub const DEFAULT_IDLE_TTL_SECS: i64 = 3600;

/// In-memory store of live sessions
///
/// Sessions live until deleted, until they sit idle past the TTL, or until the process
/// exits; nothing is persisted. Idle sessions are swept whenever a new one is opened.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_ttl(Duration::seconds(DEFAULT_IDLE_TTL_SECS))
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
        }
    }

    /// Opens a new empty session and returns its id
    pub async fn create(&self) -> Uuid {
        let session = Session::new();
        let id = session.id;

        let mut sessions = self.inner.write().await;
        let evicted = self.sweep_idle(&mut sessions);
        sessions.insert(id, session);

        tracing::debug!(session_id = %id, evicted, live = sessions.len(), "Session created");
        id
    }

    fn sweep_idle(&self, sessions: &mut HashMap<Uuid, Session>) -> usize {
        let now = Utc::now();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_idle(now, self.idle_ttl));
        before - sessions.len()
    }

    /// Tears a session down. Returns whether it existed.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.inner.write().await.remove(&id).is_some();
        tracing::debug!(session_id = %id, removed, "Session removed");
        removed
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Session> {
        self.inner
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(AppError::SessionNotFound(id))
    }

    /// Marks a title as viewed in the session
    pub async fn record_view(&self, id: Uuid, movie_id: u64, title: &str) -> AppResult<()> {
        let mut sessions = self.inner.write().await;
        let session = sessions.get_mut(&id).ok_or(AppError::SessionNotFound(id))?;
        session.view(movie_id, title);
        Ok(())
    }

    /// Latest viewed ids, most recent first. Counts as activity on the session.
    pub async fn recent(&self, id: Uuid, limit: usize) -> AppResult<Vec<u64>> {
        let mut sessions = self.inner.write().await;
        let session = sessions.get_mut(&id).ok_or(AppError::SessionNotFound(id))?;
        session.touch();
        Ok(session.recent(limit))
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
