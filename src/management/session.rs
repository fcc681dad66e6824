use std::{collections::HashMap, path::PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::{error::SessionError, types::SessionData, utils};

/// Mutation applied to one session under the store's lock.
pub type SessionUpdate = Box<dyn FnOnce(&mut SessionData) + Send>;

/// How long an unfinished login may wait for its callback.
pub const PENDING_LIFETIME_SECS: i64 = 10 * 60;

const SECS_PER_DAY: i64 = 24 * 60 * 60;

/// Idle time after which a stored session is dropped.
///
/// Sessions still waiting for the OAuth callback get the much shorter
/// `pending_secs`, so abandoned logins do not pile up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLifetime {
    pub session_secs: i64,
    pub pending_secs: i64,
}

impl SessionLifetime {
    pub fn days(days: i64) -> Self {
        Self {
            session_secs: days.saturating_mul(SECS_PER_DAY),
            pending_secs: PENDING_LIFETIME_SECS,
        }
    }

    fn limit_for(&self, data: &SessionData) -> i64 {
        if data.token.is_some() {
            self.session_secs
        } else {
            self.pending_secs
        }
    }
}

impl Default for SessionLifetime {
    fn default() -> Self {
        Self::days(31)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionEntry {
    data: SessionData,
    touched_at: i64,
}

impl SessionEntry {
    fn new(data: SessionData, now: i64) -> Self {
        Self {
            data,
            touched_at: now,
        }
    }

    fn is_expired(&self, now: i64, lifetime: SessionLifetime) -> bool {
        now - self.touched_at > lifetime.limit_for(&self.data)
    }
}

type Entries = HashMap<String, SessionEntry>;

/// Drops expired entries and returns how many went.
fn purge(sessions: &mut Entries, now: i64, lifetime: SessionLifetime) -> usize {
    let before = sessions.len();
    sessions.retain(|_, entry| !entry.is_expired(now, lifetime));
    before - sessions.len()
}

/// Live entry for `id`, removing it when it has expired.
///
/// Returns the entry and whether the map changed.
fn live_entry<'a>(
    sessions: &'a mut Entries,
    id: &str,
    now: i64,
    lifetime: SessionLifetime,
) -> (Option<&'a mut SessionEntry>, bool) {
    let expired = sessions
        .get(id)
        .is_some_and(|entry| entry.is_expired(now, lifetime));

    if expired {
        sessions.remove(id);
        return (None, true);
    }
    (sessions.get_mut(id), false)
}

/// Server-side storage of [`SessionData`] keyed by the session cookie value.
///
/// Every write refreshes the session's idle clock. Expired sessions read as
/// missing and are swept out on the next save.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, id: &str) -> Result<Option<SessionData>, SessionError>;

    async fn save(&self, id: &str, data: SessionData) -> Result<(), SessionError>;

    /// Atomic read-modify-write of an existing session.
    ///
    /// Returns the updated data, or `None` without calling `f` when the
    /// session does not exist (e.g. it was logged out in the meantime).
    async fn update(&self, id: &str, f: SessionUpdate)
    -> Result<Option<SessionData>, SessionError>;

    async fn remove(&self, id: &str) -> Result<(), SessionError>;

    /// Removes every session that has been idle too long as of `now`.
    async fn purge_expired(&self, now: i64) -> Result<usize, SessionError>;
}

/// Process-local store; sessions are lost on restart.
#[derive(Default)]
pub struct MemorySessionStore {
    lifetime: SessionLifetime,
    sessions: RwLock<Entries>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lifetime(mut self, lifetime: SessionLifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &str) -> Result<Option<SessionData>, SessionError> {
        let mut sessions = self.sessions.write().await;
        let (entry, _) = live_entry(&mut sessions, id, utils::now_timestamp(), self.lifetime);
        Ok(entry.map(|entry| entry.data.clone()))
    }

    async fn save(&self, id: &str, data: SessionData) -> Result<(), SessionError> {
        let now = utils::now_timestamp();
        let mut sessions = self.sessions.write().await;

        let purged = purge(&mut sessions, now, self.lifetime);
        if purged > 0 {
            tracing::debug!(purged, "expired sessions removed");
        }

        sessions.insert(id.to_string(), SessionEntry::new(data, now));
        Ok(())
    }

    async fn update(
        &self,
        id: &str,
        f: SessionUpdate,
    ) -> Result<Option<SessionData>, SessionError> {
        let now = utils::now_timestamp();
        let mut sessions = self.sessions.write().await;
        let (entry, _) = live_entry(&mut sessions, id, now, self.lifetime);

        Ok(entry.map(|entry| {
            f(&mut entry.data);
            entry.touched_at = now;
            entry.data.clone()
        }))
    }

    async fn remove(&self, id: &str) -> Result<(), SessionError> {
        self.sessions.write().await.remove(id);
        Ok(())
    }

    async fn purge_expired(&self, now: i64) -> Result<usize, SessionError> {
        let mut sessions = self.sessions.write().await;
        Ok(purge(&mut sessions, now, self.lifetime))
    }
}

/// Sessions mirrored to a JSON file so logins survive a restart.
///
/// The whole map is rewritten after every mutation while the write lock is
/// held, so the file never interleaves two writers.
pub struct FileSessionStore {
    path: PathBuf,
    lifetime: SessionLifetime,
    sessions: RwLock<Entries>,
}

impl FileSessionStore {
    /// Opens the store, loading existing sessions when the file is present.
    pub async fn open(path: PathBuf) -> Result<Self, SessionError> {
        let sessions: Entries = match async_fs::read_to_string(&path).await {
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(SessionError::Io(e)),
        };

        tracing::info!(path = %path.display(), count = sessions.len(), "session store opened");

        Ok(Self {
            path,
            lifetime: SessionLifetime::default(),
            sessions: RwLock::new(sessions),
        })
    }

    pub fn with_lifetime(mut self, lifetime: SessionLifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    async fn persist(&self, sessions: &Entries) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(sessions)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self, id: &str) -> Result<Option<SessionData>, SessionError> {
        let mut sessions = self.sessions.write().await;
        let (entry, changed) =
            live_entry(&mut sessions, id, utils::now_timestamp(), self.lifetime);
        let data = entry.map(|entry| entry.data.clone());

        if changed {
            self.persist(&sessions).await?;
        }
        Ok(data)
    }

    async fn save(&self, id: &str, data: SessionData) -> Result<(), SessionError> {
        let now = utils::now_timestamp();
        let mut sessions = self.sessions.write().await;

        let purged = purge(&mut sessions, now, self.lifetime);
        if purged > 0 {
            tracing::debug!(purged, "expired sessions removed");
        }

        sessions.insert(id.to_string(), SessionEntry::new(data, now));
        self.persist(&sessions).await
    }

    async fn update(
        &self,
        id: &str,
        f: SessionUpdate,
    ) -> Result<Option<SessionData>, SessionError> {
        let now = utils::now_timestamp();
        let mut sessions = self.sessions.write().await;
        let (entry, changed) = live_entry(&mut sessions, id, now, self.lifetime);

        let updated = entry.map(|entry| {
            f(&mut entry.data);
            entry.touched_at = now;
            entry.data.clone()
        });

        if updated.is_some() || changed {
            self.persist(&sessions).await?;
        }
        Ok(updated)
    }

    async fn remove(&self, id: &str) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(id).is_some() {
            self.persist(&sessions).await?;
        }
        Ok(())
    }

    async fn purge_expired(&self, now: i64) -> Result<usize, SessionError> {
        let mut sessions = self.sessions.write().await;
        let purged = purge(&mut sessions, now, self.lifetime);

        if purged > 0 {
            self.persist(&sessions).await?;
        }
        Ok(purged)
    }
}
