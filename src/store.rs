//! In-memory session store with idle expiry.
//!
//! Every mutation is a read-modify-write of one whole [`Session`] under the write
//! lock: the closure runs on a copy, and the copy replaces the stored session only
//! if the closure succeeds. Two concurrent "start round" calls therefore serialize;
//! the second one sees the first one's round and is rejected.

use crate::models::{Session, SessionError, SessionId};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("session store lock poisoned")]
    LockPoisoned,
}

/// Per-session entry: session data + last activity time (for expiry).
struct SessionEntry {
    session: Session,
    last_activity: Instant,
}

pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, SessionEntry>>,
    ttl: Duration,
}

impl SessionStore {
    /// Sessions not touched for `ttl` are removed by [`SessionStore::purge_inactive`].
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Store a new session and return it.
    pub fn insert(&self, session: Session) -> Result<Session, StoreError> {
        let mut g = self.sessions.write().map_err(|_| StoreError::LockPoisoned)?;
        log::info!(
            "session {} created with {} player(s) on {} court(s)",
            session.id,
            session.players.len(),
            session.num_courts
        );
        g.insert(
            session.id,
            SessionEntry {
                session: session.clone(),
                last_activity: Instant::now(),
            },
        );
        Ok(session)
    }

    /// Snapshot of a session. Reading counts as activity.
    pub fn get(&self, id: SessionId) -> Result<Session, StoreError> {
        let mut g = self.sessions.write().map_err(|_| StoreError::LockPoisoned)?;
        let entry = g.get_mut(&id).ok_or(SessionError::SessionNotFound(id))?;
        entry.last_activity = Instant::now();
        Ok(entry.session.clone())
    }

    /// The most recently created session that has not ended.
    pub fn active(&self) -> Result<Option<Session>, StoreError> {
        let g = self.sessions.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(g
            .values()
            .map(|e| &e.session)
            .filter(|s| !s.ended)
            .max_by_key(|s| s.created_at)
            .cloned())
    }

    /// Run `f` against a copy of the session and commit the copy only if `f` succeeds.
    /// On error the stored session is untouched.
    pub fn update<T, F>(&self, id: SessionId, f: F) -> Result<(Session, T), StoreError>
    where
        F: FnOnce(&mut Session) -> Result<T, SessionError>,
    {
        let mut g = self.sessions.write().map_err(|_| StoreError::LockPoisoned)?;
        let entry = g.get_mut(&id).ok_or(SessionError::SessionNotFound(id))?;
        entry.last_activity = Instant::now();
        let mut draft = entry.session.clone();
        let value = f(&mut draft)?;
        draft.version += 1;
        draft.updated_at = Utc::now();
        entry.session = draft;
        Ok((entry.session.clone(), value))
    }

    /// Remove a session entirely. Any state is accepted, including ended.
    pub fn delete(&self, id: SessionId) -> Result<(), StoreError> {
        let mut g = self.sessions.write().map_err(|_| StoreError::LockPoisoned)?;
        g.remove(&id).ok_or(SessionError::SessionNotFound(id))?;
        log::info!("session {} deleted", id);
        Ok(())
    }

    /// Drop sessions idle for at least the TTL; returns how many were removed.
    pub fn purge_inactive(&self) -> Result<usize, StoreError> {
        let mut g = self.sessions.write().map_err(|_| StoreError::LockPoisoned)?;
        let before = g.len();
        g.retain(|_, entry| entry.last_activity.elapsed() < self.ttl);
        Ok(before - g.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
