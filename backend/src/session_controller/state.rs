//! Holds the context of every open UI session.
//!
//! Each browser tab opens a session and receives its id; every later request
//! names that id. The map itself is only locked long enough to look a session
//! up. Each session sits behind its own mutex, which is held for the whole
//! action, outbound calls included, so two actions never interleave on the
//! same session while other sessions proceed independently.
//!
//! The registry is bounded. Opening a session first drops sessions idle for
//! longer than `idle_timeout`, then the least recently used ones until there
//! is room under `max_sessions`. Closing a session removes it at once.

use common::model::record::Attributes;
use common::model::session::SessionState;
use log::info;
use std::time::{Duration, Instant};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::AppError;

pub const DEFAULT_MAX_SESSIONS: usize = 256;
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Server-side context of one session.
#[derive(Debug, Default)]
pub struct SessionEntry {
    pub state: SessionState,
    /// Rows of the last rendered table; row indices in actions refer to these.
    pub rows: Vec<Attributes>,
}

struct SessionSlot {
    entry: Arc<Mutex<SessionEntry>>,
    last_access: Instant,
}

impl SessionSlot {
    fn is_idle(&self, now: Instant, idle_timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_access) >= idle_timeout
    }
}

/// Shared, clonable registry of open sessions, injected as `web::Data`.
#[derive(Clone)]
pub struct SessionsState {
    sessions: Arc<RwLock<HashMap<String, SessionSlot>>>,
    max_sessions: usize,
    idle_timeout: Duration,
}

impl Default for SessionsState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SESSIONS, DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionsState {
    /// Creates an empty registry.
    ///
    /// # Arguments
    /// * `max_sessions` - Most sessions kept at once; at least one is always allowed.
    /// * `idle_timeout` - Sessions not used for this long are dropped on the next open.
    pub fn new(max_sessions: usize, idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_sessions: max_sessions.max(1),
            idle_timeout,
        }
    }

    /// Opens a fresh session on the login page and returns its id.
    ///
    /// Makes room first: idle sessions go, then the least recently used ones.
    pub async fn open(&self) -> (String, Arc<Mutex<SessionEntry>>) {
        let session_id = Uuid::new_v4().to_string();
        let entry = Arc::new(Mutex::new(SessionEntry::default()));
        let now = Instant::now();

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, slot| !slot.is_idle(now, self.idle_timeout));
        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, slot)| slot.last_access)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                }
                None => break,
            }
        }
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("evicted {} idle or least recently used sessions", evicted);
        }

        sessions.insert(
            session_id.clone(),
            SessionSlot {
                entry: entry.clone(),
                last_access: now,
            },
        );
        (session_id, entry)
    }

    /// Looks a session up and marks it as used.
    ///
    /// # Returns
    /// The session's entry, or `AppError::SessionNotFound` when the id is
    /// unknown, was closed, or has been idle past the timeout.
    pub async fn get(&self, session_id: &str) -> Result<Arc<Mutex<SessionEntry>>, AppError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let idle = match sessions.get_mut(session_id) {
            Some(slot) if !slot.is_idle(now, self.idle_timeout) => {
                slot.last_access = now;
                return Ok(slot.entry.clone());
            }
            Some(_) => true,
            None => false,
        };
        if idle {
            sessions.remove(session_id);
        }
        Err(AppError::SessionNotFound(session_id.to_string()))
    }

    /// Closes a session. Returns whether it was open.
    pub async fn remove(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
