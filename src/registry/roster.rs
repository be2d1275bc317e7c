use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::session::SessionHandle;

/// Process-wide directory of live sessions.
///
/// The registry is the sole arbiter of "who is currently connected". Every
/// enumeration or broadcast in the session layer goes through `snapshot`,
/// which copies the handle set under the lock and releases it before any
/// delivery happens. Delivering to N recipients therefore never holds the
/// registry lock across N channel pushes, and a session removed mid-broadcast
/// either keeps its snapshot slot or was cleanly excluded.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    sessions: Mutex<HashMap<String, Arc<SessionHandle>>>,
}

impl ClientRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a session handle. Called once when a connection is accepted.
    pub fn add(&self, session: Arc<SessionHandle>) {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.insert(session.id().to_string(), session);
    }

    /// Removes a session handle by id.
    ///
    /// Idempotent: removing an id that is already gone is a no-op, so every
    /// connection exit path can call this unconditionally.
    pub fn remove(&self, id: &str) {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.remove(id);
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    /// Whether no sessions are connected.
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().unwrap().is_empty()
    }

    /// Returns a point-in-time copy of all live session handles.
    ///
    /// Sorted by session id so enumeration (`who-is-online`) is
    /// deterministic for a given set of sessions.
    pub fn snapshot(&self) -> Vec<Arc<SessionHandle>> {
        let sessions = self.sessions.lock().unwrap();
        let mut handles: Vec<_> = sessions.values().cloned().collect();
        drop(sessions);
        handles.sort_by(|a, b| a.id().cmp(b.id()));
        handles
    }

    /// Finds the authenticated session whose identity matches `name`,
    /// ignoring ASCII case. Guests never match.
    pub fn find_by_identity(&self, name: &str) -> Option<Arc<SessionHandle>> {
        self.snapshot()
            .into_iter()
            .find(|s| s.identity().is_some_and(|id| id.eq_ignore_ascii_case(name)))
    }
}
