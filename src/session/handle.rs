use std::collections::HashSet;
use std::sync::Mutex;

use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

/// Mutable per-session state: who the session is logged in as, and which
/// topics it has joined.
#[derive(Debug, Default)]
struct SessionState {
    identity: Option<String>,
    topics: HashSet<String>,
}

/// Shared handle for one connected session.
///
/// The handle is what the registry stores and what peer sessions see: an
/// opaque id, an outbound channel, and the identity/topic state needed to
/// decide delivery. The session's own command loop mutates the state; peers
/// only read it and push lines onto `outbound`.
///
/// Outbound lines are drained by a single writer task per connection, so
/// writes onto one socket never interleave.
#[derive(Debug)]
pub struct SessionHandle {
    id: String,
    outbound: UnboundedSender<String>,
    state: Mutex<SessionState>,
}

impl SessionHandle {
    /// Creates a handle around the outbound channel of a fresh connection.
    pub fn new(outbound: UnboundedSender<String>) -> Self {
        Self {
            id: format!("session-{}", uuid::Uuid::new_v4()),
            outbound,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Unique identifier for the session, stable for the connection's lifetime.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The authenticated username, if `login` has succeeded.
    pub fn identity(&self) -> Option<String> {
        self.state.lock().unwrap().identity.clone()
    }

    /// Whether the session has authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.state.lock().unwrap().identity.is_some()
    }

    /// Binds the authenticated username to this session.
    pub fn set_identity(&self, username: &str) {
        self.state.lock().unwrap().identity = Some(username.trim().to_string());
    }

    /// Adds a topic to this session's membership set. Idempotent.
    pub fn join_topic(&self, topic: &str) {
        self.state.lock().unwrap().topics.insert(topic.to_string());
    }

    /// Removes a topic from this session's membership set. Idempotent.
    pub fn leave_topic(&self, topic: &str) {
        self.state.lock().unwrap().topics.remove(topic);
    }

    /// Whether this session has joined the given topic.
    pub fn is_member_of(&self, topic: &str) -> bool {
        self.state.lock().unwrap().topics.contains(topic)
    }

    /// Delivers a notification line to this session.
    ///
    /// No-op while the session is unauthenticated: guests accumulate no
    /// peer notifications.
    pub fn send(&self, line: &str) {
        if self.is_authenticated() {
            self.write(line);
        }
    }

    /// Writes a protocol response line to this session, authenticated or not.
    ///
    /// Used for the session's own command responses (`ok login`,
    /// `error register`, ...), which must reach guests too.
    pub fn reply(&self, line: &str) {
        self.write(line);
    }

    fn write(&self, line: &str) {
        // CRLF-terminated, one line per message.
        if let Err(e) = self.outbound.send(format!("{line}\r\n")) {
            warn!(session = %self.id, error = %e, "dropping line for closed session");
        }
    }
}
