use std::sync::Arc;

use tracing::{debug, info};

use crate::registry::ClientRegistry;
use crate::session::SessionHandle;
use crate::users::UserStore;

const LOGIN_REQUIRED_FOR_MESSAGES: &str =
    "You have to login in order to be allowed to send messages";
const LOGIN_REQUIRED_FOR_LISTING: &str =
    "You have to login in order to see the list of online users";
const GUEST_NOTICE: &str =
    "You are a Guest. Login to have access on services such as sending and receiving messages";

/// What the connection loop should do after a command has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading commands from this connection.
    Continue,
    /// Stop reading; the session has logged off or deregistered.
    Close,
}

/// Protocol state machine for one connection.
///
/// Owns nothing network-facing itself: it reads parsed lines, mutates its
/// own `SessionHandle`, consults the user store, and pushes delivery lines
/// onto peer handles obtained from registry snapshots.
pub struct Session {
    handle: Arc<SessionHandle>,
    registry: Arc<ClientRegistry>,
    users: Arc<UserStore>,
}

impl Session {
    pub fn new(
        handle: Arc<SessionHandle>,
        registry: Arc<ClientRegistry>,
        users: Arc<UserStore>,
    ) -> Self {
        Self {
            handle,
            registry,
            users,
        }
    }

    /// The shared handle this session registered with.
    pub fn handle(&self) -> &Arc<SessionHandle> {
        &self.handle
    }

    /// Handles one input line and reports whether the connection should stay open.
    ///
    /// Commands are whitespace-tokenized; the first token is matched
    /// case-insensitively. Malformed lines are answered with a fixed error
    /// string or ignored, never treated as fatal.
    pub fn handle_line(&self, line: &str) -> Flow {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = tokens.first() else {
            return Flow::Continue;
        };
        let cmd = first.to_lowercase();

        match cmd.as_str() {
            "login" => self.process_login(&tokens),
            "register" => self.process_register(&tokens),
            "deregister" => return self.process_deregister(),
            "logoff" | "quit" => {
                self.process_logoff();
                return Flow::Close;
            }
            "msg" => self.process_message(line),
            "msg-broadcast" => self.process_broadcast(line),
            "join" => self.process_join(&tokens),
            "leave" => self.process_leave(&tokens),
            "who-is-online" | "who-is-connected" => self.process_who_is_online(),
            "whoami" => self.process_whoami(),
            _ => self.handle.reply(&format!("unknown {cmd}")),
        }

        Flow::Continue
    }

    /// `login <user> <pass>`. Any other arity is silently ignored.
    ///
    /// The identity binds at most once per session: a second `login` on an
    /// already authenticated session is rejected without touching state.
    fn process_login(&self, tokens: &[&str]) {
        if tokens.len() != 3 {
            return;
        }
        if self.handle.is_authenticated() {
            self.handle.reply("error login");
            debug!(session = %self.handle.id(), "login attempt on authenticated session");
            return;
        }
        let (username, password) = (tokens[1], tokens[2]);

        if !self.users.verify(username, password) {
            self.handle.reply("error login");
            debug!(user = username, "login failed");
            return;
        }

        self.handle.reply("ok login");
        self.handle.set_identity(username);
        info!(session = %self.handle.id(), user = username, "user logged in");

        let peers = self.registry.snapshot();

        // Tell the new arrival who is already online.
        for peer in peers.iter().filter(|p| p.id() != self.handle.id()) {
            if let Some(name) = peer.identity() {
                self.handle.send(&format!("online {name}"));
            }
        }

        // Tell everyone else the new arrival is online.
        let announcement = format!("online {username}");
        for peer in peers.iter().filter(|p| p.id() != self.handle.id()) {
            peer.send(&announcement);
        }
    }

    /// `register <user> <pass>`
    fn process_register(&self, tokens: &[&str]) {
        if tokens.len() != 3 {
            self.handle.reply("error register");
            return;
        }
        let (username, password) = (tokens[1], tokens[2]);

        if self.users.register(username, password) {
            self.handle.reply("ok register");
            info!(user = username, "user registered");
        } else {
            self.handle.reply("error register. Username is already taken");
            debug!(user = username, "register failed, username taken");
        }
    }

    /// `deregister`. Requires an authenticated session.
    fn process_deregister(&self) -> Flow {
        let Some(username) = self.handle.identity() else {
            self.handle
                .reply("error deregister. You must be logged in to be able to deregister");
            return Flow::Continue;
        };

        // The credential can already be gone if another session running as
        // the same user deregistered first; the session stays open then.
        if !self.users.deregister(&username) {
            self.handle.reply(&format!("error deregister: {username}"));
            return Flow::Continue;
        }

        self.registry.remove(self.handle.id());
        self.handle.reply(&format!("ok deregister: {username}"));
        info!(session = %self.handle.id(), user = %username, "user deregistered");

        let farewell = format!("deregistered {username}");
        for peer in self.registry.snapshot() {
            peer.send(&farewell);
        }

        Flow::Close
    }

    /// `logoff` / `quit`
    fn process_logoff(&self) {
        self.registry.remove(self.handle.id());

        if let Some(username) = self.handle.identity() {
            info!(session = %self.handle.id(), user = %username, "user logged off");
            let announcement = format!("offline {username}");
            for peer in self.registry.snapshot() {
                peer.send(&announcement);
            }
        }
    }

    /// `msg <target> <body>`: direct message or topic delivery.
    ///
    /// The raw line is re-split so the body keeps its internal spaces.
    fn process_message(&self, line: &str) {
        let Some(sender) = self.handle.identity() else {
            self.handle.reply(LOGIN_REQUIRED_FOR_MESSAGES);
            return;
        };

        let parts = split_limit(line, 3);
        if parts.len() != 3 {
            return;
        }
        let (target, body) = (parts[1], parts[2]);

        if target.starts_with('#') {
            // Recipients are determined purely by topic membership; the
            // sender receives its own message iff it joined the topic.
            let delivery = format!("msg {target}:{sender} {body}");
            for peer in self.registry.snapshot() {
                if peer.is_member_of(target) {
                    peer.send(&delivery);
                }
            }
        } else if let Some(peer) = self.registry.find_by_identity(target) {
            peer.send(&format!("{sender}: {body}"));
        }
        // Unknown direct target: silent no-op.
    }

    /// `msg-broadcast <body>`: deliver to every other authenticated session.
    fn process_broadcast(&self, line: &str) {
        let Some(sender) = self.handle.identity() else {
            self.handle.reply(LOGIN_REQUIRED_FOR_MESSAGES);
            return;
        };

        let parts = split_limit(line, 2);
        if parts.len() != 2 {
            return;
        }

        let delivery = format!("msg {sender} {}", parts[1]);
        for peer in self.registry.snapshot() {
            if peer.id() != self.handle.id() {
                peer.send(&delivery);
            }
        }
    }

    /// `join <topic>`
    fn process_join(&self, tokens: &[&str]) {
        if tokens.len() > 1 {
            self.handle.join_topic(tokens[1]);
            debug!(session = %self.handle.id(), topic = tokens[1], "joined topic");
        }
    }

    /// `leave <topic>`
    fn process_leave(&self, tokens: &[&str]) {
        if tokens.len() > 1 {
            self.handle.leave_topic(tokens[1]);
            debug!(session = %self.handle.id(), topic = tokens[1], "left topic");
        }
    }

    /// `who-is-online` / `who-is-connected`
    ///
    /// The listing itself is guarded delivery, so guests get nothing from it;
    /// they do get one login-required notice per unauthenticated session in
    /// the pass, which doubles as the hint that they must log in themselves.
    fn process_who_is_online(&self) {
        self.handle.send("List of Online Users:");
        self.handle.send("-------------------------");

        for peer in self.registry.snapshot() {
            match peer.identity() {
                Some(name) => {
                    if peer.id() != self.handle.id() {
                        self.handle.send(&format!("    - {name}"));
                    }
                }
                None => self.handle.reply(LOGIN_REQUIRED_FOR_LISTING),
            }
        }
    }

    /// `whoami`
    fn process_whoami(&self) {
        match self.handle.identity() {
            Some(name) => self.handle.reply(&name),
            None => self.handle.reply(GUEST_NOTICE),
        }
    }
}

/// Splits a line on whitespace into at most `limit` tokens; the final token
/// keeps the rest of the line verbatim, so message bodies retain spaces.
fn split_limit(line: &str, limit: usize) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = line.trim_start();

    while parts.len() + 1 < limit {
        match rest.split_once(char::is_whitespace) {
            Some((head, tail)) => {
                parts.push(head);
                rest = tail.trim_start();
            }
            None => break,
        }
    }
    if !rest.is_empty() {
        parts.push(rest);
    }
    parts
}

#[cfg(test)]
mod split_tests {
    use super::split_limit;

    #[test]
    fn test_split_limit_keeps_body_spaces() {
        assert_eq!(
            split_limit("msg bob hello there world", 3),
            vec!["msg", "bob", "hello there world"]
        );
    }

    #[test]
    fn test_split_limit_collapses_leading_separator_runs() {
        assert_eq!(
            split_limit("msg-broadcast   hi  all", 2),
            vec!["msg-broadcast", "hi  all"]
        );
    }

    #[test]
    fn test_split_limit_short_input() {
        assert_eq!(split_limit("msg", 3), vec!["msg"]);
        assert!(split_limit("   ", 3).is_empty());
    }
}
