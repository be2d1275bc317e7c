use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory store of registered users.
///
/// Maps username to password, case-sensitive on both sides. The map lives
/// behind a single mutex so that a check-then-insert during registration is
/// atomic with respect to concurrent registrations of the same name.
///
/// Passwords are held in plaintext and compared exactly; this mirrors the
/// wire contract (`login <user> <pass>`), which has no hashing step.
#[derive(Debug, Default)]
pub struct UserStore {
    credentials: Mutex<HashMap<String, String>>,
}

impl UserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given users.
    ///
    /// Handy for tests and demo setups that want accounts available before
    /// any `register` command has been seen.
    pub fn with_users<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let credentials = users
            .into_iter()
            .map(|(u, p)| (u.into(), p.into()))
            .collect();
        Self {
            credentials: Mutex::new(credentials),
        }
    }

    /// Registers a new user.
    ///
    /// Returns `true` and stores the pair iff `username` is not yet taken.
    /// On `false` the store is unchanged.
    pub fn register(&self, username: &str, password: &str) -> bool {
        let mut credentials = self.credentials.lock().unwrap();
        if credentials.contains_key(username) {
            return false;
        }
        credentials.insert(username.to_string(), password.to_string());
        true
    }

    /// Checks a username/password pair against the store.
    ///
    /// `true` iff the username exists and the stored password matches the
    /// supplied one exactly.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let credentials = self.credentials.lock().unwrap();
        credentials.get(username).is_some_and(|p| p == password)
    }

    /// Removes a user from the store.
    ///
    /// Returns `true` iff an entry was actually removed.
    pub fn deregister(&self, username: &str) -> bool {
        let mut credentials = self.credentials.lock().unwrap();
        credentials.remove(username).is_some()
    }
}
