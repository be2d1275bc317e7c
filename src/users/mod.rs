//! The `users` module holds the in-memory credential store.
//!
//! It provides the `UserStore` struct, a process-lifetime mapping of
//! username to password used by registration, login and deregistration.
//! Nothing is persisted across restarts.

pub mod store;
pub use store::UserStore;
