//! The `registry` module defines the shared directory of live sessions.
//!
//! It provides the `ClientRegistry` struct, which tracks every open
//! connection's `SessionHandle` and supports the snapshot-before-iterate
//! pattern that all broadcasts and enumerations rely on.

pub mod roster;
pub use roster::ClientRegistry;
