//! The `session` module implements the per-connection protocol state machine.
//!
//! A connection is represented twice: as a `SessionHandle` (the shared,
//! registry-visible part: id, outbound channel, identity and topic set) and
//! as a `Session` (the command loop that parses input lines and drives the
//! handle, the user store and the registry).

pub mod commands;
pub mod handle;

pub use commands::{Flow, Session};
pub use handle::SessionHandle;
