//! The `transport` module is responsible for network communication with
//! clients over plain TCP.
//!
//! It implements the listener accept loop and the per-connection plumbing:
//! a line-based read loop feeding the session state machine, and a writer
//! task that serializes all outbound lines onto the socket.

pub mod tcp;
