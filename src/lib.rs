//! # Parlor
//!
//! `parlor` is a minimalist, in-memory chat server built with Rust.
//! Clients speak a line-oriented text protocol over plain TCP: they register
//! and log in with a username, exchange direct messages, and opt into
//! `#`-prefixed topics for group broadcasts.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `users`: The in-memory credential store used for registration and login.
//! - `registry`: The shared directory of live sessions used for enumeration and delivery.
//! - `session`: The per-connection protocol state machine and its shared handle.
//! - `transport`: The TCP listener and per-connection read/write plumbing.
//! - `config`: Handles loading and managing server configuration.
//! - `utils`: Contains shared utilities, such as error handling and logging setup.

pub mod config;
pub mod registry;
pub mod session;
pub mod transport;
pub mod users;
pub mod utils;
