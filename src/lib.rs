//! emberd - a small single-process IRC server.
//!
//! One reactor task owns all server state; per-connection tasks only move
//! bytes. See [`network::Server`] for the entry point.

pub mod config;
pub mod error;
pub mod handlers;
pub mod network;
pub mod state;

pub use config::Config;
pub use network::Server;
