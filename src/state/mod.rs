//! State management module.
//!
//! Contains the Matrix (server state), sessions, and channels.

mod channel;
mod matrix;
mod session;

pub use channel::{Channel, ChannelRegistry, Departure, JoinOutcome};
pub use matrix::{Matrix, ServerInfo};
pub use session::{SendFailure, Session, USER_HOST, Uid};
