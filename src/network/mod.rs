//! Network layer.
//!
//! The gateway (reactor) plus the reader and writer tasks it spawns for
//! each accepted socket.

mod connection;
mod gateway;

pub use connection::Event;
pub use gateway::Server;
