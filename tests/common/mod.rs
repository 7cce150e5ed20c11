//! Integration test common infrastructure.
//!
//! Provides an in-process test server and a raw-line test client.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::{TestClient, command_of};
#[allow(unused_imports)]
pub use server::TestServer;
