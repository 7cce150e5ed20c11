//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

use std::net::SocketAddr;

// =============================================================================
// Server Defaults
// =============================================================================

pub fn default_version() -> String {
    concat!("emberd-", env!("CARGO_PKG_VERSION")).to_string()
}

// =============================================================================
// Listen Defaults
// =============================================================================

pub fn default_listen_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 6667))
}

// =============================================================================
// Limit Defaults
// =============================================================================

pub fn default_max_connections() -> usize {
    1024
}

pub fn default_recv_buffer() -> usize {
    4096
}

pub fn default_max_input_buffer() -> usize {
    8192
}

pub fn default_sendq() -> usize {
    1024
}

pub fn default_nick_len() -> usize {
    ember_proto::DEFAULT_NICK_MAX_LEN
}

pub fn default_channel_len() -> usize {
    ember_proto::DEFAULT_CHANNEL_MAX_LEN
}

// =============================================================================
// MOTD Defaults
// =============================================================================

pub fn default_motd_lines() -> Vec<String> {
    vec!["Welcome to emberd!".to_string()]
}
