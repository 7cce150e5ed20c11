//! Core configuration types and loading.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

use super::defaults::*;
use super::validation::ValidationError;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {}", format_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server information.
    pub server: ServerConfig,
    /// Network listen configuration.
    #[serde(default)]
    pub listen: ListenConfig,
    /// Buffer and connection limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Message of the Day configuration.
    #[serde(default)]
    pub motd: MotdConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }
}

impl std::str::FromStr for Config {
    type Err = ConfigError;

    /// Parse and validate configuration from TOML text.
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(content)?;
        super::validate(&config).map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server name used as the prefix of every reply (e.g., "irc.ember.local").
    pub name: String,
    /// Version string reported in RPL_YOURHOST and RPL_MYINFO.
    #[serde(default = "default_version")]
    pub version: String,
    /// Connection password compared verbatim against PASS (optional).
    #[serde(default)]
    pub password: Option<String>,
    /// Hold registration until PASS has been accepted.
    #[serde(default)]
    pub require_auth: bool,
}

/// Network listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to (e.g., "0.0.0.0:6667").
    #[serde(default = "default_listen_address")]
    pub address: SocketAddr,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: default_listen_address(),
        }
    }
}

/// Buffer and connection limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum concurrently connected sessions.
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    /// Bytes requested per socket read.
    #[serde(default = "default_recv_buffer")]
    pub recv_buffer: usize,
    /// Unterminated inbound bytes tolerated before disconnect.
    #[serde(default = "default_max_input_buffer")]
    pub max_input_buffer: usize,
    /// Outbound lines queued per session before disconnect.
    #[serde(default = "default_sendq")]
    pub sendq: usize,
    /// Maximum nickname length.
    #[serde(default = "default_nick_len")]
    pub nick_len: usize,
    /// Maximum channel name length.
    #[serde(default = "default_channel_len")]
    pub channel_len: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            recv_buffer: default_recv_buffer(),
            max_input_buffer: default_max_input_buffer(),
            sendq: default_sendq(),
            nick_len: default_nick_len(),
            channel_len: default_channel_len(),
        }
    }
}

/// Message of the Day (MOTD) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MotdConfig {
    /// Lines sent as RPL_MOTD, one reply per line.
    #[serde(default = "default_motd_lines")]
    pub lines: Vec<String>,
}

impl Default for MotdConfig {
    fn default() -> Self {
        Self {
            lines: default_motd_lines(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn minimal_config_uses_defaults() {
        let config: Config = "[server]\nname = \"irc.test\"\n".parse().unwrap();
        assert_eq!(config.server.name, "irc.test");
        assert_eq!(config.server.password, None);
        assert!(!config.server.require_auth);
        assert_eq!(config.listen.address.port(), 6667);
        assert_eq!(config.limits.max_connections, 1024);
        assert_eq!(config.limits.nick_len, 30);
        assert_eq!(config.motd.lines, vec!["Welcome to emberd!".to_string()]);
        assert!(config.server.version.starts_with("emberd-"));
    }

    #[test]
    fn full_config_parses() {
        let config: Config = r#"
[server]
name = "irc.ember.local"
version = "emberd-test"
password = "hunter2"
require_auth = true

[listen]
address = "127.0.0.1:7000"

[limits]
max_connections = 8
recv_buffer = 512
max_input_buffer = 1024
sendq = 16
nick_len = 9
channel_len = 20

[motd]
lines = ["one", "two"]
"#
        .parse()
        .unwrap();

        assert_eq!(config.server.password.as_deref(), Some("hunter2"));
        assert!(config.server.require_auth);
        assert_eq!(config.listen.address.to_string(), "127.0.0.1:7000");
        assert_eq!(config.limits.sendq, 16);
        assert_eq!(config.limits.nick_len, 9);
        assert_eq!(config.motd.lines.len(), 2);
    }

    #[test]
    fn missing_server_section_is_a_parse_error() {
        let err = "[listen]\naddress = \"127.0.0.1:1\"\n".parse::<Config>().unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = "[server]\nname = \"\"\n".parse::<Config>().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nname = \"disk.test\"").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.name, "disk.test");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
