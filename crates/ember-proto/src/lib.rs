//! # ember-proto
//!
//! Wire-level building blocks for the emberd IRC daemon.
//!
//! ## Features
//!
//! - CR-LF line framing as a `tokio_util` codec
//! - Tokenizing of client lines, honoring the trailing-parameter rule
//! - Byte-exact construction of outbound replies
//! - Nickname and channel-name validation
//! - Numeric reply codes
//!
//! ## Quick Start
//!
//! ```rust
//! use ember_proto::{Message, MessageRef, Response};
//!
//! let msg = MessageRef::parse("PRIVMSG #rust :Hello, world!");
//! assert_eq!(msg.command_name(), "PRIVMSG");
//! assert_eq!(msg.arg(1), Some("Hello, world!"));
//!
//! let reply = Message::numeric("irc.example.com", Response::RPL_WELCOME, "alice")
//!     .with_trailing("Welcome to the IRC Network alice!alice@localhost");
//! assert_eq!(
//!     reply.to_string(),
//!     ":irc.example.com 001 alice :Welcome to the IRC Network alice!alice@localhost"
//! );
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod chan;
pub mod error;
pub mod line;
pub mod message;
pub mod nick;
pub mod response;

pub use self::chan::{ChannelExt, DEFAULT_CHANNEL_MAX_LEN};
pub use self::error::ProtocolError;
pub use self::line::LineCodec;
pub use self::message::{tokenize, Message, MessageRef};
pub use self::nick::{NickExt, DEFAULT_NICK_MAX_LEN};
pub use self::response::Response;
