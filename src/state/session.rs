//! Per-connection session state.
//!
//! A session owns its inbound framing buffer and the sending half of its
//! outbound queue. It never touches the socket directly: the reader task
//! feeds it bytes and the writer task drains the queue.

use bytes::BytesMut;
use ember_proto::{LineCodec, ProtocolError};
use std::collections::BTreeSet;
use std::net::SocketAddr;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::codec::Decoder;

/// Connection identifier, unique for the lifetime of the process.
pub type Uid = u64;

/// Host component reported for every user.
pub const USER_HOST: &str = "localhost";

/// Why an outbound line could not be queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendFailure {
    /// The send queue is at capacity.
    QueueFull,
    /// The writer task has gone away.
    Closed,
}

impl SendFailure {
    /// Disconnect reason reported for this failure.
    pub fn reason(self) -> &'static str {
        match self {
            Self::QueueFull => "SendQ exceeded",
            Self::Closed => "Write error",
        }
    }
}

/// State for one connected client.
#[derive(Debug)]
pub struct Session {
    pub uid: Uid,
    pub remote_addr: SocketAddr,
    pub nick: Option<String>,
    pub user: Option<String>,
    pub realname: Option<String>,
    /// PASS accepted, or no password configured.
    pub authenticated: bool,
    pub registered: bool,
    /// Between `CAP LS` and `CAP END`.
    pub cap_negotiating: bool,
    /// Channels this session is a member of.
    pub channels: BTreeSet<String>,
    buffer: BytesMut,
    codec: LineCodec,
    outbound: mpsc::Sender<String>,
}

impl Session {
    pub fn new(
        uid: Uid,
        remote_addr: SocketAddr,
        outbound: mpsc::Sender<String>,
        max_input_buffer: usize,
        authenticated: bool,
    ) -> Self {
        Self {
            uid,
            remote_addr,
            nick: None,
            user: None,
            realname: None,
            authenticated,
            registered: false,
            cap_negotiating: false,
            channels: BTreeSet::new(),
            buffer: BytesMut::new(),
            codec: LineCodec::with_max_pending(max_input_buffer),
            outbound,
        }
    }

    /// Append freshly read bytes to the inbound buffer.
    pub fn append(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Pop the next complete line, without its terminator.
    ///
    /// Fails once the unterminated remainder outgrows the input cap.
    pub fn extract_line(&mut self) -> Result<Option<String>, ProtocolError> {
        self.codec.decode(&mut self.buffer)
    }

    /// Bytes still waiting for a terminator.
    pub fn pending_input(&self) -> usize {
        self.buffer.len()
    }

    /// Queue one line for the writer task without blocking.
    pub fn send(&self, line: String) -> Result<(), SendFailure> {
        self.outbound.try_send(line).map_err(|e| match e {
            TrySendError::Full(_) => SendFailure::QueueFull,
            TrySendError::Closed(_) => SendFailure::Closed,
        })
    }

    /// Nickname, or `*` before one is accepted.
    pub fn nick_or_star(&self) -> &str {
        self.nick.as_deref().unwrap_or("*")
    }

    /// User prefix `nick!user@host`.
    pub fn prefix(&self) -> String {
        format!(
            "{}!{}@{}",
            self.nick_or_star(),
            self.user.as_deref().unwrap_or("*"),
            USER_HOST
        )
    }

    /// True when every registration prerequisite holds.
    pub fn can_register(&self, require_auth: bool) -> bool {
        !self.registered
            && self.nick.as_deref().is_some_and(|n| !n.is_empty())
            && self.user.as_deref().is_some_and(|u| !u.is_empty())
            && !self.cap_negotiating
            && (!require_auth || self.authenticated)
    }
}
