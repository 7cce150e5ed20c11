//! The Matrix - central server state.
//!
//! The Matrix holds every session and channel. It is owned by the reactor
//! task and lent to handlers one command at a time, so nothing in here is
//! shared across threads or locked.

use crate::config::{Config, LimitsConfig};
use crate::error::ChannelError;
use crate::state::channel::{ChannelRegistry, Departure, JoinOutcome};
use crate::state::session::{Session, Uid};
use chrono::{DateTime, Utc};
use ember_proto::Message;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Server identity and startup facts used in replies.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
    pub password: Option<String>,
    pub require_auth: bool,
    pub created: DateTime<Utc>,
    pub motd: Vec<String>,
}

impl ServerInfo {
    pub fn from_config(config: &Config) -> Self {
        Self {
            name: config.server.name.clone(),
            version: config.server.version.clone(),
            password: config.server.password.clone(),
            require_auth: config.server.require_auth,
            created: Utc::now(),
            motd: config.motd.lines.clone(),
        }
    }
}

/// Central state container.
#[derive(Debug)]
pub struct Matrix {
    pub server_info: ServerInfo,
    pub limits: LimitsConfig,
    pub sessions: HashMap<Uid, Session>,
    pub channels: ChannelRegistry,
    /// Sessions whose send queue failed, with the disconnect reason.
    pending_disconnects: Vec<(Uid, String)>,
}

impl Matrix {
    pub fn new(config: &Config) -> Self {
        Self {
            server_info: ServerInfo::from_config(config),
            limits: config.limits.clone(),
            sessions: HashMap::new(),
            channels: ChannelRegistry::new(),
            pending_disconnects: Vec::new(),
        }
    }

    pub fn add_session(&mut self, session: Session) {
        self.sessions.insert(session.uid, session);
    }

    pub fn session(&self, uid: Uid) -> Option<&Session> {
        self.sessions.get(&uid)
    }

    pub fn session_mut(&mut self, uid: Uid) -> Option<&mut Session> {
        self.sessions.get_mut(&uid)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Queue a line for one session.
    ///
    /// A full or closed queue never blocks the caller; the session is
    /// scheduled for disconnect instead.
    pub fn send_to(&mut self, uid: Uid, line: impl Into<String>) {
        let Some(session) = self.sessions.get(&uid) else {
            return;
        };
        let line = line.into();
        debug!(uid, line = %line, "send");
        if let Err(failure) = session.send(line) {
            if self.pending_disconnects.iter().any(|(u, _)| *u == uid) {
                return;
            }
            warn!(uid, reason = failure.reason(), "outbound queue failed");
            self.pending_disconnects
                .push((uid, failure.reason().to_string()));
        }
    }

    /// Send a line to every member of `channel`, optionally skipping one.
    pub fn broadcast_channel(&mut self, channel: &str, line: &str, except: Option<Uid>) {
        for uid in self.channel_members(channel) {
            if Some(uid) != except {
                self.send_to(uid, line);
            }
        }
    }

    /// Members of `channel` in join order, empty if it does not exist.
    pub fn channel_members(&self, channel: &str) -> Vec<Uid> {
        self.channels
            .get(channel)
            .map(|c| c.members().to_vec())
            .unwrap_or_default()
    }

    /// Drain the sessions scheduled for disconnect.
    pub fn take_pending_disconnects(&mut self) -> Vec<(Uid, String)> {
        std::mem::take(&mut self.pending_disconnects)
    }

    pub fn is_disconnect_pending(&self, uid: Uid) -> bool {
        self.pending_disconnects.iter().any(|(u, _)| *u == uid)
    }

    /// Find a registered session by exact nickname.
    pub fn find_by_nick(&self, nick: &str) -> Option<Uid> {
        self.sessions
            .values()
            .find(|s| s.registered && s.nick.as_deref() == Some(nick))
            .map(|s| s.uid)
    }

    /// Whether a registered session other than `except` holds `nick`.
    pub fn nick_in_use(&self, nick: &str, except: Uid) -> bool {
        self.find_by_nick(nick).is_some_and(|uid| uid != except)
    }

    /// Whether any session other than `except` has claimed `user`.
    pub fn username_in_use(&self, user: &str, except: Uid) -> bool {
        self.sessions
            .values()
            .any(|s| s.uid != except && s.user.as_deref() == Some(user))
    }

    /// Registered sessions ordered by connection id.
    pub fn registered_sessions(&self) -> Vec<&Session> {
        let mut sessions: Vec<_> = self.sessions.values().filter(|s| s.registered).collect();
        sessions.sort_by_key(|s| s.uid);
        sessions
    }

    /// Add a session to a channel, keeping both sides of the membership in step.
    pub fn join_channel(&mut self, uid: Uid, channel: &str) -> JoinOutcome {
        let outcome = self.channels.join(channel, uid);
        if outcome != JoinOutcome::AlreadyMember {
            if let Some(session) = self.sessions.get_mut(&uid) {
                session.channels.insert(channel.to_string());
            }
        }
        outcome
    }

    /// Remove a session from a channel.
    pub fn part_channel(&mut self, uid: Uid, channel: &str) -> Result<Departure, ChannelError> {
        let departure = self.channels.leave(channel, uid)?;
        if let Some(session) = self.sessions.get_mut(&uid) {
            session.channels.remove(channel);
        }
        Ok(departure)
    }

    /// Remove `target` from a channel on behalf of `actor`.
    pub fn kick_member(
        &mut self,
        actor: Uid,
        channel: &str,
        target: Uid,
    ) -> Result<Departure, ChannelError> {
        let target_nick = self
            .sessions
            .get(&target)
            .map(|s| s.nick_or_star().to_string())
            .unwrap_or_default();
        let departure = self.channels.kick(channel, actor, target, &target_nick)?;
        if let Some(session) = self.sessions.get_mut(&target) {
            session.channels.remove(channel);
        }
        Ok(departure)
    }

    /// Remove a session entirely.
    ///
    /// The session leaves every channel, and each co-member hears one QUIT
    /// no matter how many channels they shared.
    pub fn remove_session(&mut self, uid: Uid, reason: &str) -> Option<Session> {
        let session = self.sessions.remove(&uid)?;
        self.pending_disconnects.retain(|(u, _)| *u != uid);

        let mut peers: Vec<Uid> = Vec::new();
        for name in &session.channels {
            if let Some(channel) = self.channels.get(name) {
                for &member in channel.members() {
                    if member != uid && !peers.contains(&member) {
                        peers.push(member);
                    }
                }
            }
            if let Ok(Departure::Destroyed) = self.channels.leave(name, uid) {
                debug!(channel = %name, "channel destroyed");
            }
        }

        if session.registered {
            let quit = Message::new("QUIT")
                .with_prefix(session.prefix())
                .with_trailing(reason)
                .to_string();
            for peer in peers {
                self.send_to(peer, quit.as_str());
            }
        }

        Some(session)
    }
}
