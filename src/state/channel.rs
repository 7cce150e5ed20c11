//! Channels and the channel registry.
//!
//! Members are kept in join order so NAMES output and broadcasts are
//! deterministic. A channel exists exactly as long as it has members.

use crate::error::ChannelError;
use crate::state::Uid;
use std::collections::{BTreeMap, HashSet};

/// A named group of sessions.
#[derive(Debug, Clone)]
pub struct Channel {
    pub name: String,
    pub topic: Option<String>,
    members: Vec<Uid>,
    operators: HashSet<Uid>,
}

impl Channel {
    /// Create a channel whose founder is its first member and operator.
    pub fn new(name: impl Into<String>, founder: Uid) -> Self {
        Self {
            name: name.into(),
            topic: None,
            members: vec![founder],
            operators: HashSet::from([founder]),
        }
    }

    pub fn is_member(&self, uid: Uid) -> bool {
        self.members.contains(&uid)
    }

    pub fn is_operator(&self, uid: Uid) -> bool {
        self.operators.contains(&uid)
    }

    /// Members in join order.
    pub fn members(&self) -> &[Uid] {
        &self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn add_member(&mut self, uid: Uid) -> bool {
        if self.is_member(uid) {
            return false;
        }
        self.members.push(uid);
        true
    }

    fn remove_member(&mut self, uid: Uid) -> bool {
        let before = self.members.len();
        self.members.retain(|&m| m != uid);
        self.operators.remove(&uid);
        self.members.len() != before
    }
}

/// Result of joining a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The channel did not exist; the joiner founded it and is operator.
    Created,
    /// Joined an existing channel as a plain member.
    Joined,
    /// Already a member; nothing changed.
    AlreadyMember,
}

/// Result of a membership removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    /// The channel still has members.
    Remaining,
    /// The last member left and the channel was destroyed.
    Destroyed,
}

/// All live channels, ordered by name.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: BTreeMap<String, Channel>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Channel> {
        self.channels.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Channels in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.values()
    }

    /// Create a channel if absent. Returns false when it already existed.
    pub fn create(&mut self, name: &str, founder: Uid) -> bool {
        if self.channels.contains_key(name) {
            return false;
        }
        self.channels
            .insert(name.to_string(), Channel::new(name, founder));
        true
    }

    /// Add `uid` to `name`, creating the channel when needed.
    pub fn join(&mut self, name: &str, uid: Uid) -> JoinOutcome {
        if self.create(name, uid) {
            return JoinOutcome::Created;
        }
        match self.channels.get_mut(name) {
            Some(channel) => {
                if channel.add_member(uid) {
                    JoinOutcome::Joined
                } else {
                    JoinOutcome::AlreadyMember
                }
            }
            None => JoinOutcome::AlreadyMember,
        }
    }

    /// Remove `uid` from `name`, destroying the channel if it empties.
    pub fn leave(&mut self, name: &str, uid: Uid) -> Result<Departure, ChannelError> {
        let channel = self
            .channels
            .get_mut(name)
            .ok_or(ChannelError::NoSuchChannel)?;
        if !channel.remove_member(uid) {
            return Err(ChannelError::NotOnChannel);
        }
        Ok(self.reap(name))
    }

    /// Remove `target` from `name` on behalf of `actor`.
    ///
    /// The actor must be a member and an operator; `target_nick` is only
    /// used to label the error when the target is not a member.
    pub fn kick(
        &mut self,
        name: &str,
        actor: Uid,
        target: Uid,
        target_nick: &str,
    ) -> Result<Departure, ChannelError> {
        let channel = self
            .channels
            .get_mut(name)
            .ok_or(ChannelError::NoSuchChannel)?;
        if !channel.is_member(actor) {
            return Err(ChannelError::NotOnChannel);
        }
        if !channel.is_operator(actor) {
            return Err(ChannelError::ChanOpPrivsNeeded);
        }
        if !channel.remove_member(target) {
            return Err(ChannelError::UserNotInChannel(target_nick.to_string()));
        }
        Ok(self.reap(name))
    }

    /// Set or clear the topic. Only operators may change it.
    pub fn set_topic(&mut self, name: &str, uid: Uid, topic: &str) -> Result<(), ChannelError> {
        let channel = self
            .channels
            .get_mut(name)
            .ok_or(ChannelError::NoSuchChannel)?;
        if !channel.is_member(uid) {
            return Err(ChannelError::NotOnChannel);
        }
        if !channel.is_operator(uid) {
            return Err(ChannelError::ChanOpPrivsNeeded);
        }
        channel.topic = (!topic.is_empty()).then(|| topic.to_string());
        Ok(())
    }

    fn reap(&mut self, name: &str) -> Departure {
        if self.channels.get(name).is_some_and(Channel::is_empty) {
            self.channels.remove(name);
            Departure::Destroyed
        } else {
            Departure::Remaining
        }
    }
}
