//! Unified error handling for emberd.
//!
//! Protocol errors are recovered locally: each maps to exactly one numeric
//! reply and the offending command is discarded with state untouched.

use crate::state::Uid;
use ember_proto::{Message, Response};
use thiserror::Error;

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur during command handling.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not enough parameters")]
    NeedMoreParams,

    #[error("not registered")]
    NotRegistered,

    #[error("password required")]
    PasswordRequired,

    #[error("password incorrect")]
    PasswordMismatch,

    #[error("already registered")]
    AlreadyRegistered,

    #[error("username in use: {0}")]
    UsernameInUse(String),

    #[error("invalid username: {0}")]
    InvalidUsername(String),

    #[error("no nickname given")]
    NoNicknameGiven,

    #[error("erroneous nickname: {0}")]
    ErroneousNickname(String),

    #[error("nickname in use: {0}")]
    NicknameInUse(String),

    #[error("no such nick: {0}")]
    NoSuchNick(String),

    #[error("no such channel: {0}")]
    NoSuchChannel(String),

    #[error("no recipient given")]
    NoRecipient,

    #[error("no text to send")]
    NoTextToSend,

    #[error("too many targets: {0}")]
    TooManyTargets(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("invalid CAP subcommand: {0}")]
    InvalidCapCommand(String),

    #[error("{channel}: {source}")]
    Channel {
        channel: String,
        #[source]
        source: ChannelError,
    },

    #[error("client quit: {0:?}")]
    Quit(Option<String>),

    #[error("session {0} is gone")]
    SessionGone(Uid),
}

impl HandlerError {
    /// Wrap a channel registry error together with the channel it concerns.
    pub fn channel(channel: &str, source: ChannelError) -> Self {
        Self::Channel {
            channel: channel.to_string(),
            source,
        }
    }

    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NeedMoreParams => "need_more_params",
            Self::NotRegistered => "not_registered",
            Self::PasswordRequired => "password_required",
            Self::PasswordMismatch => "password_mismatch",
            Self::AlreadyRegistered => "already_registered",
            Self::UsernameInUse(_) => "username_in_use",
            Self::InvalidUsername(_) => "invalid_username",
            Self::NoNicknameGiven => "no_nickname_given",
            Self::ErroneousNickname(_) => "erroneous_nickname",
            Self::NicknameInUse(_) => "nickname_in_use",
            Self::NoSuchNick(_) => "no_such_nick",
            Self::NoSuchChannel(_) => "no_such_channel",
            Self::NoRecipient => "no_recipient",
            Self::NoTextToSend => "no_text_to_send",
            Self::TooManyTargets(_) => "too_many_targets",
            Self::UnknownCommand(_) => "unknown_command",
            Self::InvalidCapCommand(_) => "invalid_cap_command",
            Self::Channel { source, .. } => source.error_code(),
            Self::Quit(_) => "quit",
            Self::SessionGone(_) => "session_gone",
        }
    }

    /// Convert to an IRC error reply message.
    ///
    /// Returns `None` for errors that don't warrant a client-visible reply.
    pub fn to_irc_reply(&self, server_name: &str, nick: &str, cmd_name: &str) -> Option<Message> {
        let reply = |response| Message::numeric(server_name, response, nick);
        let msg = match self {
            Self::NeedMoreParams => reply(Response::ERR_NEEDMOREPARAMS)
                .with_param(cmd_name)
                .with_trailing("Not enough parameters"),
            Self::NotRegistered => {
                reply(Response::ERR_NOTREGISTERED).with_trailing("You have not registered")
            }
            Self::PasswordRequired => {
                reply(Response::ERR_PASSWDMISMATCH).with_trailing("Password required")
            }
            Self::PasswordMismatch => {
                reply(Response::ERR_PASSWDMISMATCH).with_trailing("Password incorrect")
            }
            Self::AlreadyRegistered => {
                reply(Response::ERR_ALREADYREGISTRED).with_trailing("You may not reregister")
            }
            Self::UsernameInUse(user) => reply(Response::ERR_ALREADYREGISTRED)
                .with_param(user)
                .with_trailing("Username is already in use"),
            Self::InvalidUsername(_) => reply(Response::ERR_ALREADYREGISTRED)
                .with_param(cmd_name)
                .with_trailing("Invalid username"),
            Self::NoNicknameGiven => {
                reply(Response::ERR_NONICKNAMEGIVEN).with_trailing("No nickname given")
            }
            Self::ErroneousNickname(bad) => reply(Response::ERR_ERRONEOUSNICKNAME)
                .with_param(bad)
                .with_trailing("Erroneous nickname"),
            Self::NicknameInUse(bad) => reply(Response::ERR_NICKNAMEINUSE)
                .with_param(bad)
                .with_trailing("Nickname is already in use"),
            Self::NoSuchNick(target) => reply(Response::ERR_NOSUCHNICK)
                .with_param(target)
                .with_trailing("No such nick/channel"),
            Self::NoSuchChannel(chan) => reply(Response::ERR_NOSUCHCHANNEL)
                .with_param(chan)
                .with_trailing("No such channel"),
            Self::NoRecipient => reply(Response::ERR_NORECIPIENT)
                .with_trailing(format!("No recipient given ({})", cmd_name)),
            Self::NoTextToSend => reply(Response::ERR_NOTEXTTOSEND).with_trailing("No text to send"),
            Self::TooManyTargets(target) => reply(Response::ERR_TOOMANYTARGETS)
                .with_param(target)
                .with_trailing("Too many recipients"),
            Self::UnknownCommand(cmd) => reply(Response::ERR_UNKNOWNCOMMAND)
                .with_param(cmd)
                .with_trailing("Unknown command"),
            Self::InvalidCapCommand(sub) => reply(Response::ERR_INVALIDCAPCMD)
                .with_param(sub)
                .with_trailing("Invalid CAP command"),
            Self::Channel { channel, source } => source.to_irc_reply(server_name, nick, channel),

            // QUIT is handled by the reactor, not answered with a numeric
            Self::Quit(_) | Self::SessionGone(_) => return None,
        };

        Some(msg)
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

// ============================================================================
// Channel Errors (registry operations)
// ============================================================================

/// Channel operation errors.
///
/// These errors represent channel-specific failures that can be mapped
/// to RFC-compliant error responses by handler code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("no such channel")]
    NoSuchChannel,

    #[error("not on channel")]
    NotOnChannel,

    #[error("you're not channel operator")]
    ChanOpPrivsNeeded,

    #[error("user {0} is not on that channel")]
    UserNotInChannel(String),

    #[error("cannot send to channel")]
    CannotSendToChan,
}

impl ChannelError {
    /// Get a static error code string for log labeling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoSuchChannel => "no_such_channel",
            Self::NotOnChannel => "not_on_channel",
            Self::ChanOpPrivsNeeded => "chanop_privs_needed",
            Self::UserNotInChannel(_) => "user_not_in_channel",
            Self::CannotSendToChan => "cannot_send_to_chan",
        }
    }

    /// Convert to an IRC error reply message.
    pub fn to_irc_reply(&self, server_name: &str, nick: &str, channel: &str) -> Message {
        let (response, text) = match self {
            Self::NoSuchChannel => (Response::ERR_NOSUCHCHANNEL, "No such channel"),
            Self::NotOnChannel => (Response::ERR_NOTONCHANNEL, "You're not on that channel"),
            Self::ChanOpPrivsNeeded => (Response::ERR_CHANOPRIVSNEEDED, "You're not channel operator"),
            Self::CannotSendToChan => (Response::ERR_CANNOTSENDTOCHAN, "Cannot send to channel"),
            Self::UserNotInChannel(target) => {
                return Message::numeric(server_name, Response::ERR_USERNOTINCHANNEL, nick)
                    .with_params([target.as_str(), channel])
                    .with_trailing("They aren't on that channel");
            }
        };

        Message::numeric(server_name, response, nick)
            .with_param(channel)
            .with_trailing(text)
    }
}
