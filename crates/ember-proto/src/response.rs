//! Numeric reply codes used by the daemon.
//!
//! # Reference
//! - RFC 2812 section 5: Replies

#![allow(non_camel_case_types)]

use std::fmt;

/// IRC server response code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
#[non_exhaustive]
pub enum Response {
    // === Connection Registration ===
    /// 001 - Welcome to the IRC network
    RPL_WELCOME = 1,
    /// 002 - Your host is running version
    RPL_YOURHOST = 2,
    /// 003 - Server creation date
    RPL_CREATED = 3,
    /// 004 - Server info (name, version, user modes, channel modes)
    RPL_MYINFO = 4,

    // === Command Responses ===
    /// 315 - End of WHO list
    RPL_ENDOFWHO = 315,
    /// 321 - LIST header
    RPL_LISTSTART = 321,
    /// 322 - LIST row
    RPL_LIST = 322,
    /// 323 - End of LIST
    RPL_LISTEND = 323,
    /// 331 - No topic is set
    RPL_NOTOPIC = 331,
    /// 332 - Channel topic
    RPL_TOPIC = 332,
    /// 352 - WHO reply row
    RPL_WHOREPLY = 352,
    /// 353 - NAMES reply
    RPL_NAMREPLY = 353,
    /// 366 - End of NAMES list
    RPL_ENDOFNAMES = 366,
    /// 372 - MOTD body line
    RPL_MOTD = 372,
    /// 375 - MOTD start
    RPL_MOTDSTART = 375,
    /// 376 - End of MOTD
    RPL_ENDOFMOTD = 376,

    // === Error Replies ===
    /// 401 - No such nick/channel
    ERR_NOSUCHNICK = 401,
    /// 403 - No such channel
    ERR_NOSUCHCHANNEL = 403,
    /// 404 - Cannot send to channel
    ERR_CANNOTSENDTOCHAN = 404,
    /// 407 - Too many targets
    ERR_TOOMANYTARGETS = 407,
    /// 410 - Invalid CAP subcommand
    ERR_INVALIDCAPCMD = 410,
    /// 411 - No recipient given
    ERR_NORECIPIENT = 411,
    /// 412 - No text to send
    ERR_NOTEXTTOSEND = 412,
    /// 421 - Unknown command
    ERR_UNKNOWNCOMMAND = 421,
    /// 431 - No nickname given
    ERR_NONICKNAMEGIVEN = 431,
    /// 432 - Erroneous nickname
    ERR_ERRONEOUSNICKNAME = 432,
    /// 433 - Nickname in use
    ERR_NICKNAMEINUSE = 433,
    /// 441 - Target not on channel
    ERR_USERNOTINCHANNEL = 441,
    /// 442 - You're not on that channel
    ERR_NOTONCHANNEL = 442,
    /// 451 - You have not registered
    ERR_NOTREGISTERED = 451,
    /// 461 - Not enough parameters
    ERR_NEEDMOREPARAMS = 461,
    /// 462 - You may not reregister
    ERR_ALREADYREGISTRED = 462,
    /// 464 - Password incorrect
    ERR_PASSWDMISMATCH = 464,
    /// 482 - You're not channel operator
    ERR_CHANOPRIVSNEEDED = 482,
}

impl Response {
    /// The numeric value of this reply.
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.code())
    }
}
