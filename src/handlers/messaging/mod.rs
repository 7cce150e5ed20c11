//! Messaging handlers.

mod privmsg;

pub use privmsg::PrivmsgHandler;
