//! IRC command handlers.
//!
//! This module contains the Handler trait and command registry for dispatching
//! incoming IRC messages to appropriate handlers.
//!
//! Handlers receive a `MessageRef<'_>` borrowing the tokenized line. Use
//! `msg.arg(n)` to access parameters as `&str` slices.

mod cap;
mod channel;
mod connection;
pub mod core;
mod helpers;
mod messaging;
mod user_query;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::core::{Context, Flow, Handler, Preconditions, Registry};
pub use cap::CapHandler;
pub use channel::{JoinHandler, KickHandler, ListHandler, PartHandler, TopicHandler};
pub use connection::{
    NickHandler, PassHandler, PingHandler, PongHandler, QuitHandler, UserHandler,
    try_complete_registration,
};
pub use helpers::{optional_arg, require_arg, split_targets};
pub use messaging::PrivmsgHandler;
pub use user_query::WhoHandler;
