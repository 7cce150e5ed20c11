//! Channel command handlers.
//!
//! Handles JOIN, PART, KICK, TOPIC and LIST.

mod common;
mod join;
mod kick;
mod list;
mod part;
mod topic;

pub use join::JoinHandler;
pub use kick::KickHandler;
pub use list::ListHandler;
pub use part::PartHandler;
pub use topic::TopicHandler;
