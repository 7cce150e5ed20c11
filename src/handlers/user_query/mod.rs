//! User query handlers.

mod who;

pub use who::WhoHandler;
