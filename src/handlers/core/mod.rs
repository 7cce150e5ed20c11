//! Core handler infrastructure.
//!
//! The handler trait, the per-command context, and the registry that
//! dispatches verbs to handlers.

pub mod context;
pub mod registry;

pub use context::{Context, Handler};
pub use registry::{Flow, Preconditions, Registry};
