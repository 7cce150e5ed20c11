//! Helper functions for IRC command handlers.

use crate::error::HandlerError;
use ember_proto::MessageRef;

/// Parameter `index`, which must be present and non-empty.
pub fn require_arg<'a>(msg: &MessageRef<'a>, index: usize) -> Result<&'a str, HandlerError> {
    msg.arg(index)
        .filter(|a| !a.is_empty())
        .ok_or(HandlerError::NeedMoreParams)
}

/// Parameter `index` if present and non-empty.
pub fn optional_arg<'a>(msg: &MessageRef<'a>, index: usize) -> Option<&'a str> {
    msg.arg(index).filter(|a| !a.is_empty())
}

/// Split a comma-separated target list, skipping empty entries.
pub fn split_targets(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').filter(|t| !t.is_empty())
}
