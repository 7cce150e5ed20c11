//! NICK command handler.
//!
//! Nicknames are fixed once registration completes; a later NICK is
//! refused rather than treated as a rename.

use super::welcome::try_complete_registration;
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, Handler};
use ember_proto::{MessageRef, NickExt};
use tracing::debug;

/// Handler for NICK command.
///
/// `NICK nickname`
pub struct NickHandler;

impl Handler for NickHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        let nick = match msg.arg(0) {
            Some(n) if !n.is_empty() => n,
            _ => return Err(HandlerError::NoNicknameGiven),
        };

        if ctx.session()?.registered {
            return Err(HandlerError::AlreadyRegistered);
        }

        if !nick.is_valid_nick_len(ctx.matrix.limits.nick_len) {
            return Err(HandlerError::ErroneousNickname(nick.to_string()));
        }

        if ctx.matrix.nick_in_use(nick, ctx.uid) {
            return Err(HandlerError::NicknameInUse(nick.to_string()));
        }

        debug!(uid = ctx.uid, nick = %nick, "nick set");
        ctx.session_mut()?.nick = Some(nick.to_string());

        try_complete_registration(ctx)
    }
}
