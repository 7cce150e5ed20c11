//! PRIVMSG command handler.
//!
//! Delivers text to one channel or one nickname. Channel messages reach
//! every member except the sender. CTCP payloads are relayed untouched.

use crate::error::{ChannelError, HandlerError, HandlerResult};
use crate::handlers::{Context, Handler};
use ember_proto::{ChannelExt, Message, MessageRef};
use tracing::debug;

/// Handler for PRIVMSG command.
///
/// `PRIVMSG target :text`
pub struct PrivmsgHandler;

impl Handler for PrivmsgHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        let (target, text) = match msg.args() {
            [] => return Err(HandlerError::NoRecipient),
            [_] => return Err(HandlerError::NoTextToSend),
            [target, text] => (*target, *text),
            [target, ..] => return Err(HandlerError::TooManyTargets(target.to_string())),
        };

        if target.is_empty() {
            return Err(HandlerError::NoRecipient);
        }
        if target.contains(',') {
            return Err(HandlerError::TooManyTargets(target.to_string()));
        }
        if text.is_empty() {
            return Err(HandlerError::NoTextToSend);
        }

        let uid = ctx.uid;
        if target.has_channel_prefix() {
            let channel = ctx
                .matrix
                .channels
                .get(target)
                .ok_or_else(|| HandlerError::NoSuchChannel(target.to_string()))?;
            if !channel.is_member(uid) {
                return Err(HandlerError::channel(target, ChannelError::CannotSendToChan));
            }

            let line = privmsg_line(ctx, target, text)?;
            ctx.matrix.broadcast_channel(target, &line, Some(uid));
            debug!(uid, channel = %target, "channel message delivered");
        } else {
            let recipient = ctx
                .matrix
                .find_by_nick(target)
                .ok_or_else(|| HandlerError::NoSuchNick(target.to_string()))?;

            let line = privmsg_line(ctx, target, text)?;
            ctx.matrix.send_to(recipient, line);
            debug!(uid, target = %target, "private message delivered");
        }
        Ok(())
    }
}

fn privmsg_line(ctx: &Context<'_>, target: &str, text: &str) -> Result<String, HandlerError> {
    Ok(Message::new("PRIVMSG")
        .with_prefix(ctx.session()?.prefix())
        .with_param(target)
        .with_trailing(text)
        .to_string())
}
