//! KICK command handler.

use crate::error::{ChannelError, HandlerError, HandlerResult};
use crate::handlers::{Context, Handler, optional_arg, require_arg};
use ember_proto::{Message, MessageRef};
use tracing::info;

/// Handler for KICK command.
///
/// `KICK channel nick [:reason]`
///
/// Only channel operators may kick. The reason defaults to the kicker's
/// nickname.
pub struct KickHandler;

impl Handler for KickHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        let channel_name = require_arg(msg, 0)?;
        let target_nick = require_arg(msg, 1)?;

        let uid = ctx.uid;
        let kicker = ctx.nick();
        let reason = optional_arg(msg, 2).unwrap_or(kicker.as_str()).to_string();

        let channel = ctx
            .matrix
            .channels
            .get(channel_name)
            .ok_or_else(|| HandlerError::NoSuchChannel(channel_name.to_string()))?;
        if !channel.is_member(uid) {
            return Err(HandlerError::channel(channel_name, ChannelError::NotOnChannel));
        }
        if !channel.is_operator(uid) {
            return Err(HandlerError::channel(
                channel_name,
                ChannelError::ChanOpPrivsNeeded,
            ));
        }
        let target = ctx
            .matrix
            .find_by_nick(target_nick)
            .ok_or_else(|| HandlerError::NoSuchNick(target_nick.to_string()))?;
        if !channel.is_member(target) {
            return Err(HandlerError::channel(
                channel_name,
                ChannelError::UserNotInChannel(target_nick.to_string()),
            ));
        }

        let kick = Message::new("KICK")
            .with_prefix(ctx.session()?.prefix())
            .with_params([channel_name, target_nick])
            .with_trailing(reason.as_str())
            .to_string();
        ctx.matrix.broadcast_channel(channel_name, &kick, None);

        ctx.matrix
            .kick_member(uid, channel_name, target)
            .map_err(|e| HandlerError::channel(channel_name, e))?;
        info!(
            uid,
            channel = %channel_name,
            target = %target_nick,
            reason = %reason,
            "kicked"
        );
        Ok(())
    }
}
