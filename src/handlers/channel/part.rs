//! PART command handler.

use crate::error::{ChannelError, HandlerError, HandlerResult};
use crate::handlers::{Context, Handler, optional_arg, require_arg, split_targets};
use crate::state::Departure;
use ember_proto::{Message, MessageRef};
use tracing::{debug, info};

/// Handler for PART command.
///
/// `PART channel{,channel} [:reason]`
pub struct PartHandler;

impl Handler for PartHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        let targets = require_arg(msg, 0)?;
        let reason = optional_arg(msg, 1);

        for name in split_targets(targets) {
            if let Err(err) = part_channel(ctx, name, reason) {
                debug!(channel = %name, error = %err, "PART failed");
                ctx.send_error(&err, "PART");
            }
        }
        Ok(())
    }
}

fn part_channel(ctx: &mut Context<'_>, name: &str, reason: Option<&str>) -> HandlerResult {
    let uid = ctx.uid;
    let channel = ctx
        .matrix
        .channels
        .get(name)
        .ok_or_else(|| HandlerError::NoSuchChannel(name.to_string()))?;
    if !channel.is_member(uid) {
        return Err(HandlerError::channel(name, ChannelError::NotOnChannel));
    }

    let mut part = Message::new("PART")
        .with_prefix(ctx.session()?.prefix())
        .with_param(name);
    if let Some(reason) = reason {
        part = part.with_trailing(reason);
    }
    // The leaver is still a member here, so it sees its own PART.
    ctx.matrix.broadcast_channel(name, &part.to_string(), None);

    let departure = ctx
        .matrix
        .part_channel(uid, name)
        .map_err(|e| HandlerError::channel(name, e))?;
    info!(
        uid,
        channel = %name,
        destroyed = departure == Departure::Destroyed,
        "parted channel"
    );
    Ok(())
}
