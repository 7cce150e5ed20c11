//! JOIN command handler.

use super::common::{send_names, send_topic};
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, Handler, require_arg, split_targets};
use crate::state::JoinOutcome;
use ember_proto::{ChannelExt, Message, MessageRef};
use tracing::{debug, info};

/// Handler for JOIN command.
///
/// `JOIN channel{,channel}`
///
/// Each listed channel is joined independently; a bad name is answered
/// with 403 and the rest of the list still proceeds.
pub struct JoinHandler;

impl Handler for JoinHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        let targets = require_arg(msg, 0)?;

        for name in split_targets(targets) {
            if let Err(err) = join_channel(ctx, name) {
                debug!(channel = %name, error = %err, "JOIN failed");
                ctx.send_error(&err, "JOIN");
            }
        }
        Ok(())
    }
}

fn join_channel(ctx: &mut Context<'_>, name: &str) -> HandlerResult {
    if !name.is_channel_name_len(ctx.matrix.limits.channel_len) {
        return Err(HandlerError::NoSuchChannel(name.to_string()));
    }

    let uid = ctx.uid;
    let outcome = ctx.matrix.join_channel(uid, name);
    if outcome == JoinOutcome::AlreadyMember {
        debug!(uid, channel = %name, "already a member");
        return Ok(());
    }
    info!(
        uid,
        channel = %name,
        created = outcome == JoinOutcome::Created,
        "joined channel"
    );

    let join = Message::new("JOIN")
        .with_prefix(ctx.session()?.prefix())
        .with_trailing(name)
        .to_string();
    ctx.matrix.broadcast_channel(name, &join, None);

    send_topic(ctx, name);
    send_names(ctx, name);
    Ok(())
}
