//! TOPIC command handler.

use super::common::send_topic;
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, Handler, require_arg};
use ember_proto::{Message, MessageRef};
use tracing::info;

/// Handler for TOPIC command.
///
/// `TOPIC channel [:topic]`
///
/// Without a topic argument the current topic is returned. Setting it
/// needs operator status; an empty topic clears it.
pub struct TopicHandler;

impl Handler for TopicHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        let channel = require_arg(msg, 0)?;
        if !ctx.matrix.channels.contains(channel) {
            return Err(HandlerError::NoSuchChannel(channel.to_string()));
        }

        let Some(topic) = msg.arg(1) else {
            send_topic(ctx, channel);
            return Ok(());
        };

        let uid = ctx.uid;
        ctx.matrix
            .channels
            .set_topic(channel, uid, topic)
            .map_err(|e| HandlerError::channel(channel, e))?;
        info!(uid, channel = %channel, "topic changed");

        let line = Message::new("TOPIC")
            .with_prefix(ctx.session()?.prefix())
            .with_param(channel)
            .with_trailing(topic)
            .to_string();
        ctx.matrix.broadcast_channel(channel, &line, None);
        Ok(())
    }
}
