//! LIST command handler.

use crate::error::HandlerResult;
use crate::handlers::{Context, Handler, split_targets};
use crate::state::Channel;
use ember_proto::{Message, MessageRef, Response};

/// Handler for LIST command.
///
/// `LIST [channel{,channel} ...]`
///
/// With no arguments every channel is listed in name order. Otherwise the
/// named channels are listed in the order given, from every argument, and
/// names that do not exist are skipped.
pub struct ListHandler;

impl Handler for ListHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        let start = ctx
            .numeric(Response::RPL_LISTSTART)
            .with_param("Channel")
            .with_trailing("Users  Name");
        ctx.send(start);

        let rows: Vec<Message> = if msg.arg_count() > 0 {
            msg.args()
                .iter()
                .flat_map(|list| split_targets(list))
                .filter_map(|name| ctx.matrix.channels.get(name))
                .map(|channel| list_row(ctx, channel))
                .collect()
        } else {
            ctx.matrix
                .channels
                .iter()
                .map(|channel| list_row(ctx, channel))
                .collect()
        };
        for row in rows {
            ctx.send(row);
        }

        let end = ctx
            .numeric(Response::RPL_LISTEND)
            .with_trailing("End of /LIST");
        ctx.send(end);
        Ok(())
    }
}

fn list_row(ctx: &Context<'_>, channel: &Channel) -> Message {
    ctx.numeric(Response::RPL_LIST)
        .with_params([channel.name.clone(), channel.member_count().to_string()])
        .with_trailing(channel.topic.as_deref().unwrap_or("No topic"))
}
