//! Replies shared by the channel command handlers.

use crate::handlers::Context;
use ember_proto::Response;

/// Longest run of names packed into one RPL_NAMREPLY.
const NAMES_CHUNK: usize = 400;

/// RPL_TOPIC or RPL_NOTOPIC for `channel`.
pub fn send_topic(ctx: &mut Context<'_>, channel: &str) {
    let topic = ctx
        .matrix
        .channels
        .get(channel)
        .and_then(|c| c.topic.clone());

    let reply = match topic {
        Some(text) => ctx
            .numeric(Response::RPL_TOPIC)
            .with_param(channel)
            .with_trailing(text),
        None => ctx
            .numeric(Response::RPL_NOTOPIC)
            .with_param(channel)
            .with_trailing("No topic is set"),
    };
    ctx.send(reply);
}

/// Member names in join order, operators marked with `@`.
pub fn member_names(ctx: &Context<'_>, channel: &str) -> Vec<String> {
    let Some(chan) = ctx.matrix.channels.get(channel) else {
        return Vec::new();
    };
    chan.members()
        .iter()
        .filter_map(|&uid| {
            let nick = ctx.matrix.session(uid)?.nick.as_deref()?;
            Some(if chan.is_operator(uid) {
                format!("@{nick}")
            } else {
                nick.to_string()
            })
        })
        .collect()
}

/// RPL_NAMREPLY lines followed by RPL_ENDOFNAMES.
pub fn send_names(ctx: &mut Context<'_>, channel: &str) {
    let names = member_names(ctx, channel);

    let mut chunk = String::new();
    for name in names {
        if !chunk.is_empty() && chunk.len() + name.len() + 1 > NAMES_CHUNK {
            send_names_chunk(ctx, channel, std::mem::take(&mut chunk));
        }
        if !chunk.is_empty() {
            chunk.push(' ');
        }
        chunk.push_str(&name);
    }
    if !chunk.is_empty() {
        send_names_chunk(ctx, channel, chunk);
    }

    let end = ctx
        .numeric(Response::RPL_ENDOFNAMES)
        .with_param(channel)
        .with_trailing("End of NAMES list");
    ctx.send(end);
}

fn send_names_chunk(ctx: &mut Context<'_>, channel: &str, names: String) {
    let reply = ctx
        .numeric(Response::RPL_NAMREPLY)
        .with_params(["=", channel])
        .with_trailing(names);
    ctx.send(reply);
}
