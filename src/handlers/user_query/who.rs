//! WHO handler for listing users matching a mask.

use crate::error::HandlerResult;
use crate::handlers::{Context, Handler, optional_arg};
use crate::state::{Session, USER_HOST};
use ember_proto::{ChannelExt, Message, MessageRef, Response};
use glob::Pattern;

/// Handler for WHO command.
///
/// `WHO [mask]`
///
/// A channel name lists that channel's members. Anything else is a glob
/// matched against nick, username and real name; no mask or `0` lists
/// every registered user.
pub struct WhoHandler;

impl Handler for WhoHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        let mask = optional_arg(msg, 0);

        let rows: Vec<Message> = match mask {
            Some(name) if name.has_channel_prefix() => channel_rows(ctx, name),
            Some(mask) if mask != "0" => {
                let matcher = Matcher::new(mask);
                ctx.matrix
                    .registered_sessions()
                    .into_iter()
                    .filter(|s| matcher.matches_session(s))
                    .map(|s| who_row(ctx, "*", s, false))
                    .collect()
            }
            _ => ctx
                .matrix
                .registered_sessions()
                .into_iter()
                .map(|s| who_row(ctx, "*", s, false))
                .collect(),
        };
        for row in rows {
            ctx.send(row);
        }

        let end = ctx
            .numeric(Response::RPL_ENDOFWHO)
            .with_param(mask.unwrap_or("*"))
            .with_trailing("End of WHO list");
        ctx.send(end);
        Ok(())
    }
}

fn channel_rows(ctx: &Context<'_>, name: &str) -> Vec<Message> {
    let Some(channel) = ctx.matrix.channels.get(name) else {
        return Vec::new();
    };
    channel
        .members()
        .iter()
        .filter_map(|&uid| ctx.matrix.session(uid))
        .map(|s| who_row(ctx, name, s, channel.is_operator(s.uid)))
        .collect()
}

/// `352 <me> <channel> <user> <host> <server> <nick> H[@] :0 <realname>`
fn who_row(ctx: &Context<'_>, channel: &str, session: &Session, operator: bool) -> Message {
    let flags = if operator { "H@" } else { "H" };
    ctx.numeric(Response::RPL_WHOREPLY)
        .with_params([
            channel,
            session.user.as_deref().unwrap_or("*"),
            USER_HOST,
            ctx.server_name(),
            session.nick_or_star(),
            flags,
        ])
        .with_trailing(format!(
            "0 {}",
            session.realname.as_deref().unwrap_or_default()
        ))
}

/// Glob matcher with a literal fallback for masks that fail to compile.
struct Matcher {
    mask: String,
    pattern: Option<Pattern>,
}

impl Matcher {
    fn new(mask: &str) -> Self {
        Self {
            mask: mask.to_string(),
            pattern: Pattern::new(mask).ok(),
        }
    }

    fn matches(&self, candidate: &str) -> bool {
        match &self.pattern {
            Some(pattern) => pattern.matches(candidate),
            None => self.mask == candidate,
        }
    }

    fn matches_session(&self, session: &Session) -> bool {
        [&session.nick, &session.user, &session.realname]
            .into_iter()
            .flatten()
            .any(|field| self.matches(field))
    }
}
