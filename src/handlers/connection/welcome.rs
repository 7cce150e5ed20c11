//! Registration completion and the welcome burst.

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::Context;
use ember_proto::Response;
use tracing::info;

/// Complete registration if every prerequisite now holds.
///
/// Called after each state change that could satisfy the last missing
/// prerequisite. The nickname is checked again here since another session
/// may have registered it in the meantime.
pub fn try_complete_registration(ctx: &mut Context<'_>) -> HandlerResult {
    let require_auth = ctx.matrix.server_info.require_auth;
    let session = ctx.session()?;
    if !session.can_register(require_auth) {
        return Ok(());
    }

    let nick = session.nick.clone().unwrap_or_default();
    if ctx.matrix.nick_in_use(&nick, ctx.uid) {
        ctx.session_mut()?.nick = None;
        return Err(HandlerError::NicknameInUse(nick));
    }

    let uid = ctx.uid;
    let session = ctx.session_mut()?;
    session.registered = true;
    let prefix = session.prefix();
    info!(
        uid,
        nick = %nick,
        addr = %session.remote_addr,
        "client registered"
    );

    send_welcome_burst(ctx, &prefix);
    Ok(())
}

/// RPL 001-004 followed by the MOTD.
fn send_welcome_burst(ctx: &mut Context<'_>, prefix: &str) {
    let info = ctx.matrix.server_info.clone();

    let burst = [
        ctx.numeric(Response::RPL_WELCOME)
            .with_trailing(format!("Welcome to the IRC Network {prefix}")),
        ctx.numeric(Response::RPL_YOURHOST).with_trailing(format!(
            "Your host is {}, running version {}",
            info.name, info.version
        )),
        ctx.numeric(Response::RPL_CREATED).with_trailing(format!(
            "This server was created {}",
            info.created.to_rfc2822()
        )),
        ctx.numeric(Response::RPL_MYINFO)
            .with_params([info.name.as_str(), info.version.as_str(), "o", "o"]),
        ctx.numeric(Response::RPL_MOTDSTART)
            .with_trailing(format!("- {} Message of the day -", info.name)),
    ];
    for msg in burst {
        ctx.send(msg);
    }

    for line in &info.motd {
        let msg = ctx.numeric(Response::RPL_MOTD).with_trailing(format!("- {line}"));
        ctx.send(msg);
    }

    let end = ctx
        .numeric(Response::RPL_ENDOFMOTD)
        .with_trailing("End of /MOTD command.");
    ctx.send(end);
}
