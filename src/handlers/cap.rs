//! CAP command handler for IRCv3 capability negotiation.
//!
//! No capabilities are offered. Negotiation exists so that clients which
//! open with `CAP LS` can finish it with `CAP END` and register normally.
//! Reference: <https://ircv3.net/specs/extensions/capability-negotiation>

use super::{Context, Handler, try_complete_registration};
use crate::error::{HandlerError, HandlerResult};
use ember_proto::{Message, MessageRef};
use tracing::debug;

/// Handler for CAP command.
///
/// `CAP LS [version]`, `CAP LIST`, `CAP REQ :caps`, `CAP END`
pub struct CapHandler;

impl Handler for CapHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        let subcommand = msg
            .arg(0)
            .filter(|s| !s.is_empty())
            .ok_or(HandlerError::NeedMoreParams)?
            .to_ascii_uppercase();

        match subcommand.as_str() {
            "LS" => {
                let session = ctx.session_mut()?;
                if !session.registered {
                    session.cap_negotiating = true;
                }
                debug!(uid = ctx.uid, "CAP negotiation started");
                let reply = cap_reply(ctx, "LS", "");
                ctx.send(reply);
                Ok(())
            }
            "LIST" => {
                let reply = cap_reply(ctx, "LIST", "");
                ctx.send(reply);
                Ok(())
            }
            "REQ" => {
                // Nothing is supported, so every request is refused whole.
                let requested = msg.arg(1).unwrap_or_default();
                let reply = cap_reply(ctx, "NAK", requested);
                ctx.send(reply);
                Ok(())
            }
            "END" => {
                let session = ctx.session_mut()?;
                if !session.cap_negotiating {
                    return Ok(());
                }
                session.cap_negotiating = false;
                debug!(uid = ctx.uid, "CAP negotiation ended");
                try_complete_registration(ctx)
            }
            _ => Err(HandlerError::InvalidCapCommand(subcommand)),
        }
    }
}

/// `:<server> CAP <nick|*> <sub> :<caps>`
fn cap_reply(ctx: &Context<'_>, subcommand: &str, caps: &str) -> Message {
    Message::new("CAP")
        .with_prefix(ctx.server_name())
        .with_params([ctx.nick().as_str(), subcommand])
        .with_trailing(caps)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;

    #[test]
    fn ls_holds_registration_until_end() {
        let mut h = Harness::new();
        let uid = h.connect();
        h.line(uid, "CAP LS 302");
        assert_eq!(h.drain(uid), vec![":irc.test CAP * LS :"]);

        h.line(uid, "NICK alice");
        h.line(uid, "USER alice 0 * :Alice");
        assert!(!h.session(uid).registered);
        assert!(h.drain(uid).is_empty());

        h.line(uid, "CAP END");
        assert!(h.session(uid).registered);
        assert!(h.drain(uid)[0].starts_with(":irc.test 001 alice "));
    }

    #[test]
    fn req_is_refused() {
        let mut h = Harness::new();
        let uid = h.connect();
        h.line(uid, "CAP REQ :multi-prefix sasl");
        assert_eq!(h.drain(uid), vec![":irc.test CAP * NAK :multi-prefix sasl"]);
    }

    #[test]
    fn list_is_empty() {
        let mut h = Harness::new();
        let uid = h.register("alice");
        h.line(uid, "cap list");
        assert_eq!(h.drain(uid), vec![":irc.test CAP alice LIST :"]);
    }

    #[test]
    fn ls_after_registration_does_not_reopen_negotiation() {
        let mut h = Harness::new();
        let uid = h.register("alice");
        h.line(uid, "CAP LS");
        assert!(!h.session(uid).cap_negotiating);
    }

    #[test]
    fn bad_subcommands() {
        let mut h = Harness::new();
        let uid = h.connect();
        h.line(uid, "CAP");
        h.line(uid, "CAP FOO");
        assert_eq!(
            h.drain(uid),
            vec![
                ":irc.test 461 * CAP :Not enough parameters",
                ":irc.test 410 * FOO :Invalid CAP command",
            ]
        );
    }
}
