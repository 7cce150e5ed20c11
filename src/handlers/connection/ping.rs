//! PING and PONG handlers.

use crate::error::HandlerResult;
use crate::handlers::{Context, Handler};
use ember_proto::{Message, MessageRef};

/// Handler for PING command.
///
/// `PING token`, answered with `PONG <server> :<token>`. A bare PING is
/// ignored.
pub struct PingHandler;

impl Handler for PingHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        let Some(token) = msg.arg(0) else {
            return Ok(());
        };

        let server = ctx.server_name().to_string();
        let pong = Message::new("PONG")
            .with_prefix(server.as_str())
            .with_param(server.as_str())
            .with_trailing(token);
        ctx.send(pong);
        Ok(())
    }
}

/// Handler for PONG command.
pub struct PongHandler;

impl Handler for PongHandler {
    fn handle(&self, _ctx: &mut Context<'_>, _msg: &MessageRef<'_>) -> HandlerResult {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::Harness;

    #[test]
    fn ping_before_registration() {
        let mut h = Harness::new();
        let uid = h.connect();
        h.line(uid, "PING 12345");
        assert_eq!(h.drain(uid), vec![":irc.test PONG irc.test :12345"]);
    }

    #[test]
    fn ping_token_keeps_spaces() {
        let mut h = Harness::new();
        let uid = h.register("alice");
        h.line(uid, "ping :a b c");
        assert_eq!(h.drain(uid), vec![":irc.test PONG irc.test :a b c"]);
    }

    #[test]
    fn bare_ping_and_pong_are_silent() {
        let mut h = Harness::new();
        let uid = h.register("alice");
        h.line(uid, "PING");
        h.line(uid, "PONG irc.test");
        assert!(h.drain(uid).is_empty());
    }
}
