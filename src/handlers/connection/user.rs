//! USER command handler.

use super::welcome::try_complete_registration;
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, Handler};
use ember_proto::{MessageRef, NickExt};
use tracing::debug;

/// Handler for USER command.
///
/// `USER username mode unused :realname`
///
/// The username follows the nickname character rules and must not be
/// claimed by any other session, registered or not.
pub struct UserHandler;

impl Handler for UserHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        if msg.arg_count() < 4 {
            return Err(HandlerError::NeedMoreParams);
        }

        if ctx.session()?.registered {
            return Err(HandlerError::AlreadyRegistered);
        }

        let username = msg.arg(0).unwrap_or_default();
        let realname = msg.arg(3).unwrap_or_default();
        if username.is_empty() || realname.is_empty() {
            return Err(HandlerError::NeedMoreParams);
        }

        if !username.is_valid_nick_len(ctx.matrix.limits.nick_len) {
            return Err(HandlerError::InvalidUsername(username.to_string()));
        }

        if ctx.matrix.username_in_use(username, ctx.uid) {
            return Err(HandlerError::UsernameInUse(username.to_string()));
        }

        let session = ctx.session_mut()?;
        session.user = Some(username.to_string());
        session.realname = Some(realname.to_string());
        debug!(uid = ctx.uid, user = %username, "user set");

        try_complete_registration(ctx)
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::Harness;

    #[test]
    fn too_few_params() {
        let mut h = Harness::new();
        let uid = h.connect();
        h.line(uid, "USER alice 0 *");
        assert_eq!(h.drain(uid), vec![":irc.test 461 * USER :Not enough parameters"]);
    }

    #[test]
    fn empty_realname() {
        let mut h = Harness::new();
        let uid = h.connect();
        h.line(uid, "USER alice 0 * :");
        assert_eq!(h.drain(uid), vec![":irc.test 461 * USER :Not enough parameters"]);
    }

    #[test]
    fn realname_keeps_spaces() {
        let mut h = Harness::new();
        let uid = h.connect();
        h.line(uid, "USER alice 0 * :Alice  Liddell");
        assert_eq!(h.session(uid).realname.as_deref(), Some("Alice  Liddell"));
    }

    #[test]
    fn invalid_username() {
        let mut h = Harness::new();
        let uid = h.connect();
        h.line(uid, "USER al!ce 0 * :Alice");
        assert_eq!(h.drain(uid), vec![":irc.test 462 * USER :Invalid username"]);
        assert_eq!(h.session(uid).user, None);
    }

    #[test]
    fn username_claimed_by_unregistered_session() {
        let mut h = Harness::new();
        let first = h.connect();
        h.line(first, "USER alice 0 * :Alice");
        let second = h.connect();
        h.line(second, "USER alice 0 * :Other");
        assert_eq!(
            h.drain(second),
            vec![":irc.test 462 * alice :Username is already in use"]
        );
    }

    #[test]
    fn user_after_registration() {
        let mut h = Harness::new();
        let uid = h.register("alice");
        h.line(uid, "USER other 0 * :Other");
        assert_eq!(h.drain(uid), vec![":irc.test 462 alice :You may not reregister"]);
    }

    #[test]
    fn user_then_nick_registers() {
        let mut h = Harness::new();
        let uid = h.connect();
        h.line(uid, "USER alice 0 * :Alice");
        assert!(!h.session(uid).registered);
        h.line(uid, "NICK alice");
        assert!(h.session(uid).registered);
    }
}
