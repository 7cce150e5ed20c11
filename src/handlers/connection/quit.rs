//! QUIT command handler.

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, Handler, optional_arg};
use ember_proto::MessageRef;

/// Handler for QUIT command.
///
/// `QUIT [:reason]`
///
/// Teardown belongs to the reactor, which owns the connection; the handler
/// only reports the request upward.
pub struct QuitHandler;

impl Handler for QuitHandler {
    fn handle(&self, _ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        Err(HandlerError::Quit(optional_arg(msg, 0).map(str::to_string)))
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::Flow;
    use crate::handlers::test_support::Harness;

    #[test]
    fn quit_reports_reason() {
        let mut h = Harness::new();
        let uid = h.register("alice");
        assert_eq!(h.line(uid, "QUIT :gone fishing"), Flow::Quit(Some("gone fishing".into())));
        assert_eq!(h.line(uid, "QUIT"), Flow::Quit(None));
        assert!(h.drain(uid).is_empty());
    }

    #[test]
    fn quit_allowed_before_registration() {
        let mut h = Harness::new();
        let uid = h.connect();
        assert_eq!(h.line(uid, "quit"), Flow::Quit(None));
    }
}
