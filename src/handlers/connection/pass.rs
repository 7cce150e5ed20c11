//! PASS command handler for connection registration.

use super::welcome::try_complete_registration;
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, Handler, require_arg};
use ember_proto::MessageRef;
use tracing::{debug, info};

/// Handler for PASS command.
///
/// `PASS password`
///
/// Compares the argument verbatim against the configured password. A
/// mismatch is answered with 464 but does not lock the session out: it
/// is authenticated either way, and only a session that never sent PASS
/// is refused the gated commands.
pub struct PassHandler;

impl Handler for PassHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        let password = require_arg(msg, 0)?;

        let Some(expected) = ctx.matrix.server_info.password.as_deref() else {
            debug!("PASS ignored, no password configured");
            return Ok(());
        };

        if password != expected {
            info!(uid = ctx.uid, "PASS mismatch");
            ctx.send_error(&HandlerError::PasswordMismatch, "PASS");
        }

        let session = ctx.session_mut()?;
        if session.authenticated {
            return Err(HandlerError::AlreadyRegistered);
        }
        session.authenticated = true;
        debug!(uid = ctx.uid, "session authenticated");

        try_complete_registration(ctx)
    }
}
