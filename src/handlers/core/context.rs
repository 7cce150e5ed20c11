//! Command handler context and the `Handler` trait.

use crate::error::{HandlerError, HandlerResult};
use crate::state::{Matrix, Session, Uid};
use ember_proto::{Message, MessageRef, Response};

/// Handler context passed to each command handler.
///
/// Lends the whole [`Matrix`] for the duration of one command, which is
/// what makes each command atomic with respect to every other.
pub struct Context<'a> {
    /// The issuing session.
    pub uid: Uid,
    /// Server state.
    pub matrix: &'a mut Matrix,
}

impl<'a> Context<'a> {
    pub fn new(uid: Uid, matrix: &'a mut Matrix) -> Self {
        Self { uid, matrix }
    }

    /// The issuing session.
    pub fn session(&self) -> Result<&Session, HandlerError> {
        self.matrix
            .session(self.uid)
            .ok_or(HandlerError::SessionGone(self.uid))
    }

    pub fn session_mut(&mut self) -> Result<&mut Session, HandlerError> {
        self.matrix
            .session_mut(self.uid)
            .ok_or(HandlerError::SessionGone(self.uid))
    }

    pub fn server_name(&self) -> &str {
        &self.matrix.server_info.name
    }

    /// The issuer's nickname, or `*` before one is set.
    pub fn nick(&self) -> String {
        self.session()
            .map(|s| s.nick_or_star().to_string())
            .unwrap_or_else(|_| "*".to_string())
    }

    /// Start a numeric reply addressed to the issuer.
    pub fn numeric(&self, response: Response) -> Message {
        Message::numeric(self.server_name(), response, &self.nick())
    }

    /// Queue a line for the issuer.
    pub fn send(&mut self, line: impl Into<String>) {
        self.matrix.send_to(self.uid, line);
    }

    /// Send the numeric a failed command maps to, if any.
    pub fn send_error(&mut self, err: &HandlerError, cmd_name: &str) {
        let nick = self.nick();
        if let Some(reply) = err.to_irc_reply(self.server_name(), &nick, cmd_name) {
            self.send(reply);
        }
    }
}

/// A command handler.
///
/// Handlers run to completion on the reactor task and never block. Any
/// `Err` is turned into exactly one numeric by the caller.
pub trait Handler: Send + Sync {
    fn handle(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult;
}
