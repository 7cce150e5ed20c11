//! Command handler registry and dispatch.
//!
//! The `Registry` maps verbs to handlers and enforces the registration and
//! password gates before a handler runs.

use super::context::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{
    cap::CapHandler,
    channel::{JoinHandler, KickHandler, ListHandler, PartHandler, TopicHandler},
    connection::{NickHandler, PassHandler, PingHandler, PongHandler, QuitHandler, UserHandler},
    messaging::PrivmsgHandler,
    user_query::WhoHandler,
};
use crate::state::{Matrix, Uid};
use ember_proto::MessageRef;
use std::collections::HashMap;
use tracing::{debug, debug_span};

/// Gates checked before a handler is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preconditions {
    /// Reject with 451 unless the session is registered.
    pub requires_registration: bool,
    /// Reject with 464 unless the session is authenticated.
    pub requires_auth: bool,
}

impl Preconditions {
    /// Usable at any point in the connection.
    pub const OPEN: Self = Self {
        requires_registration: false,
        requires_auth: false,
    };

    /// Usable only by registered, authenticated sessions.
    pub const REGISTERED: Self = Self {
        requires_registration: true,
        requires_auth: true,
    };
}

struct Entry {
    handler: Box<dyn Handler>,
    preconditions: Preconditions,
}

/// What the reactor should do after a line has been processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The client asked to leave, with an optional reason.
    Quit(Option<String>),
}

/// Registry of command handlers.
pub struct Registry {
    handlers: HashMap<&'static str, Entry>,
}

impl Registry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
        };

        // Connection/registration handlers
        registry.register("PASS", PassHandler, Preconditions::OPEN);
        registry.register("NICK", NickHandler, Preconditions::OPEN);
        registry.register("USER", UserHandler, Preconditions::OPEN);
        registry.register("CAP", CapHandler, Preconditions::OPEN);
        registry.register("PING", PingHandler, Preconditions::OPEN);
        registry.register("PONG", PongHandler, Preconditions::OPEN);
        registry.register("QUIT", QuitHandler, Preconditions::OPEN);

        // Channel handlers
        registry.register("JOIN", JoinHandler, Preconditions::REGISTERED);
        registry.register("PART", PartHandler, Preconditions::REGISTERED);
        registry.register("KICK", KickHandler, Preconditions::REGISTERED);
        registry.register("TOPIC", TopicHandler, Preconditions::REGISTERED);
        registry.register("LIST", ListHandler, Preconditions::REGISTERED);

        // Messaging and queries
        registry.register("PRIVMSG", PrivmsgHandler, Preconditions::REGISTERED);
        registry.register("WHO", WhoHandler, Preconditions::REGISTERED);

        registry
    }

    fn register(
        &mut self,
        name: &'static str,
        handler: impl Handler + 'static,
        preconditions: Preconditions,
    ) {
        self.handlers.insert(
            name,
            Entry {
                handler: Box::new(handler),
                preconditions,
            },
        );
    }

    /// Dispatch a message to the appropriate handler.
    ///
    /// Unknown verbs are answered with 421 once registered and ignored
    /// before that.
    pub fn dispatch(&self, ctx: &mut Context<'_>, msg: &MessageRef<'_>) -> HandlerResult {
        let cmd_name = msg.command_name().to_ascii_uppercase();
        let span = debug_span!("irc.command", command = %cmd_name, uid = ctx.uid);
        let _enter = span.enter();

        let session = ctx.session()?;
        let (registered, authenticated) = (session.registered, session.authenticated);

        let Some(entry) = self.handlers.get(cmd_name.as_str()) else {
            if registered {
                return Err(HandlerError::UnknownCommand(cmd_name));
            }
            debug!("ignoring unknown command before registration");
            return Ok(());
        };

        if entry.preconditions.requires_registration && !registered {
            return Err(HandlerError::NotRegistered);
        }
        if entry.preconditions.requires_auth && !authenticated {
            return Err(HandlerError::PasswordRequired);
        }

        entry.handler.handle(ctx, msg)
    }

    /// Tokenize, dispatch and answer one inbound line.
    pub fn process_line(&self, matrix: &mut Matrix, uid: Uid, line: &str) -> Flow {
        let msg = MessageRef::parse(line);
        if msg.is_empty() {
            return Flow::Continue;
        }

        let mut ctx = Context::new(uid, matrix);
        match self.dispatch(&mut ctx, &msg) {
            Ok(()) => Flow::Continue,
            Err(HandlerError::Quit(reason)) => Flow::Quit(reason),
            Err(err) => {
                let cmd_name = msg.command_name().to_ascii_uppercase();
                debug!(
                    uid,
                    command = %cmd_name,
                    error = %err,
                    code = err.error_code(),
                    "command error"
                );
                ctx.send_error(&err, &cmd_name);
                Flow::Continue
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
