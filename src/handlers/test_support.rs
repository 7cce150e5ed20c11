//! In-memory harness for handler tests.
//!
//! Sessions are backed by plain channels instead of sockets, so a test can
//! drive lines through the registry and inspect exactly what was queued.

use crate::config::Config;
use crate::handlers::{Flow, Registry};
use crate::state::{Matrix, Session, Uid};
use std::collections::HashMap;
use tokio::sync::mpsc;

pub struct Harness {
    pub matrix: Matrix,
    registry: Registry,
    receivers: HashMap<Uid, mpsc::Receiver<String>>,
    next_uid: Uid,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config("[server]\nname = \"irc.test\"\nversion = \"test-1\"\n")
    }

    pub fn with_config(toml: &str) -> Self {
        let config: Config = toml.parse().unwrap();
        Self {
            matrix: Matrix::new(&config),
            registry: Registry::new(),
            receivers: HashMap::new(),
            next_uid: 1,
        }
    }

    pub fn connect(&mut self) -> Uid {
        self.connect_with_sendq(64)
    }

    pub fn connect_with_sendq(&mut self, sendq: usize) -> Uid {
        let uid = self.next_uid;
        self.next_uid += 1;
        let (tx, rx) = mpsc::channel(sendq);
        let authenticated = self.matrix.server_info.password.is_none();
        let addr = "127.0.0.1:40000".parse().unwrap();
        self.matrix
            .add_session(Session::new(uid, addr, tx, 512, authenticated));
        self.receivers.insert(uid, rx);
        uid
    }

    pub fn line(&mut self, uid: Uid, line: &str) -> Flow {
        self.registry.process_line(&mut self.matrix, uid, line)
    }

    /// Connect and complete registration as `nick`, discarding the burst.
    pub fn register(&mut self, nick: &str) -> Uid {
        let uid = self.connect();
        self.line(uid, &format!("NICK {nick}"));
        self.line(uid, &format!("USER {nick} 0 * :Real {nick}"));
        assert!(self.matrix.session(uid).unwrap().registered);
        self.drain(uid);
        uid
    }

    pub fn drain(&mut self, uid: Uid) -> Vec<String> {
        let rx = self.receivers.get_mut(&uid).unwrap();
        let mut out = Vec::new();
        while let Ok(line) = rx.try_recv() {
            out.push(line);
        }
        out
    }

    pub fn session(&self, uid: Uid) -> &Session {
        self.matrix.session(uid).unwrap()
    }
}
