//! Gateway - the connection reactor.
//!
//! One task owns the listener, the [`Matrix`] and the command [`Registry`].
//! It multiplexes new connections and socket events from the per-connection
//! reader tasks, and every command runs to completion before the next event
//! is looked at.

use super::connection::{Event, spawn_reader, spawn_writer};
use crate::config::Config;
use crate::handlers::{Flow, Registry};
use crate::state::{Matrix, Session, Uid};
use ember_proto::Message;
use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Capacity of the reader-to-reactor event queue.
const EVENT_QUEUE: usize = 1024;

/// How long shutdown waits for writers to flush.
const SHUTDOWN_FLUSH: Duration = Duration::from_secs(2);

/// Socket tasks backing one session.
struct Link {
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

/// The IRC server: listener plus reactor state.
pub struct Server {
    listener: TcpListener,
    matrix: Matrix,
    registry: Registry,
    events_tx: mpsc::Sender<Event>,
    events_rx: mpsc::Receiver<Event>,
    links: HashMap<Uid, Link>,
    next_uid: Uid,
}

impl Server {
    /// Bind the listener described by `config`.
    pub async fn bind(config: Config) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(config.listen.address).await?;
        let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE);
        info!(addr = %listener.local_addr()?, server = %config.server.name, "listener bound");

        Ok(Self {
            listener,
            matrix: Matrix::new(&config),
            registry: Registry::new(),
            events_tx,
            events_rx,
            links: HashMap::new(),
            next_uid: 1,
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run until the process is killed.
    pub async fn run(self) -> anyhow::Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Run until `shutdown` resolves, then close every session.
    #[instrument(skip_all, name = "gateway")]
    pub async fn run_until<F>(mut self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                Some(event) = self.events_rx.recv() => self.handle_event(event),
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => self.accept(stream, addr),
                    Err(e) => warn!(error = %e, "accept failed"),
                },
            }
            self.flush_disconnects();
        }

        self.shutdown().await;
        Ok(())
    }

    fn accept(&mut self, stream: TcpStream, addr: SocketAddr) {
        if self.matrix.session_count() >= self.matrix.limits.max_connections {
            warn!(%addr, "connection limit reached, refusing");
            tokio::spawn(refuse(stream));
            return;
        }

        if let Err(e) = stream.set_nodelay(true) {
            debug!(%addr, error = %e, "failed to set TCP_NODELAY");
        }

        let uid = self.next_uid;
        self.next_uid += 1;

        let (read_half, write_half) = stream.into_split();
        let (outbound_tx, outbound_rx) = mpsc::channel(self.matrix.limits.sendq);
        let link = Link {
            reader: spawn_reader(
                uid,
                read_half,
                self.matrix.limits.recv_buffer,
                self.events_tx.clone(),
            ),
            writer: spawn_writer(uid, write_half, outbound_rx),
        };
        self.links.insert(uid, link);

        let authenticated = self.matrix.server_info.password.is_none();
        self.matrix.add_session(Session::new(
            uid,
            addr,
            outbound_tx,
            self.matrix.limits.max_input_buffer,
            authenticated,
        ));
        info!(uid, %addr, "client connected");
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Data { uid, bytes } => self.handle_data(uid, &bytes),
            Event::Closed { uid } => self.disconnect(uid, "Connection closed", false),
            Event::Failed { uid, error } => {
                warn!(uid, error = %error, "read failed");
                self.disconnect(uid, &error.to_string(), false);
            }
        }
    }

    /// Frame and process every complete line in the chunk.
    fn handle_data(&mut self, uid: Uid, bytes: &[u8]) {
        let Some(session) = self.matrix.session_mut(uid) else {
            return;
        };
        session.append(bytes);

        loop {
            let next = match self.matrix.session_mut(uid) {
                Some(session) => session.extract_line(),
                None => return,
            };
            let line = match next {
                Ok(Some(line)) => line,
                Ok(None) => return,
                Err(e) => {
                    warn!(uid, error = %e, "input buffer exceeded");
                    self.disconnect(uid, "Input buffer exceeded", true);
                    return;
                }
            };

            debug!(uid, line = %line, "recv");
            if let Flow::Quit(reason) = self.registry.process_line(&mut self.matrix, uid, &line) {
                let reason = reason.unwrap_or_else(|| "Client Quit".to_string());
                self.disconnect(uid, &reason, true);
                return;
            }
            if self.matrix.is_disconnect_pending(uid) {
                return;
            }
        }
    }

    /// Tear down one session.
    ///
    /// The session leaves every channel and its co-members hear one QUIT.
    /// With `farewell` set the client is sent a closing-link notice first.
    fn disconnect(&mut self, uid: Uid, reason: &str, farewell: bool) {
        if let Some(link) = self.links.remove(&uid) {
            link.reader.abort();
            // The writer exits on its own once the session's sender is gone.
            drop(link.writer);
        }

        let Some(session) = self.matrix.remove_session(uid, reason) else {
            return;
        };
        if farewell {
            let notice = closing_link(session.nick_or_star(), reason);
            // Best effort; the queue may be the reason we are here.
            let _ = session.send(notice);
        }
        info!(
            uid,
            nick = %session.nick_or_star(),
            addr = %session.remote_addr,
            reason = %reason,
            "client disconnected"
        );
    }

    /// Disconnect every session whose send queue failed.
    ///
    /// Teardown can itself overflow more queues, so this runs to a fixpoint.
    fn flush_disconnects(&mut self) {
        loop {
            let pending = self.matrix.take_pending_disconnects();
            if pending.is_empty() {
                return;
            }
            for (uid, reason) in pending {
                self.disconnect(uid, &reason, true);
            }
        }
    }

    async fn shutdown(mut self) {
        info!(sessions = self.matrix.session_count(), "shutting down");

        let uids: Vec<Uid> = self.matrix.sessions.keys().copied().collect();
        for uid in &uids {
            if let Some(session) = self.matrix.session(*uid) {
                let _ = session.send(closing_link(session.nick_or_star(), "Server shutting down"));
            }
        }
        self.matrix.sessions.clear();

        let writers: Vec<JoinHandle<()>> = self
            .links
            .drain()
            .map(|(_, link)| {
                link.reader.abort();
                link.writer
            })
            .collect();
        let flushed = futures_util::future::join_all(writers);
        if tokio::time::timeout(SHUTDOWN_FLUSH, flushed).await.is_err() {
            warn!("timed out waiting for writers to flush");
        }
    }
}

fn closing_link(nick: &str, reason: &str) -> String {
    Message::error(format!("Closing Link: {nick} ({reason})")).to_string()
}

/// Tell an over-limit client why it is being dropped, then close.
async fn refuse(mut stream: TcpStream) {
    let line = format!("{}\r\n", closing_link("*", "Too many connections"));
    if let Err(e) = stream.write_all(line.as_bytes()).await {
        debug!(error = %e, "failed to send refusal");
    }
    let _ = stream.shutdown().await;
}
