//! Per-connection socket tasks.
//!
//! ```text
//!  socket ──▶ reader task ──Event──▶ reactor (owns Matrix)
//!  socket ◀── writer task ◀──sendq── Session::send
//! ```
//!
//! The reader forwards every chunk it reads as-is; framing happens in the
//! reactor against the session's buffer. The writer drains the session's
//! bounded queue through a `FramedWrite` so every line leaves CR-LF
//! terminated.

use crate::state::Uid;
use bytes::{Bytes, BytesMut};
use ember_proto::LineCodec;
use futures_util::SinkExt;
use tokio::io::AsyncReadExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::codec::FramedWrite;
use tracing::debug;

/// Socket activity reported to the reactor.
#[derive(Debug)]
pub enum Event {
    /// Bytes read from the peer.
    Data { uid: Uid, bytes: Bytes },
    /// The peer closed its side.
    Closed { uid: Uid },
    /// A read failed.
    Failed { uid: Uid, error: std::io::Error },
}

/// Read from the socket until EOF or error, forwarding every chunk.
///
/// Each read drains whatever the socket has ready, up to `chunk` bytes,
/// and the chunk is handed over whole before the next read.
pub fn spawn_reader(
    uid: Uid,
    mut read_half: OwnedReadHalf,
    chunk: usize,
    events: mpsc::Sender<Event>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut buf = BytesMut::with_capacity(chunk);
        loop {
            buf.reserve(chunk);
            let event = match read_half.read_buf(&mut buf).await {
                Ok(0) => Event::Closed { uid },
                Ok(_) => Event::Data {
                    uid,
                    bytes: buf.split().freeze(),
                },
                Err(error) => Event::Failed { uid, error },
            };
            let done = !matches!(event, Event::Data { .. });
            if events.send(event).await.is_err() || done {
                break;
            }
        }
        debug!(uid, "reader finished");
    })
}

/// Drain the outbound queue into the socket until every sender is gone.
///
/// Lines already queued when the session is dropped are still written,
/// then the write half is shut down.
pub fn spawn_writer(
    uid: Uid,
    write_half: OwnedWriteHalf,
    mut outbound: mpsc::Receiver<String>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut sink = FramedWrite::new(write_half, LineCodec::new());
        while let Some(line) = outbound.recv().await {
            if let Err(e) = sink.feed(line).await {
                debug!(uid, error = %e, "write failed");
                return;
            }
            // Batch whatever else is already queued into one flush.
            while let Ok(line) = outbound.try_recv() {
                if let Err(e) = sink.feed(line).await {
                    debug!(uid, error = %e, "write failed");
                    return;
                }
            }
            if let Err(e) = sink.flush().await {
                debug!(uid, error = %e, "flush failed");
                return;
            }
        }
        if let Err(e) = sink.close().await {
            debug!(uid, error = %e, "close failed");
        }
        debug!(uid, "writer finished");
    })
}
