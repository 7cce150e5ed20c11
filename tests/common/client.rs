//! Test IRC client.
//!
//! Speaks raw lines over TCP so tests can assert on exact server output.

use ember_proto::tokenize;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// Default wait for a single line.
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// A test IRC client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
    nick: String,
}

impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str, nick: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        let (read_half, write_half) = stream.into_split();

        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
            nick: nick.to_string(),
        })
    }

    /// Send raw bytes exactly as given.
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Send one line, adding CR-LF if missing.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with("\r\n") {
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive one line, without its terminator.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        self.recv_timeout(RECV_TIMEOUT).await
    }

    /// Receive one line with a timeout.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<String> {
        let mut line = String::new();
        let n = timeout(dur, self.reader.read_line(&mut line)).await??;
        if n == 0 {
            anyhow::bail!("connection closed");
        }
        if !line.ends_with("\r\n") {
            anyhow::bail!("line not CR-LF terminated: {line:?}");
        }
        line.truncate(line.len() - 2);
        Ok(line)
    }

    /// Receive lines until `predicate` matches, returning all of them.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<String>>
    where
        F: FnMut(&str) -> bool,
    {
        let mut lines = Vec::new();
        loop {
            let line = self.recv().await?;
            let done = predicate(&line);
            lines.push(line);
            if done {
                return Ok(lines);
            }
        }
    }

    /// Receive lines up to and including the given numeric or verb.
    pub async fn recv_until_command(&mut self, command: &str) -> anyhow::Result<Vec<String>> {
        self.recv_until(|line| command_of(line) == command).await
    }

    /// Assert that nothing arrives within `dur`.
    pub async fn expect_silence(&mut self, dur: Duration) -> anyhow::Result<()> {
        match self.recv_timeout(dur).await {
            Ok(line) => anyhow::bail!("unexpected line: {line}"),
            Err(e) if e.downcast_ref::<tokio::time::error::Elapsed>().is_some() => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Wait for the server to close the connection.
    pub async fn expect_closed(&mut self) -> anyhow::Result<Vec<String>> {
        let mut lines = Vec::new();
        loop {
            let mut line = String::new();
            let n = timeout(RECV_TIMEOUT, self.reader.read_line(&mut line)).await??;
            if n == 0 {
                return Ok(lines);
            }
            lines.push(line.trim_end_matches("\r\n").to_string());
        }
    }

    /// Register with NICK + USER and consume the welcome burst.
    pub async fn register(&mut self) -> anyhow::Result<Vec<String>> {
        let nick = self.nick.clone();
        self.send_raw(&format!("NICK {nick}")).await?;
        self.send_raw(&format!("USER {nick} 0 * :Test User {nick}"))
            .await?;

        let lines = self.recv_until_command("376").await?;
        if lines.first().map(|l| command_of(l)) != Some("001") {
            anyhow::bail!("Registration failed: {lines:?}");
        }
        Ok(lines)
    }

    /// Join a channel and consume the join burst up to RPL_ENDOFNAMES.
    pub async fn join(&mut self, channel: &str) -> anyhow::Result<Vec<String>> {
        self.send_raw(&format!("JOIN {channel}")).await?;
        self.recv_until_command("366").await
    }

    #[allow(dead_code)]
    pub fn nick(&self) -> &str {
        &self.nick
    }
}

/// The verb or numeric of a server line.
pub fn command_of(line: &str) -> &str {
    tokenize(line).first().copied().unwrap_or("")
}
