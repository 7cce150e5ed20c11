//! Test server management.
//!
//! Runs the reactor in-process on an ephemeral port and stops it when the
//! handle is dropped.

use emberd::{Config, Server};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A running test server.
pub struct TestServer {
    address: String,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<anyhow::Result<()>>>,
}

impl TestServer {
    /// Spawn a server with default settings.
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::spawn_with("").await
    }

    /// Spawn a server, appending `extra` TOML to the base config.
    ///
    /// `extra` may add keys to `[server]` (it is inserted right after the
    /// section header) and may add further sections.
    pub async fn spawn_with(extra: &str) -> anyhow::Result<Self> {
        let toml = format!(
            "[server]\nname = \"test.server\"\nversion = \"emberd-test\"\n{extra}\n\n\
             [listen]\naddress = \"127.0.0.1:0\"\n"
        );
        let config: Config = toml.parse()?;
        let server = Server::bind(config).await?;
        let address = server.local_addr()?.to_string();

        let (tx, rx) = oneshot::channel();
        let task = tokio::spawn(server.run_until(async move {
            let _ = rx.await;
        }));

        Ok(Self {
            address,
            shutdown: Some(tx),
            task: Some(task),
        })
    }

    /// Get the server address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Stop the server and wait for it to finish.
    #[allow(dead_code)]
    pub async fn stop(mut self) -> anyhow::Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.await??;
        }
        Ok(())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
