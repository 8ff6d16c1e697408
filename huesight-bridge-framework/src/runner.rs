//! Bridge lifecycle: startup, worker tasks, shutdown.

use std::future::Future;
use std::sync::Arc;

use tokio::signal;
use tokio::task::JoinSet;

use huesight_common::{LoggingConfig, connect, init_tracing};

use crate::BridgeArgs;
use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::publisher::Publisher;
use crate::status::StatusPublisher;

/// Owns the Zenoh session and the worker tasks of one bridge process.
///
/// Startup initializes tracing (honouring `--log-level`), opens the session
/// and builds a [`Publisher`] in the configured format.
/// [`run_with_metadata`](Self::run_with_metadata) then blocks until Ctrl+C
/// and tears everything down again.
pub struct BridgeRunner<C: BridgeConfig> {
    name: String,
    version: String,
    config: C,
    session: Arc<zenoh::Session>,
    publisher: Publisher,
    status: Option<StatusPublisher>,
    tasks: JoinSet<()>,
}

impl<C: BridgeConfig> BridgeRunner<C> {
    pub async fn new_with_args(
        name: impl Into<String>,
        config: C,
        args: Option<&BridgeArgs>,
    ) -> Result<Self> {
        let name = name.into();
        let version = env!("CARGO_PKG_VERSION").to_string();

        init_tracing(&effective_logging(config.logging(), args))
            .map_err(|e| BridgeError::config(e.to_string()))?;

        tracing::info!(
            bridge = %name,
            version = %version,
            key_prefix = %config.key_prefix(),
            format = ?config.format(),
            "Starting bridge"
        );

        let session = connect(config.zenoh())
            .await
            .map(Arc::new)
            .map_err(|e| BridgeError::ZenohConnection(e.to_string()))?;

        let publisher = Publisher::new(session.clone(), config.key_prefix(), config.format());

        Ok(Self {
            name,
            version,
            config,
            session,
            publisher,
            status: None,
            tasks: JoinSet::new(),
        })
    }

    /// Announce "running" on startup and "offline" on shutdown.
    pub fn with_status_publishing(mut self) -> Self {
        self.status = Some(StatusPublisher::new(
            self.publisher.clone(),
            &self.name,
            &self.version,
        ));
        self
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn publisher(&self) -> Publisher {
        self.publisher.clone()
    }

    /// Spawn a worker. Workers are aborted on shutdown.
    pub fn spawn<F>(&mut self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.spawn(future);
    }

    /// Run until Ctrl+C, with extra fields merged into the "running" status.
    pub async fn run_with_metadata(self, metadata: Option<serde_json::Value>) -> Result<()> {
        if let Some(status) = &self.status {
            if let Err(e) = status.publish_running(metadata).await {
                tracing::warn!(error = %e, "Failed to publish running status");
            }
        }

        tracing::info!(
            bridge = %self.name,
            tasks = self.tasks.len(),
            "Bridge running. Press Ctrl+C to stop."
        );

        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
        tracing::info!(bridge = %self.name, "Received shutdown signal");

        self.shutdown().await;
        Ok(())
    }

    async fn shutdown(mut self) {
        self.tasks.abort_all();
        while self.tasks.join_next().await.is_some() {}

        if let Some(status) = &self.status {
            if let Err(e) = status.publish_offline().await {
                tracing::warn!(error = %e, "Failed to publish offline status");
            }
        }

        if let Err(e) = self.session.close().await {
            tracing::warn!(error = %e, "Error closing Zenoh session");
        }

        tracing::info!(bridge = %self.name, "Bridge stopped");
    }
}

/// Logging settings with the CLI level, if any, taking precedence.
fn effective_logging(config: &LoggingConfig, args: Option<&BridgeArgs>) -> LoggingConfig {
    match args.and_then(|a| a.log_level.as_deref()) {
        Some(level) => config.with_level(level),
        None => config.clone(),
    }
}
