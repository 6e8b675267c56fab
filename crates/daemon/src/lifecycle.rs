//! Worker lifecycle: configuration, engine wiring, and signal handling.
//!
//! # Lifecycle
//!
//! 1. Build the engine adapter and run a best-effort health check
//! 2. Create the master `CancellationToken`
//! 3. Spawn the signal task (SIGINT / SIGTERM cancel the token)
//! 4. Run the server until cancelled
//! 5. Server cleanup removes the socket file; process exits 0

use std::{path::PathBuf, sync::Arc};

use engine::{ArgosEngine, DEFAULT_ARGOS_URL, EngineError, TranslationEngine};
use thiserror::Error;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::server::{Server, ServerConfig, ServerError};

#[derive(Debug, Error)]
pub enum LifecycleError {
  #[error("Engine error: {0}")]
  Engine(#[from] EngineError),
  #[error("Server error: {0}")]
  Server(#[from] ServerError),
}

/// Worker runtime configuration.
///
/// The socket path is an explicit value handed to the constructor, never a
/// process-wide global.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
  /// Path of the Unix socket to listen on
  pub socket_path: PathBuf,
  /// Base URL of the Argos-compatible translation service
  pub engine_url: String,
}

impl RuntimeConfig {
  pub fn new(socket_path: PathBuf) -> Self {
    Self {
      socket_path,
      engine_url: DEFAULT_ARGOS_URL.to_string(),
    }
  }

  pub fn with_engine_url(mut self, engine_url: impl Into<String>) -> Self {
    self.engine_url = engine_url.into();
    self
  }
}

/// The worker daemon - runs until interrupted.
pub struct Daemon {
  config: RuntimeConfig,
}

impl Daemon {
  pub fn new(config: RuntimeConfig) -> Self {
    Self { config }
  }

  /// Run the worker (blocking until shutdown).
  pub async fn run(self) -> Result<(), LifecycleError> {
    info!("Starting translation worker");
    info!("Socket: {:?}", self.config.socket_path);
    info!("Engine: {}", self.config.engine_url);

    let engine = ArgosEngine::new(self.config.engine_url.clone())?;

    // Best-effort: a cold engine is not fatal, requests surface their own
    // errors once it comes up.
    info!("Checking translation engine health...");
    match engine.check_health().await {
      Ok(()) => info!("Engine health check passed"),
      Err(e) => {
        warn!("Engine health check failed: {}", e);
        warn!("Continuing; translation requests may fail until the engine is ready");
      }
    }

    let engine: Arc<dyn TranslationEngine> = Arc::new(engine);

    let cancel = CancellationToken::new();
    spawn_signal_task(cancel.clone());

    let server = Server::new(ServerConfig {
      socket_path: self.config.socket_path.clone(),
      engine,
    });
    server.run(cancel.child_token()).await?;

    info!("Worker shutdown complete");
    Ok(())
  }
}

/// Cancel the token on SIGINT or SIGTERM. An in-progress request finishes;
/// only the accept wait is aborted.
fn spawn_signal_task(cancel: CancellationToken) {
  tokio::spawn(async move {
    let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
      Ok(s) => s,
      Err(e) => {
        warn!("Failed to install SIGTERM handler: {}", e);
        return;
      }
    };

    tokio::select! {
      result = signal::ctrl_c() => {
        if let Err(e) = result {
          warn!("Failed to listen for ctrl-c: {}", e);
          return;
        }
        info!("Received ctrl-c, shutting down...");
      }
      _ = sigterm.recv() => {
        info!("Received SIGTERM, shutting down...");
      }
    }

    cancel.cancel();
  });
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_runtime_config_defaults() {
    let config = RuntimeConfig::new(PathBuf::from("/run/lingod.sock"));
    assert_eq!(config.socket_path, PathBuf::from("/run/lingod.sock"));
    assert_eq!(config.engine_url, DEFAULT_ARGOS_URL);
  }

  #[test]
  fn test_runtime_config_engine_override() {
    let config = RuntimeConfig::new(PathBuf::from("/tmp/w.sock")).with_engine_url("http://mt:9000");
    assert_eq!(config.engine_url, "http://mt:9000");
  }
}
