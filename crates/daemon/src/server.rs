//! IPC server: socket lifecycle and the accept/handle loop.
//!
//! The server accepts one connection at a time and handles it to completion
//! before accepting the next. Requests are deliberately serialized: the
//! external translation engine is not assumed reentrant-safe across its
//! language/package state, so one in-flight request is the whole design.
//!
//! # Protocol
//!
//! - Request: one JSON object per connection, read with a single fixed-size
//!   read (no length framing).
//! - Response: one JSON object terminated by `\n`, then the connection is
//!   closed.
//!
//! # Error Handling
//!
//! - Parse and engine errors are answered with a structured error payload.
//! - Accept errors are logged and the loop continues.
//! - Per-connection IO errors abandon that connection only.

use std::{io, os::unix::fs::PermissionsExt, path::PathBuf, sync::Arc, time::Instant};

use engine::{EngineError, TranslationEngine};
use ipc::{TranslateRequest, TranslateResponse};
use thiserror::Error;
use tokio::{
  io::{AsyncReadExt, AsyncWriteExt},
  net::{UnixListener, UnixStream},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Largest request payload read from a connection. There is no length
/// framing; anything beyond this is silently truncated (known limitation).
pub const MAX_REQUEST_BYTES: usize = 4096;

/// Socket file mode: owner and group read/write, so sibling containers in
/// the same pod can connect.
const SOCKET_MODE: u32 = 0o660;

#[derive(Debug, Error)]
pub enum ServerError {
  #[error("IO error: {0}")]
  Io(#[from] io::Error),
}

/// Everything the server needs, provided upfront. No two-phase init.
pub struct ServerConfig {
  /// Path of the Unix socket to listen on
  pub socket_path: PathBuf,
  /// Translation backend all requests are delegated to
  pub engine: Arc<dyn TranslationEngine>,
}

pub struct Server {
  config: ServerConfig,
}

impl Server {
  pub fn new(config: ServerConfig) -> Self {
    Self { config }
  }

  /// Run the server until the cancellation token is triggered.
  ///
  /// Removes any stale socket file before binding, creates the parent
  /// directory if needed, and removes the socket file again on shutdown.
  pub async fn run(&self, cancel: CancellationToken) -> Result<(), ServerError> {
    // A leftover socket file from a previous run would make bind fail
    if self.config.socket_path.exists() {
      tokio::fs::remove_file(&self.config.socket_path).await?;
    }

    if let Some(parent) = self.config.socket_path.parent() {
      tokio::fs::create_dir_all(parent).await?;
    }

    let listener = UnixListener::bind(&self.config.socket_path)?;
    std::fs::set_permissions(&self.config.socket_path, std::fs::Permissions::from_mode(SOCKET_MODE))?;
    info!(
      socket = %self.config.socket_path.display(),
      engine = self.config.engine.name(),
      "Worker listening"
    );

    loop {
      tokio::select! {
        biased;

        _ = cancel.cancelled() => {
          info!("Server shutting down (cancelled)");
          break;
        }

        result = listener.accept() => {
          match result {
            Ok((stream, _)) => {
              // Handled inline, not spawned: the next connection waits
              // until this one is answered and closed.
              if let Err(e) = handle_connection(stream, self.config.engine.as_ref()).await {
                warn!(error = %e, "Connection abandoned");
              }
            }
            Err(e) => {
              error!("Accept error: {}", e);
            }
          }
        }
      }
    }

    // Cleanup socket file
    if self.config.socket_path.exists() {
      tokio::fs::remove_file(&self.config.socket_path).await?;
    }

    Ok(())
  }
}

/// Handle a single client connection: one read, one translate, one write.
///
/// A peer that closes without sending anything is a no-op, not an error.
/// All recoverable failures are converted into a wire-format error payload;
/// only transport errors propagate (the caller logs and moves on).
async fn handle_connection(mut stream: UnixStream, engine: &dyn TranslationEngine) -> io::Result<()> {
  let mut buf = vec![0u8; MAX_REQUEST_BYTES];
  let n = stream.read(&mut buf).await?;
  if n == 0 {
    debug!("Client closed without sending data");
    return Ok(());
  }

  let request: TranslateRequest = match serde_json::from_slice(&buf[..n]) {
    Ok(r) => r,
    Err(e) => {
      warn!("Invalid request JSON: {}", e);
      return write_response(&mut stream, &TranslateResponse::error(format!("Invalid JSON: {e}"))).await;
    }
  };

  let start = Instant::now();
  debug!(
    source_lang = %request.source_lang,
    target_lang = %request.target_lang,
    text_len = request.text.len(),
    "Processing request"
  );

  let result = translate(engine, &request).await;

  let response = match result {
    Ok(translated_text) => TranslateResponse::ok(translated_text),
    Err(e) => {
      warn!(error = %e, "Translation request failed");
      TranslateResponse::error(format!("Translation failed: {e}"))
    }
  };

  write_response(&mut stream, &response).await?;

  debug!(
    success = response.success,
    elapsed_ms = start.elapsed().as_millis() as u64,
    "Request completed"
  );
  Ok(())
}

/// Make sure a package for the pair exists, then translate. Both steps go to
/// the engine; neither is retried.
async fn translate(engine: &dyn TranslationEngine, request: &TranslateRequest) -> Result<String, EngineError> {
  engine
    .ensure_package_available(&request.source_lang, &request.target_lang)
    .await?;
  engine
    .translate(&request.text, &request.source_lang, &request.target_lang)
    .await
}

/// The single write a handled connection gets: JSON payload plus newline.
async fn write_response(stream: &mut UnixStream, response: &TranslateResponse) -> io::Result<()> {
  let mut payload = serde_json::to_vec(response).map_err(io::Error::other)?;
  payload.push(b'\n');
  stream.write_all(&payload).await
}
