//! One-shot client for the translation worker socket.
//!
//! The server handles exactly one request per connection, so the client is
//! consumed by [`Client::translate`]: send the request as a JSON line, read
//! the single newline-terminated response, done.

use std::path::Path;

use futures::{SinkExt, StreamExt};
use tokio::net::UnixStream;
use tokio_util::codec::{Framed, LinesCodec};
use tracing::debug;

use crate::{IpcError, TranslateRequest, TranslateResponse};

pub struct Client {
  framed: Framed<UnixStream, LinesCodec>,
}

impl Client {
  /// Connect to a worker listening at `socket_path`.
  pub async fn connect(socket_path: &Path) -> Result<Self, IpcError> {
    let stream = UnixStream::connect(socket_path)
      .await
      .map_err(|e| IpcError::Connection(format!("{}: {e}", socket_path.display())))?;
    debug!(socket = %socket_path.display(), "connected to worker");

    Ok(Self {
      framed: Framed::new(stream, LinesCodec::new()),
    })
  }

  /// Send one request and wait for the response. Consumes the client since
  /// the server closes the connection after answering.
  pub async fn translate(mut self, request: &TranslateRequest) -> Result<TranslateResponse, IpcError> {
    let json = serde_json::to_string(request)?;
    self.framed.send(json).await?;

    match self.framed.next().await {
      Some(Ok(line)) => Ok(serde_json::from_str(&line)?),
      Some(Err(e)) => Err(e.into()),
      None => Err(IpcError::Closed),
    }
  }
}

/// Convenience wrapper: connect, translate, disconnect.
pub async fn translate_once(socket_path: &Path, request: &TranslateRequest) -> Result<TranslateResponse, IpcError> {
  Client::connect(socket_path).await?.translate(request).await
}
