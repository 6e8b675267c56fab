//! Common test utilities for worker integration tests.
//!
//! These tests run the real server over real Unix sockets in a tempdir,
//! with the translation engine replaced by an in-process double.

// Each integration test target pulls in only what it needs.
#![allow(dead_code)]

use std::{
  os::unix::fs::FileTypeExt,
  path::{Path, PathBuf},
  sync::{Arc, Mutex},
  time::Duration,
};

use async_trait::async_trait;
use daemon::{Server, ServerConfig, ServerError};
use engine::{EngineError, TranslationEngine};
use tempfile::TempDir;
use tokio::{
  io::{AsyncReadExt, AsyncWriteExt},
  net::UnixStream,
  task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

/// Engine double: canned translations, recorded calls, optional failure.
pub struct MockEngine {
  fail_with: Option<String>,
  calls: Mutex<Vec<(String, String, String)>>,
}

impl MockEngine {
  pub fn new() -> Self {
    Self {
      fail_with: None,
      calls: Mutex::new(Vec::new()),
    }
  }

  pub fn failing(message: &str) -> Self {
    Self {
      fail_with: Some(message.to_string()),
      calls: Mutex::new(Vec::new()),
    }
  }

  pub fn calls(&self) -> Vec<(String, String, String)> {
    self.calls.lock().unwrap().clone()
  }
}

#[async_trait]
impl TranslationEngine for MockEngine {
  fn name(&self) -> &str {
    "mock"
  }

  async fn ensure_package_available(&self, _source_lang: &str, _target_lang: &str) -> Result<(), EngineError> {
    Ok(())
  }

  async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String, EngineError> {
    self
      .calls
      .lock()
      .unwrap()
      .push((text.to_string(), source_lang.to_string(), target_lang.to_string()));

    if let Some(message) = &self.fail_with {
      return Err(EngineError::Engine(message.clone()));
    }
    match (text, target_lang) {
      ("Hello", "fr") => Ok("Bonjour".to_string()),
      _ => Ok(format!("{text} [{source_lang}->{target_lang}]")),
    }
  }
}

/// A server running over a tempdir socket, torn down via the token.
pub struct TestServer {
  // Held so the socket directory outlives the server
  _dir: TempDir,
  pub socket_path: PathBuf,
  pub cancel: CancellationToken,
  pub handle: JoinHandle<Result<(), ServerError>>,
}

impl TestServer {
  /// Cancel the server and wait for its cleanup to finish.
  pub async fn shutdown(self) -> PathBuf {
    self.cancel.cancel();
    self.handle.await.expect("server task panicked").expect("server failed");
    self.socket_path
  }
}

/// Start a server with the given engine and wait until it is accepting.
pub async fn start_server(engine: Arc<dyn TranslationEngine>) -> TestServer {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let socket_path = dir.path().join("lingod.sock");

  start_server_at(dir, socket_path, engine).await
}

/// Same as `start_server`, but on a caller-provided path (e.g. to plant a
/// stale socket file first).
pub async fn start_server_at(dir: TempDir, socket_path: PathBuf, engine: Arc<dyn TranslationEngine>) -> TestServer {
  let server = Server::new(ServerConfig {
    socket_path: socket_path.clone(),
    engine,
  });

  let cancel = CancellationToken::new();
  let handle = {
    let cancel = cancel.clone();
    tokio::spawn(async move { server.run(cancel).await })
  };

  // Wait for the socket to appear. Checking the file type (not just
  // existence) matters when a stale regular file was planted at the path:
  // the path only becomes a socket once the server has replaced it.
  let is_bound = |path: &Path| {
    path
      .metadata()
      .map(|m| m.file_type().is_socket())
      .unwrap_or(false)
  };
  for _ in 0..100 {
    if is_bound(&socket_path) {
      break;
    }
    tokio::time::sleep(Duration::from_millis(10)).await;
  }
  assert!(is_bound(&socket_path), "server never bound its socket");

  TestServer {
    _dir: dir,
    socket_path,
    cancel,
    handle,
  }
}

/// Send raw bytes over a fresh connection and collect everything the server
/// writes back before closing.
pub async fn send_raw(socket_path: &Path, payload: &[u8]) -> Vec<u8> {
  let mut stream = UnixStream::connect(socket_path).await.expect("connect failed");
  stream.write_all(payload).await.expect("write failed");

  let mut out = Vec::new();
  stream.read_to_end(&mut out).await.expect("read failed");
  out
}
