use std::fmt;

/// Failures surfaced by a translation engine.
///
/// None of these are retried; the server forwards the message text to the
/// client inside the wire-format error payload.
///
/// Implemented by hand rather than via `thiserror` because the
/// `PackageMissing::source` field is a language code, not an error source,
/// and `thiserror` treats any field named `source` as the `Error::source()`.
#[derive(Debug)]
pub enum EngineError {
  /// The engine has no translation package for the requested pair, even
  /// after refreshing its package index.
  PackageMissing { source: String, target: String },

  /// Refreshing the package index failed (network, bad status, bad body).
  PackageIndex(String),

  /// The translation endpoint itself failed.
  Engine(String),

  /// Transport-level failure talking to the engine.
  Http(String),
}

impl fmt::Display for EngineError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EngineError::PackageMissing { source, target } => {
        write!(f, "no translation package available for {source}->{target}")
      }
      EngineError::PackageIndex(msg) => {
        write!(f, "package index refresh failed: {msg}")
      }
      EngineError::Engine(msg) => write!(f, "translation engine error: {msg}"),
      EngineError::Http(msg) => write!(f, "engine request failed: {msg}"),
    }
  }
}

impl std::error::Error for EngineError {}

impl From<reqwest::Error> for EngineError {
  fn from(err: reqwest::Error) -> Self {
    EngineError::Http(err.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_package_missing_display() {
    let err = EngineError::PackageMissing {
      source: "en".to_string(),
      target: "xx".to_string(),
    };
    assert_eq!(err.to_string(), "no translation package available for en->xx");
  }

  #[test]
  fn test_engine_display() {
    let err = EngineError::Engine("argos returned 500: boom".to_string());
    assert_eq!(err.to_string(), "translation engine error: argos returned 500: boom");
  }
}
