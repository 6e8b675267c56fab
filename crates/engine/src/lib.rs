//! Translation engine interface and adapters.
//!
//! The worker itself never translates anything: it hands every request to a
//! [`TranslationEngine`] and forwards whatever comes back. The engine owns
//! language packages entirely (index refresh, download, install); the worker
//! only asks whether a language pair is usable and surfaces failures verbatim.

mod argos;
mod error;

use async_trait::async_trait;

pub use argos::{ArgosEngine, DEFAULT_ARGOS_URL, Language};
pub use error::EngineError;

/// An external machine-translation backend.
///
/// Both operations may block on network or disk I/O for as long as the engine
/// needs; callers do not retry and do not impose timeouts of their own.
#[async_trait]
pub trait TranslationEngine: Send + Sync {
  /// Short engine identifier for logs.
  fn name(&self) -> &str;

  /// Idempotently make sure a translation package for the pair is usable.
  ///
  /// Refreshes the engine's package index when the pair is unknown. Returns
  /// [`EngineError::PackageMissing`] if no package exists for the pair even
  /// after a refresh.
  async fn ensure_package_available(&self, source_lang: &str, target_lang: &str) -> Result<(), EngineError>;

  /// Translate `text` from `source_lang` to `target_lang`.
  async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String, EngineError>;
}
