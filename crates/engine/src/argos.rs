//! HTTP adapter for an Argos-compatible translation service.
//!
//! The service manages its own language packages; this adapter asks it for
//! the installed pairs via `GET /languages` and translates via
//! `POST /translate`. Package download and installation happen entirely on
//! the service side.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, trace, warn};

use crate::{EngineError, TranslationEngine};

/// Default base URL for a locally running Argos Translate service.
pub const DEFAULT_ARGOS_URL: &str = "http://127.0.0.1:5000";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One entry of the engine's language index.
#[derive(Debug, Clone, Deserialize)]
pub struct Language {
  /// ISO 639-1 code of the source language
  pub code: String,
  #[serde(default)]
  pub name: String,
  /// Codes this source can be translated into (one installed package each)
  #[serde(default)]
  pub targets: Vec<String>,
}

#[derive(Debug, Serialize)]
struct TranslatePayload<'a> {
  text: &'a str,
  source_lang: &'a str,
  target_lang: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateReply {
  translated_text: String,
}

pub struct ArgosEngine {
  client: reqwest::Client,
  base_url: String,
  /// Language-pair index from the last successful `/languages` fetch.
  /// Refreshed lazily when a requested pair is not in it.
  index: RwLock<Option<Vec<Language>>>,
}

impl ArgosEngine {
  pub fn new(base_url: impl Into<String>) -> Result<Self, EngineError> {
    let base_url = base_url.into();
    let client = reqwest::Client::builder()
      .timeout(REQUEST_TIMEOUT)
      .build()
      .map_err(|e| EngineError::Http(e.to_string()))?;

    info!(base_url, "Argos engine adapter initialized");
    Ok(Self {
      client,
      base_url,
      index: RwLock::new(None),
    })
  }

  fn translate_url(&self) -> String {
    format!("{}/translate", self.base_url)
  }

  fn languages_url(&self) -> String {
    format!("{}/languages", self.base_url)
  }

  /// Check that the service answers its `/languages` endpoint.
  ///
  /// Used once at startup; a failure is reported but not fatal, translation
  /// requests will surface their own errors.
  pub async fn check_health(&self) -> Result<(), EngineError> {
    let index = self.fetch_index().await?;
    debug!(languages = index.len(), "engine health check passed");
    Ok(())
  }

  async fn fetch_index(&self) -> Result<Vec<Language>, EngineError> {
    trace!(url = %self.languages_url(), "refreshing language index");
    let start = Instant::now();

    let response = self
      .client
      .get(self.languages_url())
      .send()
      .await
      .map_err(|e| EngineError::PackageIndex(e.to_string()))?;

    if !response.status().is_success() {
      let status = response.status();
      let body = response.text().await.unwrap_or_default();
      return Err(EngineError::PackageIndex(format!("{} returned {status}: {body}", self.name())));
    }

    let index: Vec<Language> = response.json().await.map_err(|e| EngineError::PackageIndex(e.to_string()))?;

    debug!(
      languages = index.len(),
      elapsed_ms = start.elapsed().as_millis() as u64,
      "language index refreshed"
    );
    Ok(index)
  }
}

fn pair_available(index: &[Language], source_lang: &str, target_lang: &str) -> bool {
  index
    .iter()
    .any(|lang| lang.code == source_lang && lang.targets.iter().any(|t| t == target_lang))
}

#[async_trait]
impl TranslationEngine for ArgosEngine {
  fn name(&self) -> &str {
    "argos"
  }

  async fn ensure_package_available(&self, source_lang: &str, target_lang: &str) -> Result<(), EngineError> {
    if let Some(index) = self.index.read().await.as_deref()
      && pair_available(index, source_lang, target_lang)
    {
      trace!(source_lang, target_lang, "package already known to be installed");
      return Ok(());
    }

    // Unknown pair: refresh the index and look again. The service installs
    // packages on its side, so a refresh is all the adapter can do.
    let fresh = self.fetch_index().await?;
    let available = pair_available(&fresh, source_lang, target_lang);
    *self.index.write().await = Some(fresh);

    if available {
      debug!(source_lang, target_lang, "package found after index refresh");
      Ok(())
    } else {
      warn!(source_lang, target_lang, "no package for the requested pair");
      Err(EngineError::PackageMissing {
        source: source_lang.to_string(),
        target: target_lang.to_string(),
      })
    }
  }

  async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String, EngineError> {
    let payload = TranslatePayload {
      text,
      source_lang,
      target_lang,
    };

    trace!(source_lang, target_lang, text_len = text.len(), "sending translate request");
    let start = Instant::now();

    let response = self.client.post(self.translate_url()).json(&payload).send().await?;

    if !response.status().is_success() {
      let status = response.status();
      let body = response.text().await.unwrap_or_default();
      warn!(%status, source_lang, target_lang, "translate request failed");
      return Err(EngineError::Engine(format!("{} returned {status}: {body}", self.name())));
    }

    let reply: TranslateReply = response.json().await.map_err(|e| EngineError::Engine(e.to_string()))?;

    debug!(
      source_lang,
      target_lang,
      text_len = text.len(),
      elapsed_ms = start.elapsed().as_millis() as u64,
      "translation complete"
    );
    Ok(reply.translated_text)
  }
}
