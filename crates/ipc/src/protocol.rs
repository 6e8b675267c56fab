//! Wire types for the translation worker protocol.
//!
//! A connection carries exactly one exchange: the client sends a single JSON
//! request object and the server answers with a single newline-terminated
//! JSON response before closing the connection.

use serde::{Deserialize, Serialize};

/// Language assumed when the request omits `source_lang`.
pub const DEFAULT_SOURCE_LANG: &str = "en";
/// Language assumed when the request omits `target_lang`.
pub const DEFAULT_TARGET_LANG: &str = "fr";

fn default_source_lang() -> String {
  DEFAULT_SOURCE_LANG.to_string()
}

fn default_target_lang() -> String {
  DEFAULT_TARGET_LANG.to_string()
}

/// A single translation request.
///
/// Every field is defaulted on deserialize so a bare `{}` is still a valid
/// (if useless) request: empty text, en -> fr.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
  #[serde(default)]
  pub text: String,
  /// ISO 639-1 code of the input language
  #[serde(default = "default_source_lang")]
  pub source_lang: String,
  /// ISO 639-1 code of the output language
  #[serde(default = "default_target_lang")]
  pub target_lang: String,
}

impl TranslateRequest {
  pub fn new(text: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      source_lang: default_source_lang(),
      target_lang: default_target_lang(),
    }
  }

  pub fn with_langs(text: impl Into<String>, source_lang: impl Into<String>, target_lang: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      source_lang: source_lang.into(),
      target_lang: target_lang.into(),
    }
  }
}

/// A single translation response.
///
/// Exactly one of `translated_text` / `error` is present on the wire; the
/// other field is omitted entirely rather than serialized as null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
  pub success: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub translated_text: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl TranslateResponse {
  pub fn ok(translated_text: impl Into<String>) -> Self {
    Self {
      success: true,
      translated_text: Some(translated_text.into()),
      error: None,
    }
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self {
      success: false,
      translated_text: None,
      error: Some(message.into()),
    }
  }

  pub fn is_ok(&self) -> bool {
    self.success
  }
}
