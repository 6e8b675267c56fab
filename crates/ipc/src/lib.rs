mod client;
mod error;
mod protocol;

pub use client::{Client, translate_once};
pub use error::IpcError;
pub use protocol::{DEFAULT_SOURCE_LANG, DEFAULT_TARGET_LANG, TranslateRequest, TranslateResponse};
