//! Parsing of sketch uploads sent as data URIs.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;

const SEPARATOR: &str = ";base64,";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataUriError {
  #[error("missing `;base64,` separator")]
  MissingSeparator,

  #[error("unusable file extension {0:?}")]
  BadExtension(String),

  #[error("payload is not valid base64: {0}")]
  Payload(String),
}

/// A decoded `data:<mime-type>;base64,<payload>` upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
  /// Mime subtype, used verbatim as the stored file extension.
  pub extension: String,
  pub bytes:     Vec<u8>,
}

impl DataUri {
  pub fn parse(raw: &str) -> Result<Self, DataUriError> {
    let (header, payload) = raw
      .split_once(SEPARATOR)
      .ok_or(DataUriError::MissingSeparator)?;

    let extension = header.rsplit('/').next().unwrap_or_default();
    let usable = !extension.is_empty()
      && extension
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'-');
    if !usable {
      return Err(DataUriError::BadExtension(extension.to_owned()));
    }

    let bytes = STANDARD
      .decode(payload.trim())
      .map_err(|e| DataUriError::Payload(e.to_string()))?;

    Ok(Self { extension: extension.to_owned(), bytes })
  }
}
