use crate::core::{Result, TagError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DATA_URL: Regex = Regex::new(r"^data:.+/(.+);base64,(.*)$")
        .expect("data URL pattern is valid");
}

/// Turns an encoded image payload into bytes.
///
/// Runs before a transaction opens. Format validation is not its concern.
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, raw: &str) -> Result<Vec<u8>>;
}

/// Decodes `data:<type>/<subtype>;base64,<payload>` URLs.
///
/// Blank input decodes to no bytes, which the update path treats as "clear".
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUrlDecoder;

impl ImageDecoder for DataUrlDecoder {
    fn decode(&self, raw: &str) -> Result<Vec<u8>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Vec::new());
        }

        let captures = DATA_URL
            .captures(raw)
            .ok_or_else(|| TagError::ImageDecode("expected a base64 data URL".into()))?;
        let payload = captures.get(2).map(|m| m.as_str()).unwrap_or_default();

        STANDARD
            .decode(payload)
            .map_err(|e| TagError::ImageDecode(format!("invalid base64 payload: {}", e)))
    }
}
