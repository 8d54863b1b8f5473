//! Base64 data-URL codec for image payloads.
//!
//! Photos are persisted as `data:{mime};base64,{payload}` strings, the
//! same encoding a browser file reader or canvas produces, so a stored
//! photo can be handed straight to a web view and converted back to raw
//! bytes for upload.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;

/// MIME type assumed when a data URL carries no parseable header.
pub const FALLBACK_MIME: &str = "image/jpeg";

#[derive(Debug, Error)]
pub enum DataUrlError {
    #[error("data URL has no payload separator")]
    MissingPayload,

    #[error("data URL payload is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// An image payload recovered from a data URL.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Encode raw image bytes as a base64 data URL.
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

/// Decode a data URL back into its MIME type and raw bytes.
///
/// A missing or empty MIME header falls back to [`FALLBACK_MIME`]; a
/// missing payload separator or an undecodable payload is an error.
pub fn decode(data_url: &str) -> Result<DecodedImage, DataUrlError> {
    let (header, payload) = data_url
        .split_once(',')
        .ok_or(DataUrlError::MissingPayload)?;

    // MIME sits between the first ':' and the first ';' of the header.
    let mime = header
        .split_once(':')
        .and_then(|(_, rest)| rest.split_once(';'))
        .map(|(mime, _)| mime)
        .filter(|m| !m.is_empty())
        .unwrap_or(FALLBACK_MIME)
        .to_string();

    let bytes = BASE64.decode(payload)?;

    Ok(DecodedImage { mime, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_bytes_and_mime() {
        let bytes = vec![0xFFu8, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        let url = encode("image/png", &bytes);
        assert!(url.starts_with("data:image/png;base64,"));

        let decoded = decode(&url).unwrap();
        assert_eq!(decoded.mime, "image/png");
        assert_eq!(decoded.bytes, bytes);
    }

    #[test]
    fn garbled_header_falls_back_to_jpeg() {
        let payload = BASE64.encode(b"pixels");
        let decoded = decode(&format!("data:;base64,{}", payload)).unwrap();
        assert_eq!(decoded.mime, FALLBACK_MIME);

        let decoded = decode(&format!("nonsense,{}", payload)).unwrap();
        assert_eq!(decoded.mime, FALLBACK_MIME);
        assert_eq!(decoded.bytes, b"pixels");
    }

    #[test]
    fn missing_separator_is_an_error() {
        let err = decode("data:image/jpeg;base64").unwrap_err();
        assert!(matches!(err, DataUrlError::MissingPayload));
    }

    #[test]
    fn bad_payload_is_an_error() {
        let err = decode("data:image/jpeg;base64,not-base64!!!").unwrap_err();
        assert!(matches!(err, DataUrlError::InvalidBase64(_)));
    }
}
