use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("malformed base64url input: {0}")]
    Malformed(#[from] base64::DecodeError),
}

/// Encode raw bytes as URL-safe, padding-free base64.
///
/// Used wherever a binary credential identifier or challenge has to cross
/// a text-only persistence boundary. The empty input encodes to the empty
/// string.
pub fn encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Inverse of [`encode`]. Rejects any character outside the URL-safe
/// alphabet, including standard-base64 `+`, `/` and padding.
pub fn decode(text: &str) -> Result<Vec<u8>, CodecError> {
    Ok(URL_SAFE_NO_PAD.decode(text)?)
}
