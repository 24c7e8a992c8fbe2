use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Malformed data URL header: {0}")]
    MalformedHeader(String),

    #[error("Invalid base64 body: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// A payload decoded back into raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPayload {
    /// MIME type carried by the data URL header, if there was one.
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Encodes `bytes` as `data:<mime>;base64,<body>`, the text form fragments
/// are cut from.
pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Decodes a data URL, or a bare base64 body without header.
pub fn decode_data_url(text: &str) -> Result<DecodedPayload, PayloadError> {
    let Some(rest) = text.strip_prefix("data:") else {
        return Ok(DecodedPayload {
            mime_type: None,
            bytes: STANDARD.decode(text.trim())?,
        });
    };

    let (header, body) = rest
        .split_once(',')
        .ok_or_else(|| PayloadError::MalformedHeader("missing ',' separator".to_string()))?;

    let mut params = header.split(';');
    let mime_type = params.next().unwrap_or_default().trim();
    if !params.any(|p| p.trim() == "base64") {
        return Err(PayloadError::MalformedHeader(format!(
            "unsupported encoding in '{}'",
            header
        )));
    }

    Ok(DecodedPayload {
        mime_type: (!mime_type.is_empty()).then(|| mime_type.to_string()),
        bytes: STANDARD.decode(body.trim())?,
    })
}
