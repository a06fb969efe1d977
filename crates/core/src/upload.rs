//! Upload payload decoding.
//!
//! Clients submit files as base64 text inside a JSON body, sometimes with a
//! data-URL header (`data:video/mp4;base64,`) and sometimes with the trailing
//! `=` padding lost in transit. Everything here turns such a request into raw
//! bytes plus a collision-free storage filename.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::Deserialize;
use uuid::Uuid;

/// `fileName` used when the client omits it.
pub const DEFAULT_FILE_NAME: &str = "upload";
/// `fileType` used when the client omits it.
pub const DEFAULT_FILE_TYPE: &str = "video/mp4";
/// Extension used when `fileName` has no `.`.
pub const DEFAULT_EXTENSION: &str = "mp4";

/// Standard alphabet, tolerant of non-zero trailing bits and of padding
/// that is present but not canonical.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// JSON body accepted by the upload handler.
#[derive(Debug, Default, Deserialize)]
pub struct UploadRequest {
    pub file: Option<String>,
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
    #[serde(rename = "fileType")]
    pub file_type: Option<String>,
}

impl UploadRequest {
    /// The submitted payload, treating an empty string as absent.
    pub fn payload(&self) -> Option<&str> {
        self.file.as_deref().filter(|f| !f.is_empty())
    }

    pub fn file_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or(DEFAULT_FILE_NAME)
    }

    pub fn file_type(&self) -> &str {
        self.file_type.as_deref().unwrap_or(DEFAULT_FILE_TYPE)
    }
}

/// A decoded file ready to be handed to a storage backend.
#[derive(Debug, Clone)]
pub struct PreparedUpload {
    /// Generated `<uuid>.<extension>` name.
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Decode `payload` and attach a fresh filename derived from `file_name`.
pub fn prepare(
    payload: &str,
    file_name: &str,
    content_type: &str,
) -> Result<PreparedUpload, PayloadError> {
    let bytes = decode_payload(payload)?;
    Ok(PreparedUpload {
        filename: unique_filename(file_extension(file_name)),
        content_type: content_type.to_string(),
        bytes,
    })
}

/// Keep only the encoded segment of a data URL.
///
/// `data:<mime>;base64,<data>` yields `<data>`. Input without a comma is
/// returned unchanged. Only the segment between the first and second comma
/// survives.
pub fn strip_data_url_prefix(raw: &str) -> &str {
    let mut parts = raw.split(',');
    match (parts.next(), parts.next()) {
        (Some(_), Some(data)) => data,
        _ => raw,
    }
}

/// Restore characters mangled by form encoding and pad to a multiple of 4.
///
/// Spaces become `+` (a `+` that went through URL decoding); line breaks and
/// any existing trailing `=` are dropped before the padding is recomputed.
pub fn repair_padding(encoded: &str) -> String {
    let mut repaired: String = encoded
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n' | '\t'))
        .map(|c| if c == ' ' { '+' } else { c })
        .collect();
    repaired.truncate(repaired.trim_end_matches('=').len());

    let remainder = repaired.len() % 4;
    if remainder != 0 {
        repaired.extend(std::iter::repeat('=').take(4 - remainder));
    }
    repaired
}

/// Full decode: strip the data-URL header, repair, then base64-decode.
pub fn decode_payload(raw: &str) -> Result<Vec<u8>, PayloadError> {
    let repaired = repair_padding(strip_data_url_prefix(raw));
    Ok(LENIENT_STANDARD.decode(repaired)?)
}

/// Extension after the last `.` in `file_name`, or `mp4` when there is none.
pub fn file_extension(file_name: &str) -> &str {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or(DEFAULT_EXTENSION)
}

/// `<random-uuid>.<extension>`.
pub fn unique_filename(extension: &str) -> String {
    format!("{}.{}", Uuid::new_v4(), extension)
}

/// Public URL for `filename` under a CDN prefix, used when the storage
/// service does not report one.
pub fn fallback_url(cdn_prefix: &str, filename: &str) -> String {
    format!("{}/{}", cdn_prefix.trim_end_matches('/'), filename)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
