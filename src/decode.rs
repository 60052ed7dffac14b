// Turns the inputs we receive into RGBA rasters: the disaster photo from a
// file or byte buffer, and the collaborator's segmentation mask from its
// base64 (or data-URL) payload.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::OverlayError;
use crate::types::SourceImage;

/// Decode a user-selected photo from raw encoded bytes (JPG, PNG, ...).
pub fn source_from_bytes(bytes: &[u8]) -> Result<SourceImage, OverlayError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| OverlayError::SourceDecode(format!("load: {e}")))?;
    SourceImage::new(decoded.to_rgba8())
}

/// Read and decode a photo from disk (demo viewer path).
pub fn source_from_path(path: &Path) -> Result<SourceImage, OverlayError> {
    let bytes = std::fs::read(path)
        .map_err(|e| OverlayError::SourceDecode(format!("read {}: {e}", path.display())))?;
    source_from_bytes(&bytes)
}

/// Decode a segmentation mask payload into an RGBA raster.
///
/// Accepts a plain base64 string or a `data:image/...;base64,` URL; the
/// transport for http(s) URLs belongs to the host's network layer, so one
/// arriving here is reported as a decode failure (which takes the
/// procedural fallback path upstream).
pub fn mask_from_payload(payload: &str) -> Result<image::RgbaImage, OverlayError> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Err(OverlayError::MaskDecode("empty payload".into()));
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Err(OverlayError::MaskDecode(
            "URL-form mask not fetched by the overlay engine".into(),
        ));
    }

    // Data URLs carry the base64 body after the first comma.
    let body = if trimmed.starts_with("data:") {
        trimmed
            .split_once(',')
            .map(|(_, b)| b)
            .ok_or_else(|| OverlayError::MaskDecode("malformed data URL".into()))?
    } else {
        trimmed
    };

    let bytes = BASE64
        .decode(body)
        .map_err(|e| OverlayError::MaskDecode(format!("base64: {e}")))?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| OverlayError::MaskDecode(format!("raster: {e}")))?;
    Ok(decoded.to_rgba8())
}
