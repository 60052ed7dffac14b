// Every variant states *where* things went wrong; messages carry the
// call-site detail so a log line is enough to locate the failure.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OverlayError {
    /// Source dimensions must be positive before any scaling math runs.
    #[error("invalid source dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Reading or decoding the disaster photo failed. Aborts the render;
    /// the previously displayed surface (if any) stays up.
    #[error("source image decode: {0}")]
    SourceDecode(String),

    /// The segmentation mask payload could not be decoded. Recoverable:
    /// the renderer falls back to the procedural path.
    #[error("segmentation mask decode: {0}")]
    MaskDecode(String),

    /// Reading an assessment record from disk failed (demo viewer).
    #[error("assessment read: {0}")]
    AssessmentRead(String),

    /// Creating the demo window failed.
    #[error("window init: {0}")]
    WindowInit(String),

    /// Pushing a frame to the demo window failed.
    #[error("window update: {0}")]
    WindowUpdate(String),
}
