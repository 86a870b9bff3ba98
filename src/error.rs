//! Error types for the img2tlf library.
//!
//! Every failure this crate can report is fatal for the current conversion:
//! the input could not be opened, the pixels could not be decoded, the
//! configuration was rejected, or the output could not be written. The line
//! extraction and reconciliation stages themselves are total over any decoded
//! image and never produce an error.
//!
//! [`Img2TlfError`] is returned from every `convert*` entry point. No output
//! file exists when one of these errors is returned.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the img2tlf library.
#[derive(Debug, Error)]
pub enum Img2TlfError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Image file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input could not be opened for a reason other than the two above.
    #[error("Failed to open image '{path}': {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Decode errors ─────────────────────────────────────────────────────
    /// The bytes are not in a format the decoder recognises.
    #[error("Unsupported image format for '{path}'\nSupported formats: PNG, JPEG.")]
    UnsupportedFormat { path: PathBuf },

    /// The file was recognised but its pixel data is malformed.
    #[error("Failed to decode image '{path}': {detail}")]
    DecodeFailed { path: PathBuf, detail: String },

    /// The decoded image has no pixels.
    #[error("Image '{path}' is empty ({width}x{height})")]
    EmptyImage {
        path: PathBuf,
        width: u32,
        height: u32,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output TLF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TLF document could not be serialised.
    #[error("Failed to serialise TLF document: {0}")]
    SerializeFailed(#[from] serde_json::Error),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Img2TlfError {
    /// `true` for failures to open or decode the input image.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Img2TlfError::FileNotFound { .. }
                | Img2TlfError::PermissionDenied { .. }
                | Img2TlfError::OpenFailed { .. }
                | Img2TlfError::UnsupportedFormat { .. }
                | Img2TlfError::DecodeFailed { .. }
                | Img2TlfError::EmptyImage { .. }
        )
    }
}
