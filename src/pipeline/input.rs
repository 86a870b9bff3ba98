//! Input resolution: open and decode the user-supplied image.
//!
//! The file is opened once to distinguish "missing" from "unreadable"
//! before the decoder sees it, so callers get a meaningful error rather than
//! a generic decode failure. The format is guessed from the leading bytes,
//! not the extension: scans are often saved with the wrong suffix.

use crate::error::Img2TlfError;
use image::{DynamicImage, ImageError, ImageReader};
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Seek};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Open `path` for reading, classifying the failure when it can't be.
pub fn open_local(path: &Path) -> Result<File, Img2TlfError> {
    if !path.exists() {
        return Err(Img2TlfError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => Img2TlfError::PermissionDenied {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::NotFound => Img2TlfError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => Img2TlfError::OpenFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

/// Open and decode an image file.
pub fn load_image(path: &Path) -> Result<DynamicImage, Img2TlfError> {
    let file = open_local(path)?;
    let img = decode(BufReader::new(file), path)?;
    debug!(
        "Decoded {}: {}x{}",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(img)
}

/// Decode an in-memory image. `label` only names the source in errors.
pub fn decode_bytes(bytes: &[u8], label: &Path) -> Result<DynamicImage, Img2TlfError> {
    decode(Cursor::new(bytes), label)
}

fn decode<R: BufRead + Seek>(reader: R, path: &Path) -> Result<DynamicImage, Img2TlfError> {
    let reader = ImageReader::new(reader)
        .with_guessed_format()
        .map_err(|e| Img2TlfError::OpenFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    if reader.format().is_none() {
        return Err(Img2TlfError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }

    let img = reader.decode().map_err(|e| decode_error(e, path))?;

    if img.width() == 0 || img.height() == 0 {
        return Err(Img2TlfError::EmptyImage {
            path: path.to_path_buf(),
            width: img.width(),
            height: img.height(),
        });
    }

    Ok(img)
}

fn decode_error(e: ImageError, path: &Path) -> Img2TlfError {
    match e {
        ImageError::Unsupported(_) => Img2TlfError::UnsupportedFormat {
            path: path.to_path_buf(),
        },
        ImageError::IoError(source) => Img2TlfError::OpenFailed {
            path: path.to_path_buf(),
            source,
        },
        other => Img2TlfError::DecodeFailed {
            path: path.to_path_buf(),
            detail: other.to_string(),
        },
    }
}

/// Where the CLI writes its result by default: `<input>.tlf` next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(".tlf");
    PathBuf::from(name)
}
