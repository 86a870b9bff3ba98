//! Conversion entry points.
//!
//! [`convert`] is the primary API: decode one image, scan it, map and
//! reconcile the segments, and return the TLF document with its stats.
//! [`convert_to_file`] adds an atomic write; [`convert_image`] and
//! [`convert_from_bytes`] skip the file system; [`inspect`] reports the
//! canvas and thresholds an image would get without scanning it.

use crate::config::ExtractionConfig;
use crate::error::Img2TlfError;
use crate::output::{ExtractionOutput, ExtractionStats, ImageMetadata};
use crate::pipeline::export::TlfDocument;
use crate::pipeline::input;
use crate::pipeline::sample::intensity_plane;
use crate::pipeline::scale::{Canvas, CoordinateMapper, ScaleFactors};
use crate::pipeline::scan::{RasterScanner, ScanThresholds};
use crate::pipeline::snap::EndpointReconciler;
use image::DynamicImage;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Convert an image file to a TLF document.
///
/// # Errors
/// Returns `Err(Img2TlfError)` only when the image cannot be opened or
/// decoded. Extraction itself never fails; an image without rules yields a
/// document with no items.
pub fn convert(
    input_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Img2TlfError> {
    let path = input_path.as_ref();
    info!("Starting conversion: {}", path.display());
    let img = input::load_image(path)?;
    Ok(convert_image(&img, config))
}

/// Convert an already-decoded image.
pub fn convert_image(img: &DynamicImage, config: &ExtractionConfig) -> ExtractionOutput {
    let total_start = Instant::now();
    let (width, height) = (img.width(), img.height());

    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(width, height);
    }

    // ── Step 1: Canvas and scale ─────────────────────────────────────────
    let meta = describe(width, height, config);
    info!(
        "Image {}x{} → {} canvas {}x{}, scale x:{} y:{}",
        width,
        height,
        meta.orientation.as_str(),
        meta.canvas.width,
        meta.canvas.height,
        meta.scale.x,
        meta.scale.y
    );
    debug!(
        "min_line_length={} gap_tolerance={} threshold={}",
        meta.thresholds.min_line_length,
        meta.thresholds.gap_tolerance,
        meta.thresholds.dark_threshold
    );

    // ── Step 2: Scan both axes ───────────────────────────────────────────
    let scan_start = Instant::now();
    let plane = intensity_plane(img, config.channel);
    let scan = RasterScanner::new(meta.thresholds)
        .flush_at_line_end(config.flush_at_line_end)
        .progress(config.progress_callback.clone())
        .scan(&plane);
    let scan_duration_ms = scan_start.elapsed().as_millis() as u64;
    info!(
        "Scanned in {}ms: {} horizontal, {} vertical segments",
        scan_duration_ms,
        scan.horizontal.len(),
        scan.vertical.len()
    );

    // ── Step 3: Map to canvas units ──────────────────────────────────────
    let mapper = CoordinateMapper::new(meta.scale);
    let horizontal = mapper.map_all(&scan.horizontal);
    let vertical = mapper.map_all(&scan.vertical);

    // ── Step 4: Reconcile endpoints ──────────────────────────────────────
    let lines = EndpointReconciler::new(config.snap_tolerance).reconcile(&horizontal, &vertical);

    // ── Step 5: Build the document ───────────────────────────────────────
    let document = TlfDocument::from_lines(&lines, &meta.canvas, config);

    let stats = ExtractionStats {
        image_width: width,
        image_height: height,
        orientation: meta.orientation,
        scale: meta.scale,
        thresholds: meta.thresholds,
        horizontal_segments: lines.horizontal.len(),
        vertical_segments: lines.vertical.len(),
        snapped_endpoints: lines.snapped,
        scan_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {} lines, {} endpoints snapped, {}ms total",
        stats.total_lines(),
        stats.snapped_endpoints,
        stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_complete(stats.total_lines());
    }

    ExtractionOutput { document, stats }
}

/// Convert image bytes held in memory.
pub fn convert_from_bytes(
    bytes: &[u8],
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Img2TlfError> {
    let img = input::decode_bytes(bytes, Path::new("<memory>"))?;
    Ok(convert_image(&img, config))
}

/// Convert an image and write the TLF document to `output_path`.
///
/// Uses atomic write (temp file in the target directory + rename) so a
/// failed run never leaves a partial file behind.
pub fn convert_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionStats, Img2TlfError> {
    let output = convert(input_path, config)?;
    let json = output.document.to_json(config.pretty)?;
    write_atomic(output_path.as_ref(), json.as_bytes())?;
    Ok(output.stats)
}

/// Report the canvas, scale factors and thresholds for an image without
/// scanning it.
pub fn inspect(
    input_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ImageMetadata, Img2TlfError> {
    let img = input::load_image(input_path.as_ref())?;
    Ok(describe(img.width(), img.height(), config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn describe(width: u32, height: u32, config: &ExtractionConfig) -> ImageMetadata {
    let canvas = Canvas::for_image(width, height, config.margin);
    let scale = ScaleFactors::new(width, height, &canvas);
    ImageMetadata {
        width,
        height,
        orientation: canvas.orientation,
        canvas,
        scale,
        thresholds: ScanThresholds::derive(config, scale.x),
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), Img2TlfError> {
    let write_err = |source: std::io::Error| Img2TlfError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(contents).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}
