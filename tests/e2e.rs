//! End-to-end integration tests for img2tlf.
//!
//! Every test draws a synthetic form with the `image` crate, writes it to a
//! temporary directory and runs the public API against it. No fixtures, no
//! network.
//!
//! Run with:
//!   cargo test --test e2e -- --nocapture

use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use img2tlf::{
    convert, convert_from_bytes, convert_to_file, default_output_path, inspect, Axis,
    ExtractionConfig, ExtractionProgressCallback, Img2TlfError,
};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ── Test helpers ─────────────────────────────────────────────────────────────

const INK: Rgb<u8> = Rgb([0, 0, 0]);
const PAPER: Rgb<u8> = Rgb([255, 255, 255]);

fn page(w: u32, h: u32) -> RgbImage {
    RgbImage::from_pixel(w, h, PAPER)
}

fn hline(img: &mut RgbImage, y: u32, x0: u32, x1: u32, colour: Rgb<u8>) {
    for x in x0..=x1 {
        img.put_pixel(x, y, colour);
    }
}

fn vline(img: &mut RgbImage, x: u32, y0: u32, y1: u32, colour: Rgb<u8>) {
    for y in y0..=y1 {
        img.put_pixel(x, y, colour);
    }
}

/// A 400x600 page with a one-pixel box from (50,100) to (349,400).
fn boxed_form() -> RgbImage {
    let mut img = page(400, 600);
    hline(&mut img, 100, 50, 349, INK);
    hline(&mut img, 400, 50, 349, INK);
    vline(&mut img, 50, 100, 400, INK);
    vline(&mut img, 349, 100, 400, INK);
    img
}

fn save(img: &RgbImage, dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    img.save(&path).expect("failed to write test image");
    path
}

fn coords(line: &serde_json::Value) -> (i64, i64, i64, i64) {
    (
        line["x1"].as_i64().unwrap(),
        line["y1"].as_i64().unwrap(),
        line["x2"].as_i64().unwrap(),
        line["y2"].as_i64().unwrap(),
    )
}

// ── File round trip ──────────────────────────────────────────────────────────

#[test]
fn test_box_converts_to_closed_rectangle() {
    let dir = tempfile::tempdir().unwrap();
    let input = save(&boxed_form(), dir.path(), "form.png");
    let output = default_output_path(&input);

    let stats = convert_to_file(&input, &output, &ExtractionConfig::default())
        .expect("conversion should succeed");

    assert_eq!(output, dir.path().join("form.png.tlf"));
    assert_eq!(stats.horizontal_segments, 2);
    assert_eq!(stats.vertical_segments, 2);
    // Both horizontal right ends pulled one unit left onto the right rule.
    assert_eq!(stats.snapped_endpoints, 2);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let items = json["items"].as_array().unwrap();
    let lines: Vec<_> = items.iter().map(coords).collect();
    assert_eq!(
        lines,
        vec![
            (74, 140, 520, 140),
            (74, 563, 520, 563),
            (74, 140, 74, 563),
            (520, 140, 520, 563),
        ]
    );
}

#[test]
fn test_document_shape() {
    let dir = tempfile::tempdir().unwrap();
    let input = save(&boxed_form(), dir.path(), "form.png");
    let output = dir.path().join("out").join("form.tlf");

    let config = ExtractionConfig::builder().title("Invoice").build().unwrap();
    convert_to_file(&input, &output, &config).unwrap();

    let raw = std::fs::read_to_string(&output).unwrap();
    assert!(!raw.contains('\n'), "compact JSON expected");

    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["version"], "0.10.0");
    assert_eq!(json["title"], "Invoice");
    assert_eq!(json["state"]["layout-guides"], serde_json::json!([]));
    assert_eq!(json["report"]["paper-type"], "A4");
    assert_eq!(json["report"]["orientation"], "portrait");
    assert_eq!(json["report"]["margin"], serde_json::json!([20, 20, 20, 20]));

    let first = &json["items"][0];
    assert_eq!(first["type"], "line");
    assert_eq!(first["display"], true);
    assert_eq!(first["style"]["border-color"], "#000000");
    assert_eq!(first["style"]["border-width"], 1);
    assert_eq!(first["style"]["border-style"], "solid");
}

#[test]
fn test_pretty_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = save(&boxed_form(), dir.path(), "form.png");
    let output = dir.path().join("form.tlf");

    let config = ExtractionConfig::builder().pretty(true).build().unwrap();
    convert_to_file(&input, &output, &config).unwrap();

    let raw = std::fs::read_to_string(&output).unwrap();
    assert!(raw.contains("\n  \"items\""));
}

// ── Errors ───────────────────────────────────────────────────────────────────

#[test]
fn test_missing_input_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nope.png");
    let output = default_output_path(&input);

    let err = convert_to_file(&input, &output, &ExtractionConfig::default()).unwrap_err();
    assert!(matches!(err, Img2TlfError::FileNotFound { .. }), "{err}");
    assert!(err.is_input_error());
    assert!(!output.exists());
}

#[test]
fn test_not_an_image() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.png");
    std::fs::write(&input, "just some text").unwrap();

    let err = convert(&input, &ExtractionConfig::default()).unwrap_err();
    assert!(matches!(err, Img2TlfError::UnsupportedFormat { .. }), "{err}");
}

// ── Behaviour ────────────────────────────────────────────────────────────────

#[test]
fn test_conversion_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let input = save(&boxed_form(), dir.path(), "form.png");
    let config = ExtractionConfig::default();

    let a = convert(&input, &config).unwrap().document;
    let b = convert(&input, &config).unwrap().document;
    assert_eq!(a.to_json(false).unwrap(), b.to_json(false).unwrap());
}

#[test]
fn test_bytes_and_file_agree() {
    let dir = tempfile::tempdir().unwrap();
    let img = boxed_form();
    let input = save(&img, dir.path(), "form.png");

    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();

    let config = ExtractionConfig::default();
    let from_file = convert(&input, &config).unwrap().document;
    let from_bytes = convert_from_bytes(&bytes, &config).unwrap().document;
    assert_eq!(from_file, from_bytes);
}

#[test]
fn test_red_ink_needs_luma_channel() {
    let dir = tempfile::tempdir().unwrap();
    let mut img = page(400, 600);
    hline(&mut img, 200, 50, 349, Rgb([255, 0, 0]));
    let input = save(&img, dir.path(), "red.png");

    let red = ExtractionConfig::default();
    assert_eq!(convert(&input, &red).unwrap().stats.total_lines(), 0);

    let luma = ExtractionConfig::builder()
        .channel(img2tlf::Channel::Luma)
        .build()
        .unwrap();
    let out = convert(&input, &luma).unwrap();
    assert_eq!(out.stats.horizontal_segments, 1);
}

#[test]
fn test_border_rule_needs_flush() {
    let dir = tempfile::tempdir().unwrap();
    let mut img = page(400, 600);
    hline(&mut img, 300, 200, 399, INK);
    let input = save(&img, dir.path(), "edge.png");

    let dropped = convert(&input, &ExtractionConfig::default()).unwrap();
    assert_eq!(dropped.stats.horizontal_segments, 0);

    let config = ExtractionConfig::builder()
        .flush_at_line_end(true)
        .build()
        .unwrap();
    let kept = convert(&input, &config).unwrap();
    assert_eq!(kept.stats.horizontal_segments, 1);
    let line = &kept.document.items[0];
    assert_eq!((line.x1, line.x2), (298, 596));
}

#[test]
fn test_wide_image_is_landscape() {
    let dir = tempfile::tempdir().unwrap();
    let mut img = page(600, 400);
    hline(&mut img, 200, 100, 499, INK);
    let input = save(&img, dir.path(), "wide.png");

    let out = convert(&input, &ExtractionConfig::default()).unwrap();
    assert_eq!(out.document.report.orientation, "landscape");
    assert_eq!((out.stats.scale.x, out.stats.scale.y), (71, 67));
    assert_eq!(out.stats.horizontal_segments, 1);
}

#[test]
fn test_grayscale_input() {
    let mut img = GrayImage::from_pixel(400, 600, Luma([255]));
    for x in 50..=349 {
        img.put_pixel(x, 100, Luma([0]));
    }
    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();

    let out = convert_from_bytes(&bytes, &ExtractionConfig::default()).unwrap();
    let line = &out.document.items[0];
    assert_eq!((line.x1, line.y1, line.x2, line.y2), (74, 140, 521, 140));
}

// ── Inspect ──────────────────────────────────────────────────────────────────

#[test]
fn test_inspect() {
    let dir = tempfile::tempdir().unwrap();
    let input = save(&boxed_form(), dir.path(), "form.png");

    let meta = inspect(&input, &ExtractionConfig::default()).unwrap();
    assert_eq!((meta.width, meta.height), (400, 600));
    assert_eq!((meta.canvas.width, meta.canvas.height), (595, 840));
    assert_eq!((meta.scale.x, meta.scale.y), (67, 71));
    assert_eq!(meta.thresholds.min_line_length, 20);
    assert_eq!(meta.thresholds.gap_tolerance, 1);
}

// ── Progress ─────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Counter {
    passes: AtomicUsize,
    horizontal_lanes: AtomicUsize,
    vertical_lanes: AtomicUsize,
    lines: AtomicUsize,
}

impl ExtractionProgressCallback for Counter {
    fn on_pass_start(&self, _axis: Axis, _lanes: usize) {
        self.passes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_lane_complete(&self, axis: Axis, _lane: usize, _lanes: usize) {
        match axis {
            Axis::Horizontal => self.horizontal_lanes.fetch_add(1, Ordering::SeqCst),
            Axis::Vertical => self.vertical_lanes.fetch_add(1, Ordering::SeqCst),
        };
    }

    fn on_extraction_complete(&self, lines: usize) {
        self.lines.store(lines, Ordering::SeqCst);
    }
}

#[test]
fn test_progress_events() {
    let dir = tempfile::tempdir().unwrap();
    let input = save(&boxed_form(), dir.path(), "form.png");

    let counter = Arc::new(Counter::default());
    let config = ExtractionConfig::builder()
        .progress_callback(counter.clone())
        .build()
        .unwrap();
    convert(&input, &config).unwrap();

    assert_eq!(counter.passes.load(Ordering::SeqCst), 2);
    assert_eq!(counter.horizontal_lanes.load(Ordering::SeqCst), 600);
    assert_eq!(counter.vertical_lanes.load(Ordering::SeqCst), 400);
    assert_eq!(counter.lines.load(Ordering::SeqCst), 4);
}
