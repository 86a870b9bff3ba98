//! # img2tlf
//!
//! Extract the straight horizontal and vertical rules from a scanned form
//! and emit them as a TLF layout document (the JSON template format used by
//! the Thinreports editor).
//!
//! ## Why this crate?
//!
//! Redrawing a paper form in a layout editor is tedious: every box and
//! divider has to be placed by hand. This crate scans the raster for long
//! dark runs, keeps only those that look like printed rules, maps them onto
//! an A4 canvas and snaps near-miss corners shut, so the editor opens with
//! the form's skeleton already drawn.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PNG / JPEG
//!  │
//!  ├─ 1. Input   open the file, guess the format from its bytes, decode
//!  ├─ 2. Sample  one 8-bit intensity per pixel (red channel or luma)
//!  ├─ 3. Scan    row pass then column pass, run state machine per lane
//!  ├─ 4. Scale   pick portrait/landscape A4, map pixels to canvas units
//!  ├─ 5. Snap    reconcile endpoints of perpendicular lines
//!  └─ 6. Export  TLF document + extraction stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use img2tlf::{convert, ExtractionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::default();
//!     let output = convert("form.png", &config)?;
//!     println!("{}", output.document.to_json(true)?);
//!     eprintln!(
//!         "{} horizontal / {} vertical lines",
//!         output.stats.horizontal_segments, output.stats.vertical_segments
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `img2tlf` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! img2tlf = { version = "0.5", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{Channel, ExtractionConfig, ExtractionConfigBuilder};
pub use convert::{convert, convert_from_bytes, convert_image, convert_to_file, inspect};
pub use error::Img2TlfError;
pub use output::{ExtractionOutput, ExtractionStats, ImageMetadata};
pub use pipeline::export::TlfDocument;
pub use pipeline::input::default_output_path;
pub use pipeline::run::Axis;
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
