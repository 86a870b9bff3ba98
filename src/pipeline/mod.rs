//! Pipeline stages for image-to-TLF conversion.
//!
//! Each submodule implements one transformation step and can be tested on
//! its own with a synthetic image.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ sample ──▶ run/scan ──▶ scale ──▶ snap ──▶ export
//! (decode)  (intensity)  (segments)   (canvas)  (corners)  (JSON)
//! ```
//!
//! 1. [`input`]: open and decode the image file, format guessed from content
//! 2. [`sample`]: reduce every pixel to one 8-bit intensity and classify it
//!    as dark or light
//! 3. [`run`]: the per-lane state machine that grows a candidate line and
//!    decides whether it is a rule
//! 4. [`scan`]: drive the accumulator over every row, then every column
//! 5. [`scale`]: choose the A4 canvas and map pixel segments onto it
//! 6. [`snap`]: pull near-touching perpendicular endpoints together
//! 7. [`export`]: wrap the lines in a TLF document

pub mod export;
pub mod input;
pub mod run;
pub mod sample;
pub mod scale;
pub mod scan;
pub mod snap;
