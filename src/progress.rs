//! Progress-callback trait for scan and reconciliation events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events as the scanner walks each row and column of the image.
//!
//! # Example
//!
//! ```rust
//! use img2tlf::{Axis, ExtractionConfig, ExtractionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct LaneCounter {
//!     lanes: AtomicUsize,
//! }
//!
//! impl ExtractionProgressCallback for LaneCounter {
//!     fn on_lane_complete(&self, _axis: Axis, _lane: usize, _lanes: usize) {
//!         self.lanes.fetch_add(1, Ordering::Relaxed);
//!     }
//! }
//!
//! let counter = Arc::new(LaneCounter { lanes: AtomicUsize::new(0) });
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ExtractionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::pipeline::run::Axis;
use std::sync::Arc;

/// Called by the extraction pipeline as it scans an image.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events arrive in order from the calling thread.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once after the image is decoded, before any scanning.
    fn on_extraction_start(&self, width: u32, height: u32) {
        let _ = (width, height);
    }

    /// Called before a pass begins.
    ///
    /// # Arguments
    /// * `axis` : orientation of the runs collected by this pass
    /// * `lanes`: number of rows (horizontal) or columns (vertical) to scan
    fn on_pass_start(&self, axis: Axis, lanes: usize) {
        let _ = (axis, lanes);
    }

    /// Called after each row or column has been fully scanned.
    ///
    /// # Arguments
    /// * `lane` : 0-based row or column index
    /// * `lanes`: total lanes in this pass
    fn on_lane_complete(&self, axis: Axis, lane: usize, lanes: usize) {
        let _ = (axis, lane, lanes);
    }

    /// Called when a pass finishes, with the number of accepted segments.
    fn on_pass_complete(&self, axis: Axis, segments: usize) {
        let _ = (axis, segments);
    }

    /// Called once after reconciliation, with the number of output lines.
    fn on_extraction_complete(&self, lines: usize) {
        let _ = lines;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;
