//! Raster scanning: two full passes turning pixels into accepted segments.
//!
//! The horizontal pass walks rows top to bottom, left to right; the vertical
//! pass walks columns left to right, top to bottom. Each scan line ("lane")
//! gets a fresh [`RunAccumulator`], so no run ever crosses a lane boundary.
//!
//! Only runs terminated by gap overflow are evaluated. A run still active
//! when its lane ends is dropped unless
//! [`crate::config::ExtractionConfig::flush_at_line_end`] is set, so by
//! default a rule touching the image border without trailing background is
//! not captured.

use super::run::{Axis, Run, RunAccumulator, Step};
use super::sample::{IntensitySource, PixelSampler, Sample};
use crate::config::ExtractionConfig;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Per-image constants used to accept or split runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanThresholds {
    /// Samples strictly below this intensity are dark.
    pub dark_threshold: u8,
    /// A run must be longer than this (in pixels) to be accepted.
    pub min_line_length: usize,
    /// Longest run of light samples a run survives.
    pub gap_tolerance: usize,
}

impl ScanThresholds {
    /// Derive the thresholds for an image whose horizontal scale factor is
    /// `scale_x` (fixed point, two implied decimals).
    pub fn derive(config: &ExtractionConfig, scale_x: u32) -> Self {
        let min_line_length = (config.min_rate as u64 * scale_x as u64 / 100) as usize;
        Self {
            dark_threshold: config.dark_threshold,
            min_line_length,
            gap_tolerance: min_line_length / config.gap_divisor.max(1) as usize,
        }
    }
}

/// An accepted run, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub x: u32,
    pub y: u32,
    pub axis: Axis,
    /// Effective length in pixels along `axis`.
    pub length: usize,
}

impl From<&Run> for Segment {
    fn from(run: &Run) -> Self {
        Self {
            x: run.x,
            y: run.y,
            axis: run.axis,
            length: run.effective_length(),
        }
    }
}

/// Segments collected by both passes, each in scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub horizontal: Vec<Segment>,
    pub vertical: Vec<Segment>,
}

impl ScanResult {
    pub fn len(&self) -> usize {
        self.horizontal.len() + self.vertical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Drives the two scan passes over an [`IntensitySource`].
pub struct RasterScanner {
    thresholds: ScanThresholds,
    flush_at_line_end: bool,
    progress: Option<ProgressCallback>,
}

impl RasterScanner {
    pub fn new(thresholds: ScanThresholds) -> Self {
        Self {
            thresholds,
            flush_at_line_end: false,
            progress: None,
        }
    }

    /// Evaluate runs still active at the end of a lane instead of dropping them.
    pub fn flush_at_line_end(mut self, v: bool) -> Self {
        self.flush_at_line_end = v;
        self
    }

    pub fn progress(mut self, cb: Option<ProgressCallback>) -> Self {
        self.progress = cb;
        self
    }

    /// Run the horizontal pass, then the vertical pass.
    pub fn scan<S: IntensitySource + ?Sized>(&self, source: &S) -> ScanResult {
        let sampler = PixelSampler::new(source, self.thresholds.dark_threshold);
        ScanResult {
            horizontal: self.scan_axis(&sampler, Axis::Horizontal),
            vertical: self.scan_axis(&sampler, Axis::Vertical),
        }
    }

    /// Run one pass and return its accepted segments in scan order.
    pub fn scan_axis<S: IntensitySource + ?Sized>(
        &self,
        sampler: &PixelSampler<'_, S>,
        axis: Axis,
    ) -> Vec<Segment> {
        let (lanes, lane_len) = match axis {
            Axis::Horizontal => (sampler.height(), sampler.width()),
            Axis::Vertical => (sampler.width(), sampler.height()),
        };
        let border = Sample::light_border(sampler.threshold());

        if let Some(ref cb) = self.progress {
            cb.on_pass_start(axis, lanes as usize);
        }

        let mut segments = Vec::new();
        let mut dropped = 0usize;

        for lane in 0..lanes {
            let mut acc = RunAccumulator::new(
                axis,
                self.thresholds.dark_threshold,
                self.thresholds.gap_tolerance,
            );

            for pos in 0..lane_len {
                let (x, y) = match axis {
                    Axis::Horizontal => (pos, lane),
                    Axis::Vertical => (lane, pos),
                };
                let neighbor = || match axis {
                    Axis::Horizontal if y > 0 => sampler.sample(x, y - 1),
                    Axis::Vertical if x > 0 => sampler.sample(x - 1, y),
                    _ => border,
                };

                if let Step::Terminated(run) = acc.feed(x, y, sampler.sample(x, y), neighbor) {
                    self.promote(&run, &mut segments);
                }
            }

            if let Some(run) = acc.finish() {
                if self.flush_at_line_end {
                    self.promote(&run, &mut segments);
                } else {
                    trace!(
                        "Dropping {:?} run at ({}, {}) still active at lane end",
                        axis,
                        run.x,
                        run.y
                    );
                    dropped += 1;
                }
            }

            if let Some(ref cb) = self.progress {
                cb.on_lane_complete(axis, lane as usize, lanes as usize);
            }
        }

        debug!(
            "{:?} pass: {} segments accepted, {} runs dropped at lane end",
            axis,
            segments.len(),
            dropped
        );

        if let Some(ref cb) = self.progress {
            cb.on_pass_complete(axis, segments.len());
        }

        segments
    }

    fn promote(&self, run: &Run, segments: &mut Vec<Segment>) {
        if run.is_writable(self.thresholds.min_line_length) {
            segments.push(Segment::from(run));
        }
    }
}
