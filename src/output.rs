//! Conversion results: the TLF document plus run statistics.

use crate::pipeline::export::TlfDocument;
use crate::pipeline::scale::{Canvas, Orientation, ScaleFactors};
use crate::pipeline::scan::ScanThresholds;
use serde::{Deserialize, Serialize};

/// Everything a conversion produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    pub document: TlfDocument,
    pub stats: ExtractionStats,
}

/// Facts about an image that can be computed without scanning it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub orientation: Orientation,
    pub canvas: Canvas,
    pub scale: ScaleFactors,
    pub thresholds: ScanThresholds,
}

/// Counts and timings for one conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionStats {
    pub image_width: u32,
    pub image_height: u32,
    pub orientation: Orientation,
    pub scale: ScaleFactors,
    pub thresholds: ScanThresholds,
    pub horizontal_segments: usize,
    pub vertical_segments: usize,
    /// Endpoint coordinates left at a new value by the reconciler.
    pub snapped_endpoints: usize,
    pub scan_duration_ms: u64,
    pub total_duration_ms: u64,
}

impl ExtractionStats {
    pub fn total_lines(&self) -> usize {
        self.horizontal_segments + self.vertical_segments
    }
}
