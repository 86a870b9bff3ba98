//! Canvas selection and pixel-to-canvas coordinate mapping.
//!
//! The target canvas is an A4 page in canvas units (555 × 800 printable area
//! plus the margin on every side), portrait when the image is at least as
//! tall as it is wide and landscape otherwise.
//!
//! Scale factors are fixed point with two implied decimals and truncating
//! integer division throughout, so `scale = 250` means 2.5 pixels per canvas
//! unit.

use super::run::Axis;
use super::scan::Segment;
use serde::{Deserialize, Serialize};

/// Printable width of a portrait A4 page, in canvas units.
pub const PAGE_SHORT_EDGE: u32 = 555;
/// Printable height of a portrait A4 page, in canvas units.
pub const PAGE_LONG_EDGE: u32 = 800;

/// Page orientation of the target canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Portrait when `height >= width`.
    pub fn for_image(width: u32, height: u32) -> Self {
        if height >= width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

/// Target canvas size, margins included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    pub orientation: Orientation,
    pub width: u32,
    pub height: u32,
    pub margin: u32,
}

impl Canvas {
    /// Pick the canvas for an image of the given pixel size.
    pub fn for_image(width: u32, height: u32, margin: u32) -> Self {
        let orientation = Orientation::for_image(width, height);
        let (w, h) = match orientation {
            Orientation::Portrait => (PAGE_SHORT_EDGE, PAGE_LONG_EDGE),
            Orientation::Landscape => (PAGE_LONG_EDGE, PAGE_SHORT_EDGE),
        };
        let both_sides = margin.saturating_mul(2);
        Self {
            orientation,
            width: w.saturating_add(both_sides),
            height: h.saturating_add(both_sides),
            margin,
        }
    }
}

/// Pixels per canvas unit, times 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleFactors {
    pub x: u32,
    pub y: u32,
}

impl ScaleFactors {
    /// `image * 100 / canvas` per axis, truncated.
    ///
    /// Clamped to at least 1: images under 1/100 of the canvas size would
    /// otherwise produce a zero divisor.
    pub fn new(image_width: u32, image_height: u32, canvas: &Canvas) -> Self {
        let factor = |image: u32, canvas: u32| -> u32 {
            let f = image as u64 * 100 / canvas.max(1) as u64;
            f.clamp(1, u32::MAX as u64) as u32
        };
        Self {
            x: factor(image_width, canvas.width),
            y: factor(image_height, canvas.height),
        }
    }
}

/// A segment in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaledSegment {
    pub axis: Axis,
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

/// Maps pixel-space [`Segment`]s onto the canvas.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper {
    scale: ScaleFactors,
}

impl CoordinateMapper {
    pub fn new(scale: ScaleFactors) -> Self {
        Self { scale }
    }

    fn to_canvas(pixel: u64, factor: u32) -> i32 {
        (pixel * 100 / factor as u64) as i32
    }

    /// Map one segment. The far endpoint is pulled back by one unit so it
    /// stays inside the segment's own extent.
    pub fn map(&self, seg: &Segment) -> ScaledSegment {
        let x = seg.x as u64;
        let y = seg.y as u64;
        let far = seg.length as u64;
        let cx = Self::to_canvas(x, self.scale.x);
        let cy = Self::to_canvas(y, self.scale.y);

        match seg.axis {
            Axis::Horizontal => ScaledSegment {
                axis: Axis::Horizontal,
                x1: cx,
                y1: cy,
                x2: Self::to_canvas(x + far, self.scale.x) - 1,
                y2: cy,
            },
            Axis::Vertical => ScaledSegment {
                axis: Axis::Vertical,
                x1: cx,
                y1: cy,
                x2: cx,
                y2: Self::to_canvas(y + far, self.scale.y) - 1,
            },
        }
    }

    pub fn map_all(&self, segments: &[Segment]) -> Vec<ScaledSegment> {
        segments.iter().map(|s| self.map(s)).collect()
    }
}
