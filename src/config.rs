//! Configuration types for raster-to-TLF line extraction.
//!
//! All conversion behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. Every threshold the scanner and the
//! reconciler use lives here; nothing reads process-wide state. The values
//! that depend on the image itself (minimum line length, gap tolerance) are
//! derived per image into [`crate::pipeline::scan::ScanThresholds`].

use crate::error::Img2TlfError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest accepted page margin, in canvas units.
pub const MAX_MARGIN: u32 = 10_000;

/// Configuration for a raster-to-TLF conversion.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use img2tlf::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .dark_threshold(200)
///     .snap_tolerance(4)
///     .build()
///     .unwrap();
/// assert_eq!(config.dark_threshold, 200);
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Upper intensity limit for a dark sample. Default: 240.
    ///
    /// A sample is dark when its intensity is strictly below this value.
    /// Scanned paper rarely comes out pure white, so anything lighter than
    /// 240 on the 0–255 scale is still treated as ink.
    pub dark_threshold: u8,

    /// Which channel of the source pixels is sampled. Default: [`Channel::Red`].
    pub channel: Channel,

    /// Minimum line length as a percentage of the horizontal scale factor. Default: 30.
    ///
    /// `min_line_length = min_rate * scale_x / 100` in pixels. Runs no
    /// longer than this are treated as noise.
    pub min_rate: u32,

    /// Divisor deriving the gap tolerance from the minimum line length. Default: 15.
    ///
    /// `gap_tolerance = min_line_length / gap_divisor`. A run survives up to
    /// `gap_tolerance` consecutive light samples.
    pub gap_divisor: u32,

    /// Maximum canvas-unit distance at which endpoints are snapped together. Default: 3.
    pub snap_tolerance: i32,

    /// Report margin in canvas units, applied on every side. Default: 20.
    ///
    /// Also widens the canvas used to compute the scale factors. At most
    /// [`MAX_MARGIN`].
    pub margin: u32,

    /// Evaluate a run that is still active when its scan line ends. Default: false.
    ///
    /// By default such a run is dropped, so a rule that touches the image
    /// border without trailing background is not captured. Enabling this
    /// changes the output for those images.
    pub flush_at_line_end: bool,

    /// Document title written into the TLF. Default: empty.
    pub title: String,

    /// Paper type written into the TLF report section. Default: "A4".
    pub paper_type: String,

    /// Pretty-print the serialised JSON. Default: false.
    pub pretty: bool,

    /// Optional progress observer.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            dark_threshold: 240,
            channel: Channel::default(),
            min_rate: 30,
            gap_divisor: 15,
            snap_tolerance: 3,
            margin: 20,
            flush_at_line_end: false,
            title: String::new(),
            paper_type: "A4".to_string(),
            pretty: false,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("dark_threshold", &self.dark_threshold)
            .field("channel", &self.channel)
            .field("min_rate", &self.min_rate)
            .field("gap_divisor", &self.gap_divisor)
            .field("snap_tolerance", &self.snap_tolerance)
            .field("margin", &self.margin)
            .field("flush_at_line_end", &self.flush_at_line_end)
            .field("title", &self.title)
            .field("paper_type", &self.paper_type)
            .field("pretty", &self.pretty)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn dark_threshold(mut self, threshold: u8) -> Self {
        self.config.dark_threshold = threshold;
        self
    }

    pub fn channel(mut self, channel: Channel) -> Self {
        self.config.channel = channel;
        self
    }

    pub fn min_rate(mut self, rate: u32) -> Self {
        self.config.min_rate = rate;
        self
    }

    pub fn gap_divisor(mut self, divisor: u32) -> Self {
        self.config.gap_divisor = divisor;
        self
    }

    pub fn snap_tolerance(mut self, tolerance: i32) -> Self {
        self.config.snap_tolerance = tolerance;
        self
    }

    pub fn margin(mut self, margin: u32) -> Self {
        self.config.margin = margin;
        self
    }

    pub fn flush_at_line_end(mut self, v: bool) -> Self {
        self.config.flush_at_line_end = v;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn paper_type(mut self, paper_type: impl Into<String>) -> Self {
        self.config.paper_type = paper_type.into();
        self
    }

    pub fn pretty(mut self, v: bool) -> Self {
        self.config.pretty = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, Img2TlfError> {
        let c = &self.config;
        if c.dark_threshold == 0 {
            return Err(Img2TlfError::InvalidConfig(
                "Dark threshold must be 1–255; 0 classifies every sample as light".into(),
            ));
        }
        if c.min_rate == 0 {
            return Err(Img2TlfError::InvalidConfig("min_rate must be ≥ 1".into()));
        }
        if c.gap_divisor == 0 {
            return Err(Img2TlfError::InvalidConfig(
                "gap_divisor must be ≥ 1".into(),
            ));
        }
        if c.margin > MAX_MARGIN {
            return Err(Img2TlfError::InvalidConfig(format!(
                "Margin must be ≤ {MAX_MARGIN} canvas units, got {}",
                c.margin
            )));
        }
        if c.snap_tolerance < 0 {
            return Err(Img2TlfError::InvalidConfig(format!(
                "Snap tolerance must be ≥ 0, got {}",
                c.snap_tolerance
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which pixel channel feeds the intensity sampler.
///
/// Scanned forms are usually printed in black, where every channel agrees.
/// `Red` reproduces the classic behaviour and ignores red pen marks made on
/// top of the form; `Luma` is the better choice for drawings in other
/// colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Red channel only. (default)
    #[default]
    Red,
    /// ITU-R BT.601 weighted luminance.
    Luma,
}
