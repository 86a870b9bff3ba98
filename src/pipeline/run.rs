//! Run accumulation: the per-scan-line state machine.
//!
//! A [`RunAccumulator`] is fed one [`Sample`] at a time along a scan line.
//! It is `Idle` until the first dark sample, then `Active` while a [`Run`]
//! collects samples. Light samples inside a run are kept as gap samples
//! until more than `gap_tolerance` of them follow each other, which
//! terminates the run and hands it back to the scanner for evaluation.
//!
//! ```text
//!            dark                       gap > tolerance
//!   Idle ──────────▶ Active(run) ───────────────────────▶ Terminated(run) ─▶ Idle
//!                      │   ▲
//!                      └───┘ dark / tolerated gap
//! ```

use super::sample::Sample;
use serde::{Deserialize, Serialize};

/// Orientation of a run, segment or scan pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// 0°, collected row by row.
    Horizontal,
    /// 90°, collected column by column.
    Vertical,
}

/// An in-progress candidate line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub x: u32,
    pub y: u32,
    pub axis: Axis,
    values: Vec<u8>,
    gap_run: usize,
    edge_count: usize,
    last_value: u8,
    change_count: usize,
}

impl Run {
    /// Start a run at `(x, y)` with its first dark sample.
    ///
    /// `last_value` starts at the threshold, so the first sample always
    /// registers as a change.
    fn start(x: u32, y: u32, axis: Axis, first: Sample, threshold: u8) -> Self {
        let mut run = Self {
            x,
            y,
            axis,
            values: Vec::new(),
            gap_run: 0,
            edge_count: 0,
            last_value: threshold,
            change_count: 0,
        };
        run.add_value(first, usize::MAX);
        run
    }

    /// Count the transverse neighbour if it is light.
    fn check_edge(&mut self, neighbor: Sample) {
        if !neighbor.dark {
            self.edge_count += 1;
        }
    }

    /// Append a sample. Returns `false` when the trailing gap has grown past
    /// `gap_tolerance` and the run must end.
    fn add_value(&mut self, sample: Sample, gap_tolerance: usize) -> bool {
        if sample.dark {
            self.values.push(sample.value);
            self.gap_run = 0;
            if sample.value != self.last_value {
                self.change_count += 1;
            }
            self.last_value = sample.value;
            return true;
        }

        if self.values.is_empty() {
            return true;
        }

        self.values.push(sample.value);
        self.gap_run += 1;
        self.gap_run <= gap_tolerance
    }

    /// Samples collected so far, minus the currently open trailing gap.
    ///
    /// Interior gaps closed by a later dark sample still count.
    pub fn effective_length(&self) -> usize {
        self.values.len() - self.gap_run
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn gap_run(&self) -> usize {
        self.gap_run
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn change_count(&self) -> usize {
        self.change_count
    }

    /// Acceptance heuristic, evaluated once when the run ends.
    ///
    /// The run must be longer than `min_line_length`, sit on a light/dark
    /// boundary for more than a third of its length, and change intensity
    /// on fewer than a third of its samples.
    pub fn is_writable(&self, min_line_length: usize) -> bool {
        let len = self.effective_length();
        len > min_line_length && self.edge_count > len / 3 && self.change_count < len / 3
    }
}

/// Outcome of feeding one sample to a [`RunAccumulator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// No run is active and the sample was light.
    Idle,
    /// The sample started a new run.
    Started,
    /// The active run absorbed the sample.
    Continued,
    /// The sample overflowed the gap tolerance; the finished run is returned
    /// and the accumulator is idle again.
    Terminated(Run),
}

/// State machine turning samples along one scan line into runs.
///
/// Create one per scan line; [`RunAccumulator::finish`] consumes it at the
/// end of the line.
#[derive(Debug)]
pub struct RunAccumulator {
    axis: Axis,
    threshold: u8,
    gap_tolerance: usize,
    active: Option<Run>,
}

impl RunAccumulator {
    pub fn new(axis: Axis, threshold: u8, gap_tolerance: usize) -> Self {
        Self {
            axis,
            threshold,
            gap_tolerance,
            active: None,
        }
    }

    /// Feed the sample at `(x, y)`.
    ///
    /// `neighbor` yields the transverse neighbour one step back on the
    /// perpendicular axis; it is only read while a run is active.
    pub fn feed(
        &mut self,
        x: u32,
        y: u32,
        sample: Sample,
        neighbor: impl FnOnce() -> Sample,
    ) -> Step {
        let Some(run) = self.active.as_mut() else {
            if sample.dark {
                self.active = Some(Run::start(x, y, self.axis, sample, self.threshold));
                return Step::Started;
            }
            return Step::Idle;
        };

        run.check_edge(neighbor());
        if run.add_value(sample, self.gap_tolerance) {
            return Step::Continued;
        }

        match self.active.take() {
            Some(run) => Step::Terminated(run),
            None => Step::Idle,
        }
    }

    /// End the scan line, returning the run that was still active, if any.
    pub fn finish(self) -> Option<Run> {
        self.active
    }
}
