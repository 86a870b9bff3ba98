//! Endpoint reconciliation: snap near-touching junctions into exact corners.
//!
//! Rasterisation jitter leaves perpendicular rules a unit or two short of,
//! or past, each other. Two independent passes fix that:
//!
//! * every horizontal line has its **x** endpoints snapped onto the x of any
//!   vertical line whose y span reaches it;
//! * every vertical line has its **y** endpoints snapped onto the y of any
//!   horizontal line whose x span reaches it.
//!
//! Both passes read the un-snapped input lists as bases and write only into
//! their own output copies, so the result does not depend on pass order.
//! Horizontal lines never move vertically and vertical lines never move
//! horizontally.
//!
//! Reconciliation runs once. Feeding the output back in changes nothing as
//! long as the first run moved no line that serves as a base for another.
//! When it did, a lengthened line can reach an endpoint it missed before,
//! and a second run snaps that endpoint too.

use super::run::Axis;
use super::scale::ScaledSegment;
use tracing::debug;

/// Output of [`EndpointReconciler::reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciledLines {
    pub horizontal: Vec<ScaledSegment>,
    pub vertical: Vec<ScaledSegment>,
    /// Endpoint coordinates whose final value differs from the input.
    pub snapped: usize,
}

impl ReconciledLines {
    /// All lines, horizontal first, each group in scan order.
    pub fn iter(&self) -> impl Iterator<Item = &ScaledSegment> {
        self.horizontal.iter().chain(self.vertical.iter())
    }

    pub fn len(&self) -> usize {
        self.horizontal.len() + self.vertical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Snaps endpoints of perpendicular lines that lie within `tolerance`.
#[derive(Debug, Clone, Copy)]
pub struct EndpointReconciler {
    tolerance: i32,
}

impl EndpointReconciler {
    pub fn new(tolerance: i32) -> Self {
        Self {
            tolerance: tolerance.max(0),
        }
    }

    pub fn reconcile(
        &self,
        horizontal: &[ScaledSegment],
        vertical: &[ScaledSegment],
    ) -> ReconciledLines {
        let h_out: Vec<ScaledSegment> = horizontal
            .iter()
            .map(|h| {
                let mut line = *h;
                for v in vertical {
                    self.snap_horizontal(&mut line, v);
                }
                line
            })
            .collect();

        let v_out: Vec<ScaledSegment> = vertical
            .iter()
            .map(|v| {
                let mut line = *v;
                for h in horizontal {
                    self.snap_vertical(&mut line, h);
                }
                line
            })
            .collect();

        // A later base may undo an earlier snap; only net moves count.
        let snapped = horizontal
            .iter()
            .zip(&h_out)
            .chain(vertical.iter().zip(&v_out))
            .map(|(before, after)| moved_endpoints(before, after))
            .sum();

        debug!(
            "Reconciled {} horizontal and {} vertical lines, {} endpoints snapped",
            h_out.len(),
            v_out.len(),
            snapped
        );

        ReconciledLines {
            horizontal: h_out,
            vertical: v_out,
            snapped,
        }
    }

    /// Snap the x endpoints of horizontal `target` onto vertical `base`.
    fn snap_horizontal(&self, target: &mut ScaledSegment, base: &ScaledSegment) {
        debug_assert_eq!(target.axis, Axis::Horizontal);
        let tol = self.tolerance;
        if !(base.y1 - tol <= target.y1 && target.y1 <= base.y2 + tol) {
            return;
        }
        if (base.x1 - target.x1).abs() <= tol {
            target.x1 = base.x1;
        }
        if (base.x2 - target.x2).abs() <= tol {
            target.x2 = base.x1;
        }
    }

    /// Snap the y endpoints of vertical `target` onto horizontal `base`.
    fn snap_vertical(&self, target: &mut ScaledSegment, base: &ScaledSegment) {
        debug_assert_eq!(target.axis, Axis::Vertical);
        let tol = self.tolerance;
        if !(base.x1 - tol <= target.x1 && target.x1 <= base.x2 + tol) {
            return;
        }
        if (base.y1 - target.y1).abs() <= tol {
            target.y1 = base.y1;
        }
        if (base.y2 - target.y2).abs() <= tol {
            target.y2 = base.y1;
        }
    }
}

fn moved_endpoints(before: &ScaledSegment, after: &ScaledSegment) -> usize {
    [
        before.x1 != after.x1,
        before.y1 != after.y1,
        before.x2 != after.x2,
        before.y2 != after.y2,
    ]
    .into_iter()
    .filter(|&m| m)
    .count()
}
