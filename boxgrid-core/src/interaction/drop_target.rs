//! Drop-target resolution
//!
//! A candidate is acceptable when
//!
//! ```text
//! IoU >= min_iou
//!   OR (candidate_area >= dragged_area
//!       AND overlap_dragged >= min_overlap_dragged
//!       AND overlap_target  >= min_overlap_target)
//! ```
//!
//! where `overlap_dragged = intersection / dragged_area` and
//! `overlap_target = intersection / candidate_area`. The second clause lets a
//! small container drop into a much larger one it sits fully inside.

use crate::layout::ContainerTree;
use crate::models::GridRect;

/// Acceptance thresholds for drop targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropThresholds {
    /// IoU at or above which a candidate is always accepted
    pub min_iou: f64,
    /// Share of the dragged area that must lie on the candidate
    pub min_overlap_dragged: f64,
    /// Share of the candidate area that must be covered
    pub min_overlap_target: f64,
}

impl Default for DropThresholds {
    fn default() -> Self {
        Self {
            min_iou: 0.5,
            min_overlap_dragged: 0.65,
            min_overlap_target: 0.25,
        }
    }
}

/// Overlap measures between the dragged rectangle and one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropMetrics {
    /// Intersection over union
    pub iou: f64,
    /// Intersection over dragged area
    pub overlap_dragged: f64,
    /// Intersection over candidate area
    pub overlap_target: f64,
    /// Cells covered by the dragged rectangle
    pub dragged_area: i64,
    /// Cells covered by the candidate
    pub candidate_area: i64,
}

impl DropMetrics {
    /// Measures `dragged` against `candidate`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn between(dragged: &GridRect, candidate: &GridRect) -> Self {
        let dragged_area = dragged.area();
        let candidate_area = candidate.area();
        let intersection = dragged.intersection_area(candidate);
        let ratio = |num: i64, den: i64| {
            if den > 0 {
                num as f64 / den as f64
            } else {
                0.0
            }
        };
        Self {
            iou: ratio(intersection, dragged_area + candidate_area - intersection),
            overlap_dragged: ratio(intersection, dragged_area),
            overlap_target: ratio(intersection, candidate_area),
            dragged_area,
            candidate_area,
        }
    }

    /// Applies the acceptance rule.
    #[must_use]
    pub fn is_acceptable(&self, thresholds: &DropThresholds) -> bool {
        self.iou >= thresholds.min_iou
            || (self.candidate_area >= self.dragged_area
                && self.overlap_dragged >= thresholds.min_overlap_dragged
                && self.overlap_target >= thresholds.min_overlap_target)
    }
}

/// Intersection over union of two rectangles.
#[must_use]
pub fn intersection_over_union(a: &GridRect, b: &GridRect) -> f64 {
    DropMetrics::between(a, b).iou
}

/// The chosen drop target.
#[derive(Debug, Clone, PartialEq)]
pub struct DropCandidate {
    /// Target container name
    pub name: String,
    /// Overlap measures that selected it
    pub metrics: DropMetrics,
}

/// Picks the drop target for `dragged` placed at `rect`.
///
/// Candidates are the other children of the dragged container's parent,
/// excluding the dragged container's own descendants. The acceptable candidate
/// with the highest IoU wins; ties go to the earlier child.
#[must_use]
pub fn resolve_drop_target(
    tree: &ContainerTree,
    dragged: &str,
    rect: &GridRect,
    thresholds: &DropThresholds,
) -> Option<DropCandidate> {
    let parent = tree.find_parent_of(dragged)?;
    let mut best: Option<DropCandidate> = None;
    for candidate in &parent.children {
        if candidate.name == dragged || tree.is_descendant_of(&candidate.name, dragged) {
            continue;
        }
        let metrics = DropMetrics::between(rect, &candidate.rect());
        if !metrics.is_acceptable(thresholds) {
            continue;
        }
        if best.as_ref().is_none_or(|b| metrics.iou > b.metrics.iou) {
            best = Some(DropCandidate {
                name: candidate.name.clone(),
                metrics,
            });
        }
    }
    if let Some(chosen) = &best {
        tracing::debug!(
            dragged,
            candidate = %chosen.name,
            iou = chosen.metrics.iou,
            "Resolved drop target"
        );
    }
    best
}
