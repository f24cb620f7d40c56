// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

/// Default distance within which a point is considered to lie on a beam axis.
pub const DEFAULT_MEMBERSHIP: f64 = 0.5;
/// Default distance to a beam's first/last node below which a support is a beam-end support.
pub const DEFAULT_END: f64 = 1.0;
/// Default length below which a segment is treated as zero-length.
pub const DEFAULT_DEGENERATE: f64 = 0.01;
/// Slack applied to the unclamped projection fraction when testing containment.
///
/// This is a parametric slack (unitless) absorbing rounding in `dot / len²`, not
/// a length tolerance: a point whose foot lands measurably beyond an endpoint
/// stays outside the segment.
pub const FRACTION_SLACK: f64 = 1e-9;

/// Tolerances used by projection, resolution and placement classification.
///
/// Invariants: all values are finite and non-negative (see [`Tolerances::is_valid`]).
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Tolerances {
    /// Maximum perpendicular distance for a point to belong to a segment.
    pub membership: f64,
    /// Distance to a beam extremity under which a support bears at the beam end.
    pub end: f64,
    /// Segment length under which the segment is skipped during projection.
    pub degenerate: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            membership: DEFAULT_MEMBERSHIP,
            end: DEFAULT_END,
            degenerate: DEFAULT_DEGENERATE,
        }
    }
}

impl Tolerances {
    /// Returns `true` when every tolerance is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.membership, self.end, self.degenerate]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}
