// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Orthogonal projection of a point onto a finite segment.
//!
//! Containment and distance are reported separately: a point close to the
//! *extended* line of a segment but beyond one of its endpoints is close, yet
//! not within the segment. Callers combine `within_segment` with their own
//! membership tolerance.

use crate::tolerance::FRACTION_SLACK;
use crate::types::point::Point2;

/// Result of projecting a point onto a segment.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    /// `true` when the unclamped foot of the perpendicular lies between the endpoints.
    pub within_segment: bool,
    /// Closest point on the segment (clamped foot).
    pub point: Point2,
    /// Clamped fraction along the segment, in `[0, 1]`.
    pub fraction: f64,
    /// Distance from the input point to `point`.
    ///
    /// Equals the perpendicular distance whenever `within_segment` holds.
    pub distance: f64,
}

/// Projects `point` onto the segment `start`..`end`.
///
/// A zero-length segment projects everything onto `start` with fraction `0`
/// and is never reported as containing the point.
pub fn project(point: Point2, start: Point2, end: Point2) -> Projection {
    let dir = end.sub(&start);
    let len_sq = dir.length_squared();
    if len_sq <= 0.0 {
        return Projection {
            within_segment: false,
            point: start,
            fraction: 0.0,
            distance: point.distance(&start),
        };
    }
    let raw = point.sub(&start).dot(&dir) / len_sq;
    let within_segment = (-FRACTION_SLACK..=1.0 + FRACTION_SLACK).contains(&raw);
    let fraction = raw.clamp(0.0, 1.0);
    let foot = start.lerp(&end, fraction);
    Projection {
        within_segment,
        point: foot,
        fraction,
        distance: point.distance(&foot),
    }
}
