// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Arc-length ("Xi") resolution of plan points against beam axes.
//!
//! Not finding a point on a beam is the common case when scanning many
//! beam/point pairs, so every query returns an `Option` instead of an error.

use crate::projection::project;
use crate::tolerance::Tolerances;
use crate::types::point::Point2;
use crate::types::polyline::Polyline;

/// Where a point sits on a polyline.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    /// Index of the segment the point projects onto.
    pub segment: usize,
    /// Fraction along that segment, in `[0, 1]`.
    pub fraction: f64,
    /// Cumulative arc length from the first node.
    pub xi: f64,
    /// Perpendicular distance from the point to the axis.
    pub distance: f64,
    /// Foot of the perpendicular on the axis.
    pub foot: Point2,
}

/// Position of a point relative to a span of the beam.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpanPosition {
    /// Beam-global arc length.
    pub global_xi: f64,
    /// Arc length measured from the span start (`global_xi - span_start_xi`).
    pub local_xi: f64,
    /// `|local_xi - expected local offset|`.
    pub deviation: f64,
}

/// Where along its host a support bears.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Placement {
    /// Within the end tolerance of the host's first or last node.
    BeamEnd,
    /// Strictly inside the host's extent.
    MidSpan,
}

/// Resolves plan points to arc-length positions using fixed tolerances.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct ArcResolver {
    tolerances: Tolerances,
}

impl ArcResolver {
    /// Creates a resolver with the given tolerances.
    pub const fn new(tolerances: Tolerances) -> Self {
        Self { tolerances }
    }

    /// Tolerances in use.
    pub const fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    /// Finds the segment `point` projects onto with the smallest distance.
    ///
    /// Zero-length segments are skipped. Only projections falling within a
    /// segment's extent compete; ties keep the earlier segment. Returns `None`
    /// when the best distance exceeds the membership tolerance.
    pub fn locate(&self, point: Point2, line: &Polyline) -> Option<Location> {
        let mut best: Option<Location> = None;
        for seg in line.segments() {
            if seg.is_degenerate(self.tolerances.degenerate) {
                continue;
            }
            let proj = project(point, seg.start, seg.end);
            if !proj.within_segment {
                continue;
            }
            if best.is_some_and(|b| proj.distance >= b.distance) {
                continue;
            }
            best = Some(Location {
                segment: seg.index,
                fraction: proj.fraction,
                xi: seg.xi_at(proj.fraction),
                distance: proj.distance,
                foot: proj.point,
            });
        }
        best.filter(|loc| loc.distance <= self.tolerances.membership)
    }

    /// Beam-global arc length of `point`, if it lies on `line`.
    pub fn resolve_xi(&self, point: Point2, line: &Polyline) -> Option<f64> {
        self.locate(point, line).map(|loc| loc.xi)
    }

    /// Arc length of `point` relative to a span starting at `span_start_xi`.
    ///
    /// `local_offset` is the span-relative position the caller expects (for
    /// instance a report's local Xi); the returned `deviation` measures how far
    /// the resolved position is from it.
    pub fn resolve_xi_within_span(
        &self,
        local_offset: f64,
        span_start_xi: f64,
        point: Point2,
        line: &Polyline,
    ) -> Option<SpanPosition> {
        let global_xi = self.resolve_xi(point, line)?;
        let local_xi = global_xi - span_start_xi;
        Some(SpanPosition {
            global_xi,
            local_xi,
            deviation: (local_xi - local_offset).abs(),
        })
    }

    /// Returns `true` when `point` lies on `line` within tolerance.
    pub fn contains(&self, point: Point2, line: &Polyline) -> bool {
        self.locate(point, line).is_some()
    }

    /// Classifies a support point against its host's extremities.
    pub fn placement(&self, point: Point2, line: &Polyline) -> Placement {
        let end = self.tolerances.end;
        if point.distance(&line.first()) <= end || point.distance(&line.last()) <= end {
            Placement::BeamEnd
        } else {
            Placement::MidSpan
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> Polyline {
        Polyline::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(20.0, 0.0),
        ])
        .unwrap()
    }

    fn l_shape() -> Polyline {
        Polyline::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
        ])
        .unwrap()
    }

    #[test]
    fn resolves_point_on_second_segment() {
        let r = ArcResolver::default();
        let xi = r.resolve_xi(Point2::new(15.0, 0.0), &host()).unwrap();
        assert!((xi - 15.0).abs() < 1e-12);
    }

    #[test]
    fn within_tolerance_off_axis_is_accepted() {
        let r = ArcResolver::default();
        let loc = r.locate(Point2::new(4.0, 0.45), &host()).unwrap();
        assert_eq!(loc.segment, 0);
        assert!((loc.xi - 4.0).abs() < 1e-12);
        assert!((loc.distance - 0.45).abs() < 1e-12);
    }

    #[test]
    fn outside_tolerance_is_none() {
        let r = ArcResolver::default();
        assert!(r.resolve_xi(Point2::new(4.0, 0.6), &host()).is_none());
    }

    #[test]
    fn beyond_the_last_node_is_none() {
        let r = ArcResolver::default();
        assert!(r.resolve_xi(Point2::new(20.3, 0.0), &host()).is_none());
        assert!(r.resolve_xi(Point2::new(-0.2, 0.0), &host()).is_none());
    }

    #[test]
    fn picks_closest_segment_on_bent_axis() {
        let r = ArcResolver::default();
        // Inside the corner, nearer the vertical leg.
        let loc = r.locate(Point2::new(9.8, 9.0), &l_shape()).unwrap();
        assert_eq!(loc.segment, 1);
        assert!((loc.xi - 19.0).abs() < 1e-12);
    }

    #[test]
    fn corner_node_keeps_first_segment() {
        let r = ArcResolver::default();
        let loc = r.locate(Point2::new(10.0, 0.0), &l_shape()).unwrap();
        assert_eq!(loc.segment, 0);
        assert!((loc.xi - 10.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_segments_are_skipped_but_counted() {
        let line = Polyline::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 0.0),
            Point2::new(5.005, 0.0),
            Point2::new(15.0, 0.0),
        ])
        .unwrap();
        let r = ArcResolver::default();
        let loc = r.locate(Point2::new(5.0, 0.0), &line).unwrap();
        assert_eq!(loc.segment, 0);
        assert!((loc.xi - 5.0).abs() < 1e-12);
        let xi = r.resolve_xi(Point2::new(10.0, 0.0), &line).unwrap();
        assert!((xi - 10.0).abs() < 1e-9);
    }

    #[test]
    fn span_relative_position() {
        let r = ArcResolver::default();
        let pos = r
            .resolve_xi_within_span(5.0, 10.0, Point2::new(15.0, 0.0), &host())
            .unwrap();
        assert!((pos.global_xi - 15.0).abs() < 1e-12);
        assert!((pos.local_xi - 5.0).abs() < 1e-12);
        assert!(pos.deviation < 1e-12);

        let off = r
            .resolve_xi_within_span(2.0, 10.0, Point2::new(15.0, 0.0), &host())
            .unwrap();
        assert!((off.deviation - 3.0).abs() < 1e-12);
        assert!(r
            .resolve_xi_within_span(0.0, 0.0, Point2::new(15.0, 3.0), &host())
            .is_none());
    }

    #[test]
    fn placement_distinguishes_ends_from_span() {
        let r = ArcResolver::default();
        let line = host();
        assert_eq!(r.placement(Point2::new(0.5, 0.0), &line), Placement::BeamEnd);
        assert_eq!(r.placement(Point2::new(19.2, 0.0), &line), Placement::BeamEnd);
        assert_eq!(r.placement(Point2::new(10.0, 0.0), &line), Placement::MidSpan);
        assert_eq!(r.placement(Point2::new(1.5, 0.0), &line), Placement::MidSpan);
    }
}
