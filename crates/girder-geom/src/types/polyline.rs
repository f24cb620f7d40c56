// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::error::GeomError;
use crate::tolerance::DEFAULT_DEGENERATE;
use crate::types::point::Point2;

/// Cumulative arc lengths of an ordered node list.
///
/// Returns one entry per node: `out[0] == 0` and
/// `out[i] == out[i - 1] + |node[i] - node[i - 1]|`. Coincident nodes add a
/// zero-length step, so the sequence is non-decreasing.
///
/// # Errors
/// [`GeomError::Degenerate`] when fewer than two nodes are supplied.
pub fn arc_lengths(nodes: &[Point2]) -> Result<Vec<f64>, GeomError> {
    if nodes.len() < 2 {
        return Err(GeomError::Degenerate {
            nodes: nodes.len(),
            distinct: nodes.len(),
        });
    }
    let mut out = Vec::with_capacity(nodes.len());
    let mut acc = 0.0;
    out.push(acc);
    for pair in nodes.windows(2) {
        acc += pair[0].distance(&pair[1]);
        out.push(acc);
    }
    Ok(out)
}

/// One segment of a polyline: nodes `index` and `index + 1`.
///
/// Segments are derived on demand and never stored.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Segment {
    /// Index of the segment's first node.
    pub index: usize,
    /// First node.
    pub start: Point2,
    /// Second node.
    pub end: Point2,
    /// Arc length at `start`.
    pub xi_start: f64,
    /// Arc length at `end`.
    pub xi_end: f64,
}

impl Segment {
    /// Segment length (equal to `xi_end - xi_start`).
    pub fn length(&self) -> f64 {
        self.xi_end - self.xi_start
    }

    /// Returns `true` when the segment has zero length or is shorter than `epsilon`.
    pub fn is_degenerate(&self, epsilon: f64) -> bool {
        let len = self.length();
        len <= 0.0 || len < epsilon
    }

    /// Arc length at fraction `t` of this segment.
    pub fn xi_at(&self, t: f64) -> f64 {
        self.xi_start + t * (self.xi_end - self.xi_start)
    }
}

/// A beam axis: an open polyline of at least two distinct nodes.
///
/// Invariants:
/// - `arc[0] == 0` and `arc` is non-decreasing, one entry per node.
/// - At least two consecutive nodes are further apart than the degenerate
///   epsilon used at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    nodes: Vec<Point2>,
    arc: Vec<f64>,
}

impl Polyline {
    /// Builds a polyline using the default degenerate epsilon.
    ///
    /// # Errors
    /// [`GeomError::Degenerate`] when fewer than two distinct nodes are supplied.
    pub fn new(nodes: Vec<Point2>) -> Result<Self, GeomError> {
        Self::with_epsilon(nodes, DEFAULT_DEGENERATE)
    }

    /// Builds a polyline; consecutive nodes closer than `epsilon` count as one.
    ///
    /// Coincident nodes never count as distinct, even with a zero `epsilon`.
    ///
    /// # Errors
    /// [`GeomError::Degenerate`] when fewer than two distinct nodes are supplied.
    pub fn with_epsilon(nodes: Vec<Point2>, epsilon: f64) -> Result<Self, GeomError> {
        let arc = arc_lengths(&nodes)?;
        let distinct = 1 + nodes
            .windows(2)
            .filter(|pair| {
                let d = pair[0].distance(&pair[1]);
                d > 0.0 && d >= epsilon
            })
            .count();
        if distinct < 2 {
            return Err(GeomError::Degenerate {
                nodes: nodes.len(),
                distinct,
            });
        }
        Ok(Self { nodes, arc })
    }

    /// Node coordinates in traversal order.
    pub fn nodes(&self) -> &[Point2] {
        &self.nodes
    }

    /// Cumulative arc length per node.
    pub fn arc_lengths(&self) -> &[f64] {
        &self.arc
    }

    /// Total axis length.
    pub fn length(&self) -> f64 {
        self.arc.last().copied().unwrap_or(0.0)
    }

    /// First node.
    pub fn first(&self) -> Point2 {
        self.nodes[0]
    }

    /// Last node.
    pub fn last(&self) -> Point2 {
        self.nodes[self.nodes.len() - 1]
    }

    /// Number of segments (`nodes - 1`).
    pub fn segment_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Iterates segments in traversal order, including zero-length ones.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.nodes.windows(2).enumerate().map(|(index, pair)| Segment {
            index,
            start: pair[0],
            end: pair[1],
            xi_start: self.arc[index],
            xi_end: self.arc[index + 1],
        })
    }

    /// Point at arc length `xi`, clamped to `[0, length]`.
    pub fn point_at(&self, xi: f64) -> Point2 {
        let xi = xi.clamp(0.0, self.length());
        // First node whose arc length reaches `xi`; the segment ends there.
        let end = self.arc.partition_point(|a| *a < xi).clamp(1, self.nodes.len() - 1);
        let start = end - 1;
        let span = self.arc[end] - self.arc[start];
        if span <= 0.0 {
            return self.nodes[start];
        }
        let t = (xi - self.arc[start]) / span;
        self.nodes[start].lerp(&self.nodes[end], t)
    }
}
