// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Beam axes of a floor and the raw support assertions drawn from them.

use girder_geom::{ArcResolver, Polyline};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use super::{CrossingKind, FloorGeometry};
use crate::error::CorrelationError;
use crate::model::{BeamFailure, RawAssertion};

/// Usable axis polylines of a floor, keyed by beam identifier.
///
/// Beams whose nodes collapse to fewer than two distinct points are left out
/// and reported through [`BeamAxes::failures`].
#[derive(Debug, Clone, Default)]
pub struct BeamAxes {
    order: Vec<String>,
    lines: FxHashMap<String, Polyline>,
    failures: Vec<BeamFailure>,
}

impl BeamAxes {
    /// Builds every beam's polyline with `epsilon` as the distinct-node threshold.
    pub fn build(floor: &FloorGeometry, epsilon: f64) -> Self {
        let mut axes = Self::default();
        for beam in &floor.beams {
            if axes.lines.contains_key(&beam.id) {
                debug!(beam = %beam.id, "duplicate beam id; first occurrence kept");
                continue;
            }
            match beam.polyline(epsilon) {
                Ok(line) => {
                    axes.order.push(beam.id.clone());
                    axes.lines.insert(beam.id.clone(), line);
                }
                Err(source) => {
                    let err = CorrelationError::DegenerateGeometry {
                        beam: beam.id.clone(),
                        source,
                    };
                    warn!(beam = %beam.id, error = %err, "beam skipped");
                    axes.failures.push(BeamFailure {
                        beam: beam.id.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        axes
    }

    /// Axis of `id`, if usable.
    pub fn get(&self, id: &str) -> Option<&Polyline> {
        self.lines.get(id)
    }

    /// Usable beams in provider order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Polyline)> {
        self.order
            .iter()
            .filter_map(|id| self.lines.get(id).map(|line| (id.as_str(), line)))
    }

    /// Number of usable beams.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// `true` when no beam is usable.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Beams left out for degenerate geometry.
    pub fn failures(&self) -> &[BeamFailure] {
        &self.failures
    }

    /// Moves the failure list out.
    pub fn take_failures(&mut self) -> Vec<BeamFailure> {
        std::mem::take(&mut self.failures)
    }
}

/// Raw "A rests on B at (x, y)" assertions, in provider order.
///
/// A `RestsOnBeam` node naming its host yields an assertion directly. One
/// naming no host is matched against the other usable axes in provider order,
/// and the first axis containing the node becomes the host.
pub fn extract_assertions(
    floor: &FloorGeometry,
    axes: &BeamAxes,
    resolver: &ArcResolver,
) -> Vec<RawAssertion> {
    let mut out = Vec::new();
    for beam in &floor.beams {
        for node in beam
            .nodes
            .iter()
            .filter(|n| n.crossing == CrossingKind::RestsOnBeam)
        {
            let position = node.point();
            let host = node.host.clone().or_else(|| {
                axes.iter()
                    .find(|(id, line)| *id != beam.id && resolver.contains(position, line))
                    .map(|(id, _)| id.to_owned())
            });
            match host {
                Some(host) => out.push(RawAssertion {
                    host,
                    supported: beam.id.clone(),
                    position,
                }),
                None => debug!(
                    beam = %beam.id,
                    x = position.x,
                    y = position.y,
                    "support node without host"
                ),
            }
        }
    }
    out
}
