// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Floor geometry snapshots and the provider port that supplies them.

use girder_geom::{GeomError, Point2, Polyline};
use serde::{Deserialize, Serialize};

use crate::error::CorrelationError;

mod axes;
mod provider;

pub use axes::{extract_assertions, BeamAxes};
pub use provider::{normalize_floor_name, resolve_floor, InMemoryGeometry, JsonGeometry};

/// Classification the provider attaches to a beam node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossingKind {
    /// Not classified.
    #[default]
    Undefined,
    /// Another beam rests on this one here.
    Receives,
    /// Beams cross without either bearing on the other.
    Crossing,
    /// This beam rests on another beam here.
    RestsOnBeam,
    /// This beam rests on a column here.
    RestsOnColumn,
    /// Plain interior node.
    Neutral,
}

/// One node of a beam axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamNode {
    /// Plan x.
    pub x: f64,
    /// Plan y.
    pub y: f64,
    /// Node classification.
    #[serde(default)]
    pub crossing: CrossingKind,
    /// Hosting beam, when the provider names it for a `RestsOnBeam` node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl BeamNode {
    /// Plain node at `(x, y)`.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            crossing: CrossingKind::Undefined,
            host: None,
        }
    }

    /// Node flagged as resting on `host`; `None` leaves the host to be detected.
    pub fn resting_on(x: f64, y: f64, host: Option<&str>) -> Self {
        Self {
            x,
            y,
            crossing: CrossingKind::RestsOnBeam,
            host: host.map(str::to_owned),
        }
    }

    /// Plan position.
    pub const fn point(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

/// A beam as drawn: identifier, section width and ordered axis nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamGeometry {
    /// Beam identifier.
    pub id: String,
    /// Section width in plan units, when the provider knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Axis nodes in drawing order.
    pub nodes: Vec<BeamNode>,
}

impl BeamGeometry {
    /// Beam with plain nodes at `points`.
    pub fn new(id: impl Into<String>, points: &[(f64, f64)]) -> Self {
        Self {
            id: id.into(),
            width: None,
            nodes: points.iter().map(|&(x, y)| BeamNode::at(x, y)).collect(),
        }
    }

    /// Node positions in order.
    pub fn points(&self) -> Vec<Point2> {
        self.nodes.iter().map(BeamNode::point).collect()
    }

    /// Axis polyline; fails when fewer than two distinct nodes remain.
    pub fn polyline(&self, epsilon: f64) -> Result<Polyline, GeomError> {
        Polyline::with_epsilon(self.points(), epsilon)
    }
}

/// All beams of one floor, in provider order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FloorGeometry {
    /// Floor name as the provider knows it.
    pub floor: String,
    /// Beams in provider order.
    pub beams: Vec<BeamGeometry>,
}

impl FloorGeometry {
    /// Beam named exactly `id`.
    pub fn beam(&self, id: &str) -> Option<&BeamGeometry> {
        self.beams.iter().find(|b| b.id == id)
    }
}

/// Port to whatever supplies beam geometry for a floor.
pub trait GeometryProvider {
    /// Loads the snapshot for `floor`.
    ///
    /// # Errors
    /// [`CorrelationError::GeometryUnavailable`] when the floor cannot be supplied.
    fn load_floor(&self, floor: &str) -> Result<FloorGeometry, CorrelationError>;
}

impl<P: GeometryProvider + ?Sized> GeometryProvider for &P {
    fn load_floor(&self, floor: &str) -> Result<FloorGeometry, CorrelationError> {
        (**self).load_floor(floor)
    }
}
