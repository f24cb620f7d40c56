// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use girder_geom::GeomError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::report::ReportError;

/// Failures surfaced by the correlation engine.
///
/// Unmatched points, unconfirmed candidates and ambiguous demands are not
/// errors; they show up as absent values in the result.
#[derive(Debug, Error)]
pub enum CorrelationError {
    /// The geometry provider could not supply the floor. Fatal for the run.
    #[error("geometry unavailable for floor {floor:?}: {reason}")]
    GeometryUnavailable {
        /// Requested floor name.
        floor: String,
        /// Provider-side reason.
        reason: String,
    },
    /// The report could not be parsed. Fatal for the run.
    #[error("report parse failure: {0}")]
    ReportParse(#[from] ReportError),
    /// A beam axis is unusable. Fatal only for that beam.
    #[error("degenerate geometry for beam {beam}: {source}")]
    DegenerateGeometry {
        /// Beam identifier.
        beam: String,
        /// Underlying geometry error.
        #[source]
        source: GeomError,
    },
    /// Engine settings are invalid or could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CorrelationError {
    /// Builds a [`CorrelationError::GeometryUnavailable`].
    pub fn unavailable(floor: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::GeometryUnavailable {
            floor: floor.into(),
            reason: reason.into(),
        }
    }
}
