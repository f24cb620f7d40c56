// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Correlation data model.
//!
//! Entities refer to beams by identifier only; geometry is looked up on demand
//! through [`crate::BeamAxes`], so host/supported pairs never own each other.

use std::collections::BTreeMap;

use girder_geom::{Placement, Point2};
use serde::{Deserialize, Serialize};

/// One "beam `supported` rests on beam `host` at `position`" claim from the geometry provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAssertion {
    /// Hosting beam.
    pub host: String,
    /// Beam resting on the host.
    pub supported: String,
    /// Plan position of the support node.
    pub position: Point2,
}

/// A deduplicated support claim, with its Xi on the host once resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportCandidate {
    /// Hosting beam.
    pub host: String,
    /// Supported beam.
    pub supported: String,
    /// Plan position of the support node.
    pub position: Point2,
    /// Arc length along the host, when the position lies on the host axis.
    pub xi: Option<f64>,
    /// Beam-end or mid-span bearing on the host.
    pub placement: Option<Placement>,
}

impl From<RawAssertion> for SupportCandidate {
    fn from(raw: RawAssertion) -> Self {
        Self {
            host: raw.host,
            supported: raw.supported,
            position: raw.position,
            xi: None,
            placement: None,
        }
    }
}

/// Report-side view of one beam: the beams the report says it rests on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRelation {
    /// The supported beam.
    pub beam: String,
    /// Hosting beams listed for it, first-seen order, no duplicates.
    pub supported_by: Vec<String>,
}

/// A candidate that survived cross-validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedCandidate {
    /// Hosting beam.
    pub host: String,
    /// Supported beam.
    pub supported: String,
    /// Plan position of the support node.
    pub position: Point2,
    /// Arc length along the host.
    pub xi: Option<f64>,
    /// Beam-end or mid-span bearing.
    pub placement: Option<Placement>,
    /// `true` when the report confirmed the relation.
    pub confirmed: bool,
    /// Width of the supported beam bearing on the host.
    pub bearing_width: Option<f64>,
}

impl ValidatedCandidate {
    /// Promotes a candidate; bearing width is attached later.
    pub fn from_candidate(candidate: SupportCandidate, confirmed: bool) -> Self {
        Self {
            host: candidate.host,
            supported: candidate.supported,
            position: candidate.position,
            xi: candidate.xi,
            placement: candidate.placement,
            confirmed,
            bearing_width: None,
        }
    }

    /// Downstream view of this support.
    pub fn link(&self) -> SupportLink {
        SupportLink {
            host: self.host.clone(),
            supported: self.supported.clone(),
            bearing_width: self.bearing_width,
            position: Some(self.position),
            xi: self.xi,
            placement: self.placement,
        }
    }
}

/// A tie-reinforcement demand the report places on a host beam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandRecord {
    /// Beam carrying the demand (the host of the support).
    pub host: String,
    /// Span number, when the report names one.
    pub span: Option<u32>,
    /// Arc length where the span starts on the host axis.
    pub span_start_xi: Option<f64>,
    /// Span-relative position of the demand.
    pub local_xi: Option<f64>,
    /// Concentrated tie area.
    pub tie_area: f64,
    /// Distributed suspension area, if reported.
    pub suspension_area: Option<f64>,
}

impl DemandRecord {
    /// Beam-global Xi of the demand; a missing span start counts as 0.
    pub fn target_xi(&self) -> Option<f64> {
        self.local_xi
            .map(|local| self.span_start_xi.unwrap_or(0.0) + local)
    }
}

/// What downstream sizing needs about one support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportLink {
    /// Hosting beam.
    pub host: String,
    /// Supported beam.
    pub supported: String,
    /// Effective bearing width.
    pub bearing_width: Option<f64>,
    /// Plan position, when known.
    pub position: Option<Point2>,
    /// Arc length along the host.
    pub xi: Option<f64>,
    /// Beam-end or mid-span bearing.
    pub placement: Option<Placement>,
}

/// A demand record with the support it was matched to, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandCorrelation {
    /// The demand as read from the report.
    pub demand: DemandRecord,
    /// Matched support; `None` when unresolved.
    pub support: Option<SupportLink>,
    /// `|candidate Xi - demand Xi|` for the chosen support, when both are known.
    pub deviation: Option<f64>,
}

/// A beam skipped because its geometry is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeamFailure {
    /// Beam identifier.
    pub beam: String,
    /// Human-readable reason.
    pub reason: String,
}

/// Output of one correlation run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CorrelationResult {
    /// Floor the run was made for.
    pub floor: String,
    /// Host beam → validated supports, in candidate order.
    pub by_host: BTreeMap<String, Vec<ValidatedCandidate>>,
    /// Demand records and their matched supports, in report order.
    pub demands: Vec<DemandCorrelation>,
    /// Beams excluded for degenerate geometry.
    pub failures: Vec<BeamFailure>,
}

impl CorrelationResult {
    /// Validated supports hosted by `host` (exact identifier).
    pub fn hosted_by(&self, host: &str) -> &[ValidatedCandidate] {
        self.by_host.get(host).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of validated supports.
    pub fn support_count(&self) -> usize {
        self.by_host.values().map(Vec::len).sum()
    }

    /// Supports keyed by supported beam. A beam absent from the map has no
    /// correlation and its geometric parameters must be supplied manually.
    pub fn supports(&self) -> BTreeMap<String, Vec<SupportLink>> {
        let mut out: BTreeMap<String, Vec<SupportLink>> = BTreeMap::new();
        for candidate in self.by_host.values().flatten() {
            out.entry(candidate.supported.clone())
                .or_default()
                .push(candidate.link());
        }
        out
    }

    /// Demand correlations left without a support.
    pub fn unresolved_demands(&self) -> impl Iterator<Item = &DemandCorrelation> {
        self.demands.iter().filter(|d| d.support.is_none())
    }
}
