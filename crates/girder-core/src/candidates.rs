// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Candidate aggregation and arc-length resolution.

use girder_geom::ArcResolver;
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::geometry::BeamAxes;
use crate::model::{RawAssertion, SupportCandidate};

/// Collapses raw assertions to one candidate per `(host, supported)` pair.
///
/// The first assertion of each pair wins; output keeps input order.
pub fn aggregate<I>(raw: I) -> Vec<SupportCandidate>
where
    I: IntoIterator<Item = RawAssertion>,
{
    let mut seen: FxHashSet<(String, String)> = FxHashSet::default();
    let mut out = Vec::new();
    for assertion in raw {
        let key = (assertion.host.clone(), assertion.supported.clone());
        if seen.insert(key) {
            out.push(SupportCandidate::from(assertion));
        }
    }
    out
}

/// Fills each candidate's Xi and placement from its host axis.
///
/// Candidates whose host has no usable axis, or whose position lies off the
/// host axis, keep `xi = None`. Placement is classified whenever the host
/// axis exists.
pub fn resolve_positions(
    candidates: &mut [SupportCandidate],
    axes: &BeamAxes,
    resolver: &ArcResolver,
) {
    for candidate in candidates {
        let Some(line) = axes.get(&candidate.host) else {
            debug!(host = %candidate.host, supported = %candidate.supported, "host has no usable axis");
            continue;
        };
        candidate.xi = resolver.resolve_xi(candidate.position, line);
        candidate.placement = Some(resolver.placement(candidate.position, line));
        if candidate.xi.is_none() {
            debug!(
                host = %candidate.host,
                supported = %candidate.supported,
                "support position off host axis"
            );
        }
    }
}
