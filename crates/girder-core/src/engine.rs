// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Correlation orchestrator.

use std::collections::BTreeMap;

use girder_geom::ArcResolver;
use tracing::{debug, info, instrument};

use crate::alias::AliasTable;
use crate::candidates::{aggregate, resolve_positions};
use crate::config::CorrelationConfig;
use crate::disambiguate::select;
use crate::error::CorrelationError;
use crate::geometry::{extract_assertions, BeamAxes, FloorGeometry, GeometryProvider};
use crate::model::{CorrelationResult, DemandCorrelation, DemandRecord, ValidatedCandidate};
use crate::relations::extract_relations;
use crate::report::{parse_report, Report};
use crate::validate::CrossValidator;

/// Runs one floor's correlation with fixed settings.
///
/// The engine holds no per-run state; the same instance can correlate any
/// number of floors.
#[derive(Debug, Clone)]
pub struct Engine {
    config: CorrelationConfig,
    aliases: AliasTable,
    resolver: ArcResolver,
}

impl Engine {
    /// Builds an engine.
    ///
    /// # Errors
    /// [`CorrelationError::Config`] when the settings fail validation.
    pub fn new(config: CorrelationConfig) -> Result<Self, CorrelationError> {
        config.validate()?;
        Ok(Self {
            aliases: AliasTable::from_config(&config.aliases),
            resolver: ArcResolver::new(config.tolerances),
            config,
        })
    }

    /// Loads `floor` from `provider` and correlates it with `report`.
    ///
    /// # Errors
    /// [`CorrelationError::GeometryUnavailable`] when the provider cannot
    /// supply the floor. Per-beam problems never fail the run.
    #[instrument(skip(self, provider, report), fields(beams = report.beams.len()))]
    pub fn correlate<G>(
        &self,
        provider: &G,
        floor: &str,
        report: &Report,
    ) -> Result<CorrelationResult, CorrelationError>
    where
        G: GeometryProvider + ?Sized,
    {
        let geometry = provider.load_floor(floor)?;
        Ok(self.correlate_floor(&geometry, report))
    }

    /// Parses `text` as a report listing, then correlates like [`Engine::correlate`].
    ///
    /// # Errors
    /// [`CorrelationError::ReportParse`] for a listing without beams, plus the
    /// errors of [`Engine::correlate`].
    pub fn correlate_report_text<G>(
        &self,
        provider: &G,
        floor: &str,
        text: &str,
    ) -> Result<CorrelationResult, CorrelationError>
    where
        G: GeometryProvider + ?Sized,
    {
        let report = parse_report(text)?;
        self.correlate(provider, floor, &report)
    }

    /// Correlates an already loaded floor snapshot.
    pub fn correlate_floor(
        &self,
        geometry: &FloorGeometry,
        report: &Report,
    ) -> CorrelationResult {
        let mut axes = BeamAxes::build(geometry, self.config.tolerances.degenerate);

        let raw = extract_assertions(geometry, &axes, &self.resolver);
        let raw_count = raw.len();
        let mut candidates = aggregate(raw);
        resolve_positions(&mut candidates, &axes, &self.resolver);

        let relations = extract_relations(report);
        let keep_unconfirmed =
            relations.is_empty() && self.config.accept_unconfirmed_without_report;
        let mut validated: Vec<ValidatedCandidate> = if keep_unconfirmed {
            debug!("report lists no supports; keeping candidates unconfirmed");
            candidates
                .into_iter()
                .map(|c| ValidatedCandidate::from_candidate(c, false))
                .collect()
        } else {
            CrossValidator::new(&relations, &self.aliases).validate(candidates)
        };

        for candidate in &mut validated {
            candidate.bearing_width = self.bearing_width(&candidate.supported, geometry, report);
        }

        let demands = report
            .demands(self.config.min_tie_demand)
            .into_iter()
            .map(|demand| self.match_demand(demand, &validated))
            .collect::<Vec<_>>();

        let mut by_host: BTreeMap<String, Vec<ValidatedCandidate>> = BTreeMap::new();
        for candidate in validated {
            by_host
                .entry(candidate.host.clone())
                .or_default()
                .push(candidate);
        }

        let result = CorrelationResult {
            floor: geometry.floor.clone(),
            by_host,
            demands,
            failures: axes.take_failures(),
        };
        info!(
            floor = %result.floor,
            assertions = raw_count,
            relations = relations.len(),
            supports = result.support_count(),
            demands = result.demands.len(),
            unresolved = result.unresolved_demands().count(),
            failures = result.failures.len(),
            "correlation complete"
        );
        result
    }

    /// Report width of the supported beam (metres to cm), else the provider width.
    fn bearing_width(
        &self,
        supported: &str,
        geometry: &FloorGeometry,
        report: &Report,
    ) -> Option<f64> {
        report
            .beam(supported)
            .or_else(|| {
                report
                    .beams
                    .iter()
                    .find(|b| self.aliases.same_beam(&b.id, supported))
            })
            .and_then(|b| b.width_cm())
            .or_else(|| geometry.beam(supported).and_then(|b| b.width))
    }

    fn match_demand(
        &self,
        demand: DemandRecord,
        validated: &[ValidatedCandidate],
    ) -> DemandCorrelation {
        let hosted = validated
            .iter()
            .filter(|c| self.aliases.same_beam(&c.host, &demand.host));
        let selection = select(hosted, demand.target_xi());
        if selection.is_none() {
            debug!(
                host = %demand.host,
                span = ?demand.span,
                xi = ?demand.local_xi,
                "demand left unresolved"
            );
        }
        DemandCorrelation {
            support: selection.map(|s| s.candidate.link()),
            deviation: selection.and_then(|s| s.deviation),
            demand,
        }
    }
}
