// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Cross-validation of geometric candidates against report relations.
//!
//! A candidate `(host, supported)` survives only when the report lists, for
//! some alias of `supported`, a host that is an alias of `host`. Matching is
//! symmetric over the alias table: suffix variants and explicit aliases of
//! either beam count as the same beam.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::alias::AliasTable;
use crate::model::{ReportRelation, SupportCandidate, ValidatedCandidate};

/// Index of report relations by canonical beam identifier.
#[derive(Debug, Clone)]
pub struct CrossValidator<'a> {
    aliases: &'a AliasTable,
    hosts: FxHashMap<String, FxHashSet<String>>,
}

impl<'a> CrossValidator<'a> {
    /// Indexes `relations` under `aliases`.
    pub fn new(relations: &[ReportRelation], aliases: &'a AliasTable) -> Self {
        let mut hosts: FxHashMap<String, FxHashSet<String>> = FxHashMap::default();
        for relation in relations {
            let entry = hosts.entry(aliases.canonical(&relation.beam)).or_default();
            entry.extend(relation.supported_by.iter().map(|h| aliases.canonical(h)));
        }
        Self { aliases, hosts }
    }

    /// `true` when the report confirms `supported` rests on `host`.
    pub fn confirms(&self, host: &str, supported: &str) -> bool {
        self.hosts
            .get(&self.aliases.canonical(supported))
            .is_some_and(|hosts| hosts.contains(&self.aliases.canonical(host)))
    }

    /// Keeps confirmed candidates, in input order.
    pub fn validate(&self, candidates: Vec<SupportCandidate>) -> Vec<ValidatedCandidate> {
        candidates
            .into_iter()
            .filter_map(|candidate| {
                if self.confirms(&candidate.host, &candidate.supported) {
                    Some(ValidatedCandidate::from_candidate(candidate, true))
                } else {
                    debug!(
                        host = %candidate.host,
                        supported = %candidate.supported,
                        "candidate not confirmed by report; dropped"
                    );
                    None
                }
            })
            .collect()
    }
}

/// Convenience wrapper over [`CrossValidator`].
pub fn validate(
    candidates: Vec<SupportCandidate>,
    relations: &[ReportRelation],
    aliases: &AliasTable,
) -> Vec<ValidatedCandidate> {
    CrossValidator::new(relations, aliases).validate(candidates)
}

#[cfg(test)]
mod tests {
    use girder_geom::Point2;

    use super::*;

    fn candidate(host: &str, supported: &str) -> SupportCandidate {
        SupportCandidate {
            host: host.into(),
            supported: supported.into(),
            position: Point2::new(0.0, 0.0),
            xi: Some(1.0),
            placement: None,
        }
    }

    fn relation(beam: &str, hosts: &[&str]) -> ReportRelation {
        ReportRelation {
            beam: beam.into(),
            supported_by: hosts.iter().map(|h| (*h).to_owned()).collect(),
        }
    }

    #[test]
    fn unconfirmed_candidates_are_dropped_in_order() {
        let aliases = AliasTable::new(["-A", "-B"]);
        let out = validate(
            vec![
                candidate("V1", "V2"),
                candidate("V9", "V2"),
                candidate("V1", "V3"),
            ],
            &[relation("V2", &["V1"]), relation("V3", &["V1"])],
            &aliases,
        );
        let pairs: Vec<_> = out.iter().map(|c| (c.host.as_str(), c.supported.as_str())).collect();
        assert_eq!(pairs, vec![("V1", "V2"), ("V1", "V3")]);
        assert!(out.iter().all(|c| c.confirmed));
    }

    #[test]
    fn suffix_variants_match_both_ways() {
        let aliases = AliasTable::new(["-A", "-B"]);
        let validator = CrossValidator::new(&[relation("V10-A", &["V20"])], &aliases);
        assert!(validator.confirms("V20", "V10"));
        assert!(validator.confirms("V20-B", "V10-A"));
        assert!(!validator.confirms("V21", "V10"));

        let validator = CrossValidator::new(&[relation("V10", &["V20-A"])], &aliases);
        assert!(validator.confirms("V20", "V10-B"));
    }

    #[test]
    fn explicit_alias_confirms() {
        let aliases = AliasTable::new(["-A"]).with_alias("V5", "VT5");
        let validator = CrossValidator::new(&[relation("V1", &["VT5"])], &aliases);
        assert!(validator.confirms("V5", "V1"));
    }

    #[test]
    fn empty_relations_confirm_nothing() {
        let aliases = AliasTable::new(["-A"]);
        assert!(validate(vec![candidate("V1", "V2")], &[], &aliases).is_empty());
    }
}
