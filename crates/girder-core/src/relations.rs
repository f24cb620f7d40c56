// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Adapter from a parsed report to support relations.

use crate::model::ReportRelation;
use crate::report::Report;

/// One relation per report beam that rests on at least one beam.
///
/// Repeated blocks of the same beam are merged; hosts keep first-seen order
/// without duplicates. Relations come out in report order.
pub fn extract_relations(report: &Report) -> Vec<ReportRelation> {
    let mut out: Vec<ReportRelation> = Vec::new();
    for beam in &report.beams {
        let mut hosts = beam.rests_on().peekable();
        if hosts.peek().is_none() {
            continue;
        }
        let idx = if let Some(idx) = out.iter().position(|r| r.beam == beam.id) {
            idx
        } else {
            out.push(ReportRelation {
                beam: beam.id.clone(),
                supported_by: Vec::new(),
            });
            out.len() - 1
        };
        let relation = &mut out[idx];
        for host in hosts {
            if !relation.supported_by.iter().any(|h| h == host) {
                relation.supported_by.push(host.to_owned());
            }
        }
    }
    out
}
