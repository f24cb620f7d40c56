// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Structured view of an analysis report listing (RELGER-style).
//!
//! Every numeric field is optional: a missing or unreadable column is an
//! explicit `None`, never an implicit zero, and never fails the parse.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::DemandRecord;

mod tokenizer;

pub use tokenizer::parse_report;

/// "Morte" code for a reaction that bears on another beam.
pub const BEAM_ON_BEAM: i64 = 2;

/// Report parsing failures. Missing values are not failures.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The text contains no beam header at all.
    #[error("report contains no beam header (\"Viga=\")")]
    Empty,
    /// The report file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parsed report: beams in listing order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Report {
    /// Beam blocks in the order they appear.
    pub beams: Vec<ReportBeam>,
}

/// One beam block of the report.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportBeam {
    /// Beam identifier (e.g. `V801`, `V10-A`).
    pub id: String,
    /// Numeric beam number from the header.
    pub number: Option<u32>,
    /// Section width in metres.
    pub width_m: Option<f64>,
    /// Section height in metres.
    pub height_m: Option<f64>,
    /// Shear table rows, all spans.
    pub rows: Vec<ShearRow>,
    /// Support reactions table.
    pub reactions: Vec<Reaction>,
}

impl ReportBeam {
    /// Section width converted to centimetres (the geometry length unit).
    pub fn width_cm(&self) -> Option<f64> {
        self.width_m.map(|w| w * 100.0)
    }

    /// Beams this beam rests on, in reaction order (may repeat).
    pub fn rests_on(&self) -> impl Iterator<Item = &str> {
        self.reactions.iter().filter_map(Reaction::beam_support)
    }

    /// Rows carrying a tie demand strictly above `min_tie`, as demand records.
    pub fn demands(&self, min_tie: f64) -> impl Iterator<Item = DemandRecord> + '_ {
        self.rows
            .iter()
            .filter_map(move |row| {
                let tie = row.tie_area.filter(|t| *t > min_tie)?;
                Some(DemandRecord {
                    host: self.id.clone(),
                    span: row.span,
                    span_start_xi: row.span_start_xi,
                    local_xi: row.xi,
                    tie_area: tie,
                    suspension_area: row.suspension_area,
                })
            })
    }
}

/// One row of a shear ("CISALHAMENTO") table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShearRow {
    /// Span the row belongs to.
    pub span: Option<u32>,
    /// Span start on the beam axis, if the span marker gave one.
    pub span_start_xi: Option<f64>,
    /// Row start (span-relative).
    pub xi: Option<f64>,
    /// Row end (span-relative).
    pub xf: Option<f64>,
    /// Design shear.
    pub vsd: Option<f64>,
    /// Minimum stirrup area.
    pub asw_min: Option<f64>,
    /// Stirrup area for shear plus torsion.
    pub asw_ct: Option<f64>,
    /// Concentrated tie (hanger) area.
    pub tie_area: Option<f64>,
    /// Distributed suspension area.
    pub suspension_area: Option<f64>,
}

/// One row of a support reactions ("REAC. APOIO") table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Reaction {
    /// Support number.
    pub number: Option<u32>,
    /// Maximum reaction.
    pub max: Option<f64>,
    /// Minimum reaction.
    pub min: Option<f64>,
    /// Support width in metres.
    pub width_m: Option<f64>,
    /// Support kind code ("Morte"); [`BEAM_ON_BEAM`] means bearing on a beam.
    pub kind: Option<i64>,
    /// Name of the supporting element.
    pub support: Option<String>,
}

impl Reaction {
    /// The hosting beam, when this reaction bears on a beam.
    pub fn beam_support(&self) -> Option<&str> {
        if self.kind != Some(BEAM_ON_BEAM) {
            return None;
        }
        self.support.as_deref().filter(|name| looks_like_beam(name))
    }
}

/// Beam identifiers start with `V` and contain a digit.
pub fn looks_like_beam(name: &str) -> bool {
    name.starts_with('V') && name.chars().any(|c| c.is_ascii_digit())
}

impl Report {
    /// Reads and parses a latin-1 report file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let bytes = std::fs::read(path)?;
        parse_report(&decode_latin1(&bytes))
    }

    /// First beam block named exactly `id`.
    pub fn beam(&self, id: &str) -> Option<&ReportBeam> {
        self.beams.iter().find(|b| b.id == id)
    }

    /// All demand records, in report order.
    pub fn demands(&self, min_tie: f64) -> Vec<DemandRecord> {
        self.beams.iter().flat_map(|b| b.demands(min_tie)).collect()
    }
}

/// Decodes ISO-8859-1 bytes; every byte maps to the code point of equal value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_bytes_decode_accents() {
        assert_eq!(decode_latin1(b"Vo\xe3o"), "Voão");
    }

    #[test]
    fn only_beam_on_beam_reactions_name_hosts() {
        let beam = ReportBeam {
            id: "V808".into(),
            reactions: vec![
                Reaction {
                    kind: Some(0),
                    support: Some("P12".into()),
                    ..Reaction::default()
                },
                Reaction {
                    kind: Some(2),
                    support: Some("V801".into()),
                    ..Reaction::default()
                },
                Reaction {
                    kind: Some(2),
                    support: Some("PAREDE".into()),
                    ..Reaction::default()
                },
            ],
            ..ReportBeam::default()
        };
        assert_eq!(beam.rests_on().collect::<Vec<_>>(), vec!["V801"]);
    }

    #[test]
    fn demands_skip_rows_without_tie() {
        let beam = ReportBeam {
            id: "V801".into(),
            rows: vec![
                ShearRow {
                    xi: Some(0.0),
                    tie_area: Some(0.0),
                    ..ShearRow::default()
                },
                ShearRow {
                    xi: Some(500.0),
                    tie_area: Some(1.85),
                    span: Some(2),
                    span_start_xi: Some(400.0),
                    ..ShearRow::default()
                },
                ShearRow {
                    xi: Some(700.0),
                    tie_area: None,
                    ..ShearRow::default()
                },
            ],
            ..ReportBeam::default()
        };
        let demands: Vec<_> = beam.demands(0.0).collect();
        assert_eq!(demands.len(), 1);
        assert_eq!(demands[0].host, "V801");
        assert_eq!(demands[0].span, Some(2));
        assert_eq!(demands[0].target_xi(), Some(900.0));
    }
}
