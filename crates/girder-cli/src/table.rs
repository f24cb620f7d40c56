// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Human-readable tables.

use comfy_table::Table;
use girder_core::report::ReportBeam;
use girder_core::{CorrelationResult, Placement, Report};

fn num(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| format!("{v:.2}"))
}

fn placement(value: Option<Placement>) -> &'static str {
    match value {
        Some(Placement::BeamEnd) => "end",
        Some(Placement::MidSpan) => "mid-span",
        None => "-",
    }
}

/// One row per validated support.
pub fn supports(result: &CorrelationResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Host",
        "Supported",
        "Xi",
        "Placement",
        "Width",
        "Confirmed",
    ]);
    for candidate in result.by_host.values().flatten() {
        table.add_row(vec![
            candidate.host.clone(),
            candidate.supported.clone(),
            num(candidate.xi),
            placement(candidate.placement).to_owned(),
            num(candidate.bearing_width),
            if candidate.confirmed { "yes" } else { "no" }.to_owned(),
        ]);
    }
    table
}

fn rests_on(beam: &ReportBeam) -> String {
    let mut hosts: Vec<&str> = Vec::new();
    for host in beam.rests_on() {
        if !hosts.contains(&host) {
            hosts.push(host);
        }
    }
    if hosts.is_empty() {
        "-".to_owned()
    } else {
        hosts.join(", ")
    }
}

/// One row per report beam block; demands are rows with a tie area above `min_tie`.
pub fn report(report: &Report, min_tie: f64) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Beam", "B (cm)", "H (cm)", "Rows", "Demands", "Rests on"]);
    for beam in &report.beams {
        table.add_row(vec![
            beam.id.clone(),
            num(beam.width_cm()),
            num(beam.height_m.map(|h| h * 100.0)),
            beam.rows.len().to_string(),
            beam.demands(min_tie).count().to_string(),
            rests_on(beam),
        ]);
    }
    table
}
