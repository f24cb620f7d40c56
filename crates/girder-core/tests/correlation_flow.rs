// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! End-to-end correlation over in-memory and JSON geometry.

use std::io::Write;

use girder_core::{
    parse_report, BeamGeometry, BeamNode, CorrelationConfig, CorrelationError, Engine,
    FloorGeometry, GeometryProvider, InMemoryGeometry, JsonGeometry, Placement,
};

const LISTING: &str = "\
 Viga=  1  V1
 /B= 0.25 /H= 0.60
 Vao= 1  Xini= 0.00
 CISALHAMENTO-  Xi    Xf    Vsd   AsTrt  AsSus
 [tf,cm]       2.0   4.0   3.1   0.00   0.00
 Vao= 2  Xini= 10.00
 CISALHAMENTO-  Xi    Xf    Vsd   AsTrt  AsSus
 [tf,cm]       5.0   6.0   8.4   1.60   0.90
 Vao= 3
 AsTrt  Xi
 0.40   n/a

 Viga=  2  V2
 /B= 0.20 /H= 0.50
 REAC. APOIO
 No.   Maximos   Minimos   Largura   DEPEV   Morte   Nome
  1    6.10      4.20      0.20      0.14    2       V1
  2    5.00      3.00      0.20      0.14    0       P4

 Viga=  3  V3
 /B= 0.15 /H= 0.40
 REAC. APOIO
  1    2.00      1.00      0.15      0.14    2       V1
";

fn floor() -> FloorGeometry {
    let mut v2 = BeamGeometry::new("V2", &[(15.0, 40.0)]);
    v2.nodes.push(BeamNode::resting_on(15.0, 0.0, Some("V1")));
    let mut v3 = BeamGeometry::new("V3-A", &[(4.0, -30.0)]);
    v3.nodes.push(BeamNode::resting_on(4.0, 0.2, None));
    let mut v4 = BeamGeometry::new("V4", &[(19.6, 20.0)]);
    v4.nodes.push(BeamNode::resting_on(19.6, 0.0, Some("V1")));
    FloorGeometry {
        floor: "Pavimento Tipo".into(),
        beams: vec![
            BeamGeometry::new("V1", &[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]),
            v2,
            v3,
            v4,
            BeamGeometry::new("V9", &[(7.0, 7.0)]),
        ],
    }
}

fn engine() -> Engine {
    Engine::new(CorrelationConfig::default()).unwrap()
}

#[test]
fn demand_matches_nearest_confirmed_support() {
    let report = parse_report(LISTING).unwrap();
    let provider = InMemoryGeometry::new(vec![floor()]);
    let result = engine().correlate(&provider, "pavimento_tipo", &report).unwrap();

    assert_eq!(result.floor, "Pavimento Tipo");
    let hosted = result.hosted_by("V1");
    let supported: Vec<&str> = hosted.iter().map(|c| c.supported.as_str()).collect();
    // V4 has no report relation and is dropped.
    assert_eq!(supported, vec!["V2", "V3-A"]);

    let v2 = &hosted[0];
    assert!((v2.xi.unwrap() - 15.0).abs() < 1e-9);
    assert_eq!(v2.placement, Some(Placement::MidSpan));
    assert!((v2.bearing_width.unwrap() - 20.0).abs() < 1e-9);

    let v3 = &hosted[1];
    assert!((v3.xi.unwrap() - 4.0).abs() < 1e-9);
    assert!((v3.bearing_width.unwrap() - 15.0).abs() < 1e-9);

    // Span 1 has no tie demand; span 3 has one without a position.
    assert_eq!(result.demands.len(), 2);
    let first = &result.demands[0];
    assert!((first.demand.tie_area - 1.60).abs() < 1e-9);
    assert_eq!(first.support.as_ref().unwrap().supported, "V2");
    assert!(first.deviation.unwrap() < 1e-9);

    let second = &result.demands[1];
    assert_eq!(second.demand.local_xi, None);
    assert!(second.support.is_none());
    assert_eq!(result.unresolved_demands().count(), 1);
}

#[test]
fn degenerate_beam_is_reported_not_fatal() {
    let report = parse_report(LISTING).unwrap();
    let result = engine().correlate_floor(&floor(), &report);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].beam, "V9");
    assert_eq!(result.support_count(), 2);
}

#[test]
fn supports_rekey_by_supported_beam() {
    let report = parse_report(LISTING).unwrap();
    let result = engine().correlate_floor(&floor(), &report);
    let supports = result.supports();
    assert_eq!(supports.len(), 2);
    assert_eq!(supports["V2"][0].host, "V1");
    assert_eq!(supports["V3-A"][0].host, "V1");
    assert!(!supports.contains_key("V4"));
}

#[test]
fn json_provider_drives_the_same_run() {
    let doc = InMemoryGeometry::new(vec![floor()]);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string_pretty(&doc).unwrap().as_bytes())
        .unwrap();
    let provider = JsonGeometry::new(file.path());

    let result = engine()
        .correlate_report_text(&provider, "Pavimento", LISTING)
        .unwrap();
    assert_eq!(result.support_count(), 2);
}

#[test]
fn result_serializes_to_json() {
    let report = parse_report(LISTING).unwrap();
    let result = engine().correlate_floor(&floor(), &report);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["by_host"]["V1"][0]["placement"], "mid_span");
    let back: girder_core::CorrelationResult = serde_json::from_value(json).unwrap();
    assert_eq!(back.support_count(), result.support_count());
    assert_eq!(back.demands.len(), result.demands.len());
}

struct Offline;

impl GeometryProvider for Offline {
    fn load_floor(&self, floor: &str) -> Result<FloorGeometry, CorrelationError> {
        Err(CorrelationError::unavailable(floor, "modeler not running"))
    }
}

#[test]
fn unavailable_geometry_aborts_the_run() {
    let report = parse_report(LISTING).unwrap();
    let provider: &dyn GeometryProvider = &Offline;
    let err = engine().correlate(provider, "Tipo", &report).unwrap_err();
    assert!(err.to_string().contains("modeler not running"));
}
