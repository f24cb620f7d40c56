// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! girder-core: beam-on-beam support correlation.
//!
//! Combines two noisy sources, a CAD geometry snapshot and a text analysis
//! report, into a conservative map of which beam hosts which support, and at
//! what arc length along the host. Everything runs once per floor, single
//! threaded, over immutable inputs; the only output is a [`CorrelationResult`].
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::redundant_pub_crate
)]

/// Suffix-variant and explicit aliasing of beam identifiers.
pub mod alias;
/// Candidate aggregation and Xi resolution.
pub mod candidates;
/// Configuration service, storage port and engine settings.
pub mod config;
/// Disambiguation of demand records against validated supports.
pub mod disambiguate;
mod engine;
mod error;
/// Geometry provider port, floor snapshots and raw support assertions.
pub mod geometry;
mod model;
/// Relation extraction from parsed reports.
pub mod relations;
/// Tolerant tokenizer for analysis report listings.
pub mod report;
/// Cross-validation of geometry candidates against report relations.
pub mod validate;

pub use alias::AliasTable;
pub use config::{ConfigError, ConfigService, ConfigStore, CorrelationConfig};
pub use engine::Engine;
pub use error::CorrelationError;
pub use geometry::{
    BeamAxes, BeamGeometry, BeamNode, CrossingKind, FloorGeometry, GeometryProvider,
    InMemoryGeometry, JsonGeometry,
};
pub use model::{
    BeamFailure, CorrelationResult, DemandCorrelation, DemandRecord, RawAssertion,
    ReportRelation, SupportCandidate, SupportLink, ValidatedCandidate,
};
pub use report::{parse_report, Report, ReportBeam, ReportError};

pub use girder_geom::{Placement, Point2, Tolerances};
