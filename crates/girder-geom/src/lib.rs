// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
#![doc = r"Geometry primitives for Girder.

This crate provides:
- 2-D points (`Point2`) and beam axes as open polylines (`Polyline`) with
  cumulative arc lengths (Xi) per node.
- Point-to-segment projection (`project`) that reports containment within the
  segment's extent separately from perpendicular distance.
- Arc-length resolution (`ArcResolver`): where a point sits along a beam, in
  beam-global or span-local coordinates, and whether it bears at a beam end.

Design notes:
- Pure functions over immutable inputs; a `Polyline` is never mutated after
  construction and can be shared across threads by reference.
- Every comparison is tolerance based; tolerances live in `Tolerances` with the
  defaults used by the TQS exports (cm).
- Rustdoc is treated as part of the contract; public items are documented.
"]

mod error;
/// Point-to-segment projection.
pub mod projection;
/// Arc-length (Xi) resolution along polylines.
pub mod resolve;
/// Geometric tolerances.
pub mod tolerance;
/// Foundational geometric types.
pub mod types;

pub use error::GeomError;
pub use projection::{project, Projection};
pub use resolve::{ArcResolver, Location, Placement, SpanPosition};
pub use tolerance::Tolerances;
pub use types::point::Point2;
pub use types::polyline::{arc_lengths, Polyline, Segment};
