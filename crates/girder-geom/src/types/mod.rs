// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Core geometry types used by the correlation engine (points, beam axes).
//!
//! Coordinates are plan-view `f64` values in the exporter's length unit.
//! Nothing here allocates after construction; derived data (arc lengths) is
//! computed once when a `Polyline` is built.

#[doc = "2-D points and vector helpers."]
pub mod point;
#[doc = "Open polylines with cumulative arc lengths."]
pub mod polyline;
