// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use thiserror::Error;

/// Errors raised while building beam geometry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeomError {
    /// A polyline needs at least two distinct nodes.
    #[error("degenerate geometry: {distinct} distinct node(s) out of {nodes}, need at least 2")]
    Degenerate {
        /// Number of nodes supplied.
        nodes: usize,
        /// Number of pairwise-distinct consecutive nodes found.
        distinct: usize,
    },
}
