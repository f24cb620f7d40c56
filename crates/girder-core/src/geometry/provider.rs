// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory and JSON-file geometry providers.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use super::{FloorGeometry, GeometryProvider};
use crate::error::CorrelationError;

/// Normalises a floor name for matching: compatibility-decomposed (NFKD) with
/// combining marks dropped, lower case, `_` as space, runs of whitespace
/// collapsed.
pub fn normalize_floor_name(name: &str) -> String {
    let folded: String = name
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if c == '_' { ' ' } else { c })
        .flat_map(char::to_lowercase)
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Picks the floor matching `requested` among `floors`.
///
/// Exact normalised match first, then a prefix match in either direction;
/// the first candidate in `floors` order wins.
///
/// # Errors
/// [`CorrelationError::GeometryUnavailable`] listing the known floors.
pub fn resolve_floor<'a>(
    requested: &str,
    floors: &'a [FloorGeometry],
) -> Result<&'a FloorGeometry, CorrelationError> {
    let wanted = normalize_floor_name(requested);
    let names: Vec<String> = floors
        .iter()
        .map(|f| normalize_floor_name(&f.floor))
        .collect();
    let exact = names.iter().position(|n| *n == wanted);
    let found = exact.or_else(|| {
        if wanted.is_empty() {
            return None;
        }
        names
            .iter()
            .position(|n| !n.is_empty() && (n.starts_with(&wanted) || wanted.starts_with(n)))
    });
    if let Some(idx) = found {
        debug!(requested, matched = %floors[idx].floor, "floor resolved");
        return Ok(&floors[idx]);
    }
    let known: Vec<&str> = floors.iter().map(|f| f.floor.as_str()).collect();
    Err(CorrelationError::unavailable(
        requested,
        format!("no matching floor; available: [{}]", known.join(", ")),
    ))
}

/// Provider over snapshots held in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryGeometry {
    /// Floors in provider order.
    pub floors: Vec<FloorGeometry>,
}

impl InMemoryGeometry {
    /// Provider over `floors`.
    pub fn new(floors: Vec<FloorGeometry>) -> Self {
        Self { floors }
    }
}

impl GeometryProvider for InMemoryGeometry {
    fn load_floor(&self, floor: &str) -> Result<FloorGeometry, CorrelationError> {
        resolve_floor(floor, &self.floors).cloned()
    }
}

/// Provider reading a JSON document `{ "floors": [ ... ] }` on every load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonGeometry {
    path: PathBuf,
}

impl JsonGeometry {
    /// Provider backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self, floor: &str) -> Result<InMemoryGeometry, CorrelationError> {
        let bytes = std::fs::read(&self.path).map_err(|e| {
            CorrelationError::unavailable(floor, format!("{}: {e}", self.path.display()))
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            CorrelationError::unavailable(floor, format!("{}: {e}", self.path.display()))
        })
    }
}

impl GeometryProvider for JsonGeometry {
    fn load_floor(&self, floor: &str) -> Result<FloorGeometry, CorrelationError> {
        let doc = self.read(floor)?;
        doc.load_floor(floor)
    }
}
