// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config service, storage port and correlation settings.

use std::collections::BTreeMap;

use girder_geom::Tolerances;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// Logical key under which [`CorrelationConfig`] is stored.
pub const CORRELATION_CONFIG_KEY: &str = "correlation";

/// Storage port for raw config blobs (keyed by logical name).
pub trait ConfigStore {
    /// Load a raw config blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persist a raw config blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Values were loaded but fail validation.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}

/// Thin service that serializes config values and delegates storage to a `ConfigStore`.
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Create a new service using the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Load and deserialize a config value for `key`. Returns `Ok(None)` if missing.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        match self.store.load_raw(key) {
            Ok(bytes) => {
                if bytes.is_empty() {
                    return Ok(None);
                }
                let value = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            Err(ConfigError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Serialize and persist a config value for `key`.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }

    /// Loads the correlation settings, falling back to defaults when absent.
    ///
    /// Loaded settings are validated; a stored but invalid config is an error
    /// rather than a silent fallback.
    pub fn load_correlation(&self) -> Result<CorrelationConfig, ConfigError> {
        let config = self
            .load::<CorrelationConfig>(CORRELATION_CONFIG_KEY)?
            .unwrap_or_default();
        config.validate()?;
        Ok(config)
    }
}

/// Identifier aliasing rules shared by relation extraction and validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliasConfig {
    /// Suffixes that denote split variants of one physical beam (e.g. `-A`).
    pub suffixes: Vec<String>,
    /// Explicit aliases: base identifier → alternate identifiers.
    pub aliases: BTreeMap<String, Vec<String>>,
}

impl Default for AliasConfig {
    fn default() -> Self {
        Self {
            suffixes: vec!["-A".to_owned(), "-B".to_owned()],
            aliases: BTreeMap::new(),
        }
    }
}

/// Engine settings. Defaults reproduce the tolerances of the TQS tooling (cm).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Geometric tolerances (membership 0.5, beam end 1.0, degenerate 0.01).
    pub tolerances: Tolerances,
    /// Identifier aliasing.
    pub aliases: AliasConfig,
    /// Keep unconfirmed candidates (flagged `confirmed = false`) when the
    /// report carries no support relation at all.
    pub accept_unconfirmed_without_report: bool,
    /// Shear rows need a tie demand strictly above this to become demand records.
    pub min_tie_demand: f64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            aliases: AliasConfig::default(),
            accept_unconfirmed_without_report: false,
            min_tie_demand: 0.0,
        }
    }
}

impl CorrelationConfig {
    /// Checks tolerances and alias rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tolerances.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "tolerances must be finite and non-negative: {:?}",
                self.tolerances
            )));
        }
        if !self.min_tie_demand.is_finite() {
            return Err(ConfigError::Invalid(
                "min_tie_demand must be finite".to_owned(),
            ));
        }
        if let Some(bad) = self.aliases.suffixes.iter().find(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "alias suffix must not be blank: {bad:?}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemStore {
        blobs: RefCell<HashMap<String, Vec<u8>>>,
    }

    impl ConfigStore for MemStore {
        fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
            self.blobs
                .borrow()
                .get(key)
                .cloned()
                .ok_or(ConfigError::NotFound)
        }

        fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
            self.blobs.borrow_mut().insert(key.to_owned(), data.to_vec());
            Ok(())
        }
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let svc = ConfigService::new(MemStore::default());
        let cfg = svc.load_correlation().unwrap();
        assert_eq!(cfg, CorrelationConfig::default());
        assert!((cfg.tolerances.membership - 0.5).abs() < f64::EPSILON);
        assert!((cfg.tolerances.end - 1.0).abs() < f64::EPSILON);
        assert!((cfg.tolerances.degenerate - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn save_then_load_preserves_overrides() {
        let svc = ConfigService::new(MemStore::default());
        let mut cfg = CorrelationConfig::default();
        cfg.tolerances.membership = 1.25;
        cfg.aliases
            .aliases
            .insert("V10".to_owned(), vec!["V10X".to_owned()]);
        svc.save(CORRELATION_CONFIG_KEY, &cfg).unwrap();
        assert_eq!(svc.load_correlation().unwrap(), cfg);
    }

    #[test]
    fn partial_json_uses_field_defaults() {
        let cfg: CorrelationConfig =
            serde_json::from_str(r#"{ "tolerances": { "membership": 2.0 } }"#).unwrap();
        assert!((cfg.tolerances.membership - 2.0).abs() < f64::EPSILON);
        assert!((cfg.tolerances.end - 1.0).abs() < f64::EPSILON);
        assert_eq!(cfg.aliases.suffixes, vec!["-A", "-B"]);
    }

    #[test]
    fn invalid_stored_config_is_rejected() {
        let store = MemStore::default();
        store
            .save_raw(
                CORRELATION_CONFIG_KEY,
                br#"{ "tolerances": { "membership": -1.0 } }"#,
            )
            .unwrap();
        let err = ConfigService::new(store).load_correlation().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn blank_suffix_is_invalid() {
        let mut cfg = CorrelationConfig::default();
        cfg.aliases.suffixes.push("  ".to_owned());
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }
}
