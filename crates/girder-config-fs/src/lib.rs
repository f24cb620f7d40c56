// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem-backed `ConfigStore` for Girder tools (uses platform config dir).

use directories::ProjectDirs;
use girder_core::config::{ConfigError, ConfigStore};
use std::fs;
use std::path::{Path, PathBuf};

/// Store configs as JSON files under a base directory.
#[derive(Debug, Clone)]
pub struct FsConfigStore {
    base: PathBuf,
}

impl FsConfigStore {
    /// Create a store rooted at the user config directory (e.g., `~/.config/girder`).
    pub fn new() -> Result<Self, ConfigError> {
        let proj = ProjectDirs::from("dev", "flyingrobots", "Girder")
            .ok_or_else(|| ConfigError::Other("could not resolve config dir".into()))?;
        Self::with_base(proj.config_dir())
    }

    /// Create a store rooted at `base`, creating the directory if needed.
    pub fn with_base(base: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let base = base.as_ref().to_path_buf();
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.base.join(format!("{key}.json"))
    }
}

impl ConfigStore for FsConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let path = self.path_for(key);
        match fs::read(path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::NotFound),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use girder_core::config::CORRELATION_CONFIG_KEY;
    use girder_core::{ConfigService, CorrelationConfig};

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let service = ConfigService::new(FsConfigStore::with_base(dir.path()).unwrap());
        assert_eq!(
            service.load_correlation().unwrap(),
            CorrelationConfig::default()
        );
    }

    #[test]
    fn saved_config_lands_in_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsConfigStore::with_base(dir.path().join("nested")).unwrap();
        let path = store.path_for(CORRELATION_CONFIG_KEY);
        let service = ConfigService::new(store);

        let mut config = CorrelationConfig::default();
        config.tolerances.membership = 0.8;
        config.accept_unconfirmed_without_report = true;
        service.save(CORRELATION_CONFIG_KEY, &config).unwrap();

        assert!(path.exists());
        assert_eq!(service.load_correlation().unwrap(), config);
    }

    #[test]
    fn malformed_file_is_serde_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsConfigStore::with_base(dir.path()).unwrap();
        fs::write(store.path_for(CORRELATION_CONFIG_KEY), b"{ nope").unwrap();
        let service = ConfigService::new(store);
        assert!(matches!(
            service.load_correlation(),
            Err(ConfigError::Serde(_))
        ));
    }
}
