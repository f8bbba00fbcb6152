//! Optional RON configuration for the `flipscout` binary.
//!
//! Every field has a default, so a config file only lists what it changes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use scout_core::{Catalog, MarketplaceDescriptor, OpenStrategy, SessionSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

pub const CONFIG_FILENAME: &str = "flipscout.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("config {path:?} overrides the catalog with no marketplaces")]
    EmptyCatalog { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    pub strategy: OpenStrategy,
    pub throttle_ms: u64,
    pub grace_ms: u64,
    pub base_address: String,
    pub links_only: bool,
    pub log: LogDestination,
    pub analytics_endpoint: Option<String>,
    /// Replaces the built-in marketplace list when present.
    pub catalog: Option<Vec<MarketplaceDescriptor>>,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        let session = SessionSettings::default();
        Self {
            strategy: session.strategy,
            throttle_ms: duration_ms(session.throttle),
            grace_ms: duration_ms(session.grace),
            base_address: session.base_address,
            links_only: session.links_only,
            log: LogDestination::default(),
            analytics_endpoint: None,
            catalog: None,
        }
    }
}

impl ScoutConfig {
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            strategy: self.strategy,
            throttle: Duration::from_millis(self.throttle_ms),
            grace: Duration::from_millis(self.grace_ms),
            links_only: self.links_only,
            base_address: self.base_address.clone(),
        }
    }

    pub fn catalog(&self) -> Catalog {
        match &self.catalog {
            Some(descriptors) => Catalog::new(descriptors.clone()),
            None => Catalog::builtin(),
        }
    }
}

/// A loaded config and the file it came from, if any.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: ScoutConfig,
    pub source: Option<PathBuf>,
}

/// Loads `explicit` if given, otherwise `./flipscout.ron` when it exists.
pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    load_from(explicit, Path::new(CONFIG_FILENAME))
}

fn load_from(explicit: Option<&Path>, fallback: &Path) -> Result<LoadedConfig, ConfigError> {
    let (path, required) = match explicit {
        Some(path) => (path, true),
        None => (fallback, false),
    };

    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
            return Ok(LoadedConfig {
                config: ScoutConfig::default(),
                source: None,
            });
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config: ScoutConfig = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if config.catalog.as_ref().is_some_and(Vec::is_empty) {
        return Err(ConfigError::EmptyCatalog {
            path: path.to_path_buf(),
        });
    }

    Ok(LoadedConfig {
        config,
        source: Some(path.to_path_buf()),
    })
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scout_core::MarketplaceId;
    use tempfile::TempDir;

    fn write(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn missing_default_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = load_from(None, &dir.path().join(CONFIG_FILENAME)).unwrap();

        assert_eq!(loaded.config, ScoutConfig::default());
        assert!(loaded.source.is_none());
        assert_eq!(loaded.config.session_settings(), SessionSettings::default());
        assert_eq!(loaded.config.catalog(), Catalog::builtin());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.ron");

        let err = load_from(Some(&missing), Path::new(CONFIG_FILENAME)).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            r#"(
                strategy: hand_off,
                throttle_ms: 1500,
                log: both,
                analytics_endpoint: Some("http://localhost:8080/collect"),
            )"#,
        );

        let loaded = load_from(Some(&path), Path::new(CONFIG_FILENAME)).unwrap();
        let settings = loaded.config.session_settings();

        assert_eq!(loaded.source, Some(path));
        assert_eq!(settings.strategy, OpenStrategy::HandOff);
        assert_eq!(settings.throttle, Duration::from_millis(1500));
        assert_eq!(settings.grace, Duration::from_millis(500));
        assert_eq!(settings.base_address, "https://flipscoutly.com/");
        assert_eq!(loaded.config.log, LogDestination::Both);
        assert_eq!(
            loaded.config.analytics_endpoint.as_deref(),
            Some("http://localhost:8080/collect")
        );
    }

    #[test]
    fn fallback_file_is_picked_up() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "(links_only: true)");

        let loaded = load_from(None, &path).unwrap();
        assert!(loaded.config.links_only);
        assert_eq!(loaded.source, Some(path));
    }

    #[test]
    fn catalog_override_replaces_builtin() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            r#"(
                catalog: Some([
                    (
                        id: ebay,
                        name: "eBay",
                        icon: "/img/ebay.png",
                        template: "https://www.ebay.com/sch/i.html?_nkw=|STRING|",
                        price_params: (min: Some("_udlo"), max: Some("_udhi")),
                    ),
                ]),
            )"#,
        );

        let catalog = load_from(Some(&path), Path::new(CONFIG_FILENAME))
            .unwrap()
            .config
            .catalog();
        let ids: Vec<MarketplaceId> = catalog.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![MarketplaceId::Ebay]);
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "(catalog: Some([]))");

        let err = load_from(Some(&path), Path::new(CONFIG_FILENAME)).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyCatalog { .. }));
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "(throttle_ms: \"soon\")");

        let err = load_from(Some(&path), Path::new(CONFIG_FILENAME)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
