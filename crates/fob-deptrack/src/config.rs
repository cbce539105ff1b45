//! Tracker configuration with multi-source loading.
//!
//! Priority: environment (`FOB_DEPTRACK_*`) > config file > defaults

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};
use crate::host::BuildMode;

/// Default config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "fob-deptrack.toml";

/// Prefix for environment overrides, e.g. `FOB_DEPTRACK_SNAPSHOT_PATH`.
pub const ENV_PREFIX: &str = "FOB_DEPTRACK_";

/// Keys read from the environment. Other `FOB_DEPTRACK_*` variables are
/// left alone.
const ENV_KEYS: [&str; 4] = ["ignore", "snapshot_path", "log_path", "persist_modes"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    /// Glob patterns for files excluded from tracking.
    pub ignore: Vec<String>,

    /// Where the snapshot is written, relative to the working directory.
    pub snapshot_path: PathBuf,

    /// Append-only failure log, relative to the working directory.
    pub log_path: PathBuf,

    /// Build modes whose passes are persisted.
    pub persist_modes: Vec<BuildMode>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            ignore: Vec::new(),
            snapshot_path: PathBuf::from("dependency-graph.json"),
            log_path: PathBuf::from("dependency-tracker.log"),
            persist_modes: vec![BuildMode::Development],
        }
    }
}

impl TrackerConfig {
    /// Load configuration from defaults, a TOML file and the environment.
    ///
    /// Without an explicit path, `fob-deptrack.toml` in the working directory
    /// is used when present. An explicit path that does not exist is an error.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let figment = Self::figment(config_path)?;
        Ok(figment.extract()?)
    }

    /// The merged provider chain, before extraction.
    pub fn figment(config_path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = match config_path {
            Some(path) if !path.exists() => {
                return Err(TrackerError::ConfigNotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default_path = Path::new(CONFIG_FILE_NAME);
                default_path.exists().then(|| default_path.to_path_buf())
            }
        };

        if let Some(path) = config_file {
            tracing::debug!("Loading tracker config from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX).only(&ENV_KEYS)))
    }

    /// Whether a pass in `mode` should be persisted.
    pub fn should_persist(&self, mode: BuildMode) -> bool {
        self.persist_modes.contains(&mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_apply_without_sources() {
        Jail::expect_with(|_jail| {
            let config = TrackerConfig::load(None).expect("defaults load");
            assert_eq!(config, TrackerConfig::default());
            assert!(config.should_persist(BuildMode::Development));
            assert!(!config.should_persist(BuildMode::Production));
            Ok(())
        });
    }

    #[test]
    fn file_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE_NAME,
                r#"
ignore = ["**/node_modules/**", "**/*.css"]
snapshot_path = ".fob/deps.json"
persist_modes = ["development", "production"]
"#,
            )?;
            jail.set_env("FOB_DEPTRACK_LOG_PATH", ".fob/errors.log");

            let config = TrackerConfig::load(None).expect("config loads");
            assert_eq!(config.ignore.len(), 2);
            assert_eq!(config.snapshot_path, PathBuf::from(".fob/deps.json"));
            assert_eq!(config.log_path, PathBuf::from(".fob/errors.log"));
            assert!(config.should_persist(BuildMode::Production));
            Ok(())
        });
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = TrackerConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, TrackerError::ConfigNotFound(_)));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "ignroe = [\"x\"]")?;
            let result = TrackerConfig::load(Some(Path::new("custom.toml")));
            assert!(matches!(result, Err(TrackerError::Config(_))));
            Ok(())
        });
    }

    #[test]
    fn unrelated_env_vars_are_not_config() {
        Jail::expect_with(|jail| {
            jail.set_env("FOB_DEPTRACK_VERBOSE", "1");
            jail.set_env("FOB_DEPTRACK_SNAPSHOT_PATH", "out/deps.json");

            let config = TrackerConfig::load(None).expect("stray variable is ignored");
            assert_eq!(config.snapshot_path, PathBuf::from("out/deps.json"));
            Ok(())
        });
    }
}
