//! `pricesync.toml`: persisted sync settings.
//!
//! # Example
//!
//! ```toml
//! [sync]
//! activated = true
//! read_only = false
//! outbox = "outbox"
//! ```
//!
//! Every key is optional. When no `--config` is given and `./pricesync.toml`
//! does not exist, the defaults above apply.

use std::path::{Path, PathBuf};

use pricesync_writeback::SyncGate;
use serde::Deserialize;

pub(crate) const DEFAULT_CONFIG_FILE: &str = "pricesync.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    pub sync: SyncSettings,
}

/// `[sync]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SyncSettings {
    /// Consent to write back at all.
    pub activated: bool,
    /// Kill switch; when set no payload leaves the process.
    pub read_only: bool,
    /// Directory the outbox writer drops payloads into.
    pub outbox: PathBuf,
}

impl Default for SyncSettings {
    fn default() -> Self {
        let gate = SyncGate::default();
        SyncSettings {
            activated: gate.activated,
            read_only: gate.read_only,
            outbox: PathBuf::from("outbox"),
        }
    }
}

impl SyncSettings {
    pub fn gate(&self) -> SyncGate {
        SyncGate {
            activated: self.activated,
            read_only: self.read_only,
        }
    }
}

/// Load the configuration. An explicit path must exist; the default file
/// is optional.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<Config, String> {
    match explicit {
        Some(path) => read_config(path),
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.exists() {
                read_config(path)
            } else {
                tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                Ok(Config::default())
            }
        }
    }
}

fn read_config(path: &Path) -> Result<Config, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;
    let config: Config = toml::from_str(&content)
        .map_err(|e| format!("could not parse '{}': {}", path.display(), e))?;
    tracing::debug!(path = %path.display(), ?config, "loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.sync.activated);
        assert!(!config.sync.read_only);
        assert_eq!(config.sync.outbox, PathBuf::from("outbox"));
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str("[sync]\nread_only = true\n").unwrap();
        assert!(config.sync.activated);
        assert!(config.sync.read_only);
        assert_eq!(
            config.sync.gate(),
            SyncGate {
                activated: true,
                read_only: true
            }
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = toml::from_str::<Config>("[sync]\nreadonly = true\n").unwrap_err();
        assert!(err.to_string().contains("readonly"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = load_config(Some(&missing)).unwrap_err();
        assert!(err.starts_with("could not read"));
    }

    #[test]
    fn explicit_file_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pricesync.toml");
        std::fs::write(&path, "[sync]\nactivated = false\noutbox = \"drop\"\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert!(!config.sync.activated);
        assert_eq!(config.sync.outbox, PathBuf::from("drop"));
    }
}
