// ============================================
// File: crates/swapwire-node/src/config.rs
// ============================================
//! # Node Configuration
//!
//! ## Creation Reason
//! Provides configuration management for a swapwire node, loaded from
//! a TOML file with defaults for every field.
//!
//! ## Main Functionality
//! - `NodeConfig`: Main configuration structure
//! - TOML file loading and parsing
//! - Configuration validation naming the offending field
//!
//! ## Configuration Sections
//! - `keystore`: Key file path (empty keeps keys in memory only)
//! - `p2p`: Room name and inbound size limit
//! - `logging`: Log level
//!
//! ## Example Configuration
//! ```toml
//! [keystore]
//! path = "/var/lib/swapwire/keys.json"
//!
//! [p2p]
//! room = "swapwire-offers"
//! max_message_bytes = 65536
//!
//! [logging]
//! level = "info"
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Config changes require a restart
//! - `RUST_LOG` overrides `logging.level`
//!
//! ## Last Modified
//! v0.1.0 - Initial configuration implementation

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{NodeError, Result};

// ============================================
// Constants
// ============================================

/// Smallest accepted `p2p.max_message_bytes`.
pub const MIN_MESSAGE_BYTES: usize = 1024;

/// Largest accepted `p2p.max_message_bytes`.
pub const MAX_MESSAGE_BYTES: usize = 1_048_576;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

// ============================================
// NodeConfig
// ============================================

/// Main node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Key store configuration.
    #[serde(default)]
    pub keystore: KeyStoreConfig,

    /// Peer room configuration.
    #[serde(default)]
    pub p2p: P2pConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl NodeConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, parsed or validated.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        info!(path = %path_str, "Loading configuration");

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| NodeError::config_load(&path_str, e.to_string()))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| NodeError::config_load(&path_str, e.to_string()))?;

        config.validate()?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Loads configuration from a string.
    ///
    /// # Errors
    /// Returns error if the string cannot be parsed or validated.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| NodeError::config_load("<string>", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// `ConfigInvalid` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        self.p2p.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Serializes configuration to TOML string.
    #[must_use]
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Returns the key file path, or `None` for an in-memory store.
    #[must_use]
    pub fn keystore_path(&self) -> Option<PathBuf> {
        let path = self.keystore.path.trim();
        (!path.is_empty()).then(|| PathBuf::from(path))
    }
}

// ============================================
// KeyStoreConfig
// ============================================

/// Key store configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyStoreConfig {
    /// Path to the JSON key file. Empty means in-memory only.
    #[serde(default = "default_keystore_path")]
    pub path: String,
}

fn default_keystore_path() -> String {
    "swapwire-keys.json".to_string()
}

impl Default for KeyStoreConfig {
    fn default() -> Self {
        Self {
            path: default_keystore_path(),
        }
    }
}

// ============================================
// P2pConfig
// ============================================

/// Peer room configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct P2pConfig {
    /// Room (topic) carrying swap messages.
    #[serde(default = "default_room")]
    pub room: String,

    /// Inbound strings larger than this are skipped.
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,
}

fn default_room() -> String {
    "swapwire-offers".to_string()
}

fn default_max_message_bytes() -> usize {
    64 * 1024
}

impl P2pConfig {
    fn validate(&self) -> Result<()> {
        if self.room.trim().is_empty() {
            return Err(NodeError::config_invalid("p2p.room", "cannot be empty"));
        }

        if self.max_message_bytes < MIN_MESSAGE_BYTES {
            return Err(NodeError::config_invalid(
                "p2p.max_message_bytes",
                format!("must be at least {MIN_MESSAGE_BYTES}"),
            ));
        }

        if self.max_message_bytes > MAX_MESSAGE_BYTES {
            return Err(NodeError::config_invalid(
                "p2p.max_message_bytes",
                format!("cannot exceed {MAX_MESSAGE_BYTES}"),
            ));
        }

        Ok(())
    }
}

impl Default for P2pConfig {
    fn default() -> Self {
        Self {
            room: default_room(),
            max_message_bytes: default_max_message_bytes(),
        }
    }
}

// ============================================
// LoggingConfig
// ============================================

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LoggingConfig {
    fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.level.as_str()) {
            return Err(NodeError::config_invalid(
                "logging.level",
                format!("must be one of {}", LOG_LEVELS.join(", ")),
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NodeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.p2p.max_message_bytes, 65536);
        assert_eq!(
            config.keystore_path(),
            Some(PathBuf::from("swapwire-keys.json"))
        );
    }

    #[test]
    fn test_full_config_format() {
        let toml = r#"
            [keystore]
            path = "/var/lib/swapwire/keys.json"

            [p2p]
            room = "swaps-testnet"
            max_message_bytes = 4096

            [logging]
            level = "debug"
        "#;

        let config = NodeConfig::from_str(toml).unwrap();
        assert_eq!(config.p2p.room, "swaps-testnet");
        assert_eq!(config.p2p.max_message_bytes, 4096);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = NodeConfig::from_str("[logging]\nlevel = \"warn\"\n").unwrap();
        assert_eq!(config.p2p, P2pConfig::default());
        assert_eq!(config.keystore, KeyStoreConfig::default());
    }

    #[test]
    fn test_empty_keystore_path_is_in_memory() {
        let config = NodeConfig::from_str("[keystore]\npath = \"\"\n").unwrap();
        assert!(config.keystore_path().is_none());
    }

    #[test]
    fn test_validation_names_field() {
        let err = NodeConfig::from_str("[p2p]\nroom = \"\"\n").unwrap_err();
        assert!(matches!(err, NodeError::ConfigInvalid { ref field, .. } if field == "p2p.room"));

        let err = NodeConfig::from_str("[p2p]\nmax_message_bytes = 10\n").unwrap_err();
        assert!(
            matches!(err, NodeError::ConfigInvalid { ref field, .. } if field == "p2p.max_message_bytes")
        );

        let err = NodeConfig::from_str("[p2p]\nmax_message_bytes = 2000000\n").unwrap_err();
        assert!(matches!(err, NodeError::ConfigInvalid { .. }));

        let err = NodeConfig::from_str("[logging]\nlevel = \"loud\"\n").unwrap_err();
        assert!(
            matches!(err, NodeError::ConfigInvalid { ref field, .. } if field == "logging.level")
        );
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = NodeConfig::default();
        let restored = NodeConfig::from_str(&config.to_toml()).unwrap();
        assert_eq!(config, restored);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("node.toml");
        tokio::fs::write(&path, "[p2p]\nroom = \"local\"\n").await.unwrap();

        let config = NodeConfig::load(&path).await.unwrap();
        assert_eq!(config.p2p.room, "local");

        let missing = NodeConfig::load(dir.path().join("absent.toml")).await;
        assert!(matches!(missing, Err(NodeError::ConfigLoad { .. })));
    }
}
