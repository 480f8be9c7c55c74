//! Deriver Configuration
//!
//! JSON configuration for the derivation engine. Every field is optional:
//!
//! ```json
//! {
//!   "paths": { "legacy": "m/44'/60'/0'/0/0", "falcon": "m/44'/9000'/0'/0/0" },
//!   "checksum_addresses": false,
//!   "debug": false
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{SeedError, SeedResult};
use crate::wallet::{AddressStyle, PathTable};

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "PQ_SEED_CONFIG";

/// Environment variable carrying the BIP39 passphrase
pub const PASSPHRASE_ENV: &str = "PQ_SEED_PASSPHRASE";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeriverConfig {
    /// Algorithm to path mapping, in output order
    pub paths: PathTable,
    /// Render the legacy address in EIP-55 mixed case
    pub checksum_addresses: bool,
    /// Enable debug logging
    pub debug: bool,
}

impl DeriverConfig {
    /// Parse configuration text
    pub fn from_json_str(json: &str) -> SeedResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| SeedError::config_error(format!("invalid configuration: {}", e)))
    }

    /// Load configuration from a file
    pub fn load(path: impl AsRef<Path>) -> SeedResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            SeedError::config_error(format!("cannot read configuration: {}", e))
                .with_details(path.display().to_string())
        })?;
        Self::from_json_str(&text).map_err(|e| e.with_details(path.display().to_string()))
    }

    /// Load from an explicit path, else `PQ_SEED_CONFIG`, else defaults
    pub fn resolve(explicit: Option<&Path>) -> SeedResult<Self> {
        match config_path(explicit) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn address_style(&self) -> AddressStyle {
        AddressStyle::from_checksum_flag(self.checksum_addresses)
    }
}

fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| {
        std::env::var_os(CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::types::Algorithm;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = DeriverConfig::from_json_str("{}").unwrap();
        assert_eq!(config.paths, PathTable::standard());
        assert!(!config.checksum_addresses);
        assert!(!config.debug);
        assert_eq!(config.address_style(), AddressStyle::Lowercase);
    }

    #[test]
    fn test_custom_table_and_flags() {
        let config = DeriverConfig::from_json_str(
            r#"{"paths":{"falcon":"m/44'/9000'/3'/0/0"},"checksum_addresses":true}"#,
        )
        .unwrap();
        assert_eq!(config.paths.len(), 1);
        assert_eq!(config.paths.get(Algorithm::Falcon), Some("m/44'/9000'/3'/0/0"));
        assert_eq!(config.address_style(), AddressStyle::Checksum);
    }

    #[test]
    fn test_bad_config_is_config_error() {
        for text in [
            r#"{"paths":{"rsa":"m/0"}}"#,
            r#"{"paths":{"xmss":"m/0","xmss":"m/1"}}"#,
            r#"{"verbose":true}"#,
            "not json",
        ] {
            let err = DeriverConfig::from_json_str(text).unwrap_err();
            assert_eq!(err.code, ErrorCode::ConfigError, "{}", text);
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = DeriverConfig::load("/nonexistent/pq-seed.json").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);
        assert_eq!(err.details.as_deref(), Some("/nonexistent/pq-seed.json"));
    }
}
