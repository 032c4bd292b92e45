use std::fs::File;
use std::io::read_to_string;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use mica_common::ProtocolVersion;

/// Well-known path of the account resource inside the state map. A fixed,
/// unexplained protocol value: treated as opaque configuration, never
/// derived.
pub const DEFAULT_ACCOUNT_RESOURCE_PATH: &str =
    "01296d2b26a8976ed85bbb78f1e8a7b424499a1a91a5189c9d2c36cda6d74a252d";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub account_resource_path: String,
    pub protocol_version: ProtocolVersion,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account_resource_path: DEFAULT_ACCOUNT_RESOURCE_PATH.to_string(),
            protocol_version: ProtocolVersion::V2,
        }
    }
}

impl Config {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !path.as_ref().is_file() {
            return Err(anyhow!("config file not found, or not a file"));
        }

        let config_file = File::open(path.as_ref())?;
        let config_str = read_to_string(config_file)?;
        let config = serde_yaml::from_str::<Config>(&config_str)?;
        Ok(config)
    }

    /// Raw path bytes used for the state map lookup.
    pub fn resource_path_bytes(&self) -> Result<Vec<u8>> {
        Ok(hex::decode(&self.account_resource_path)?)
    }
}

#[cfg(test)]
mod config_test {
    use super::*;

    #[test]
    fn default_config_test() {
        let config = Config::default();
        assert_eq!(config.protocol_version, ProtocolVersion::V2);
        // 0x01 tag byte plus a 32-byte hash.
        assert_eq!(config.resource_path_bytes().unwrap().len(), 33);
    }

    #[test]
    fn yaml_round_trip_test() {
        let yaml = "account_resource_path: \"00ff\"\nprotocol_version: V1\n";
        let config = serde_yaml::from_str::<Config>(yaml).unwrap();
        assert_eq!(config.account_resource_path, "00ff");
        assert_eq!(config.protocol_version, ProtocolVersion::V1);
        assert_eq!(config.resource_path_bytes().unwrap(), vec![0x00, 0xFF]);
    }
}
