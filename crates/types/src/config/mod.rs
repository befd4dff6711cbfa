// Path: crates/types/src/config/mod.rs

//! Network profiles for the Gauntlet CLI.
//!
//! A profile lives in `networks/<name>.toml`. Environment variables override
//! the connection fields so CI can point one profile at a different node.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The artifact version that resolves contracts from local build directories.
pub const LOCAL_ARTIFACTS_VERSION: &str = "local";

/// Settings for wrapping commands into cw3 multisig proposals.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct MultisigConfig {
    /// The cw3 multisig contract address.
    pub address: String,
    /// Optional title prefix for proposals created by the CLI.
    #[serde(default)]
    pub title_prefix: Option<String>,
}

/// A network profile.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NetworkConfig {
    /// The profile name, filled from the file name when omitted.
    #[serde(default)]
    pub name: String,
    /// The Cosmos chain id.
    pub chain_id: String,
    /// The LCD/REST endpoint used for queries and event lookups.
    pub node_url: String,
    /// The signing gateway that signs, broadcasts and confirms transactions.
    #[serde(default = "default_signer_url")]
    pub signer_url: String,
    /// The gas price passed to the signer, e.g. `0.025ucosm`.
    #[serde(default = "default_gas_price")]
    pub gas_price: String,
    /// The release version to fetch contract artifacts from, or `local`.
    #[serde(default = "default_artifacts_version")]
    pub artifacts_version: String,
    /// The directory holding `<network>.json` code id files.
    #[serde(default = "default_code_ids_dir")]
    pub code_ids_dir: PathBuf,
    /// The multisig used by `multisig:` wrapped commands.
    #[serde(default)]
    pub multisig: Option<MultisigConfig>,
}

fn default_signer_url() -> String {
    "http://127.0.0.1:8080".to_string()
}
fn default_gas_price() -> String {
    "0.025ucosm".to_string()
}
fn default_artifacts_version() -> String {
    "v0.1.0".to_string()
}
fn default_code_ids_dir() -> PathBuf {
    PathBuf::from("./codeIds")
}

impl NetworkConfig {
    /// Loads `<dir>/<network>.toml` and applies environment overrides.
    pub fn load(dir: &Path, network: &str) -> Result<Self, ConfigError> {
        let path = dir.join(format!("{}.toml", network));
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let mut cfg = Self::from_toml(&raw).map_err(|e| match e {
            ConfigError::Parse { reason, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })?;
        if cfg.name.is_empty() {
            cfg.name = network.to_string();
        }
        cfg.apply_env_overrides(|k| std::env::var(k).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parses a profile from TOML text.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Overrides connection fields from `NODE_URL`, `SIGNER_URL` and `CHAIN_ID`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("NODE_URL") {
            self.node_url = v;
        }
        if let Some(v) = lookup("SIGNER_URL") {
            self.signer_url = v;
        }
        if let Some(v) = lookup("CHAIN_ID") {
            self.chain_id = v;
        }
    }

    /// Checks the fields that every command relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chain_id.trim().is_empty() {
            return Err(ConfigError::Invalid("chain_id must not be empty".into()));
        }
        for (field, url) in [("node_url", &self.node_url), ("signer_url", &self.signer_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be an http(s) URL, got '{}'",
                    field, url
                )));
            }
        }
        Ok(())
    }

    /// The code id file for this network.
    pub fn code_ids_path(&self) -> PathBuf {
        self.code_ids_dir.join(format!("{}.json", self.name))
    }
}
