// Path: crates/contracts/src/artifacts/mod.rs
//! The contract registry: which contracts exist and where their bytecode lives.
//!
//! Plugin contracts are published as release assets of the plugin-cosmos
//! repository, cw-plus contracts as release assets of cw-plus. The `local`
//! version reads `<id>.wasm` from the build output directories instead.

use async_trait::async_trait;
use gauntlet_api::artifacts::ArtifactSource;
use gauntlet_types::config::LOCAL_ARTIFACTS_VERSION;
use gauntlet_types::error::ArtifactError;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

/// The cw-plus release the cw20/cw3/cw4 contracts are fetched from.
pub const CW_PLUS_VERSION: &str = "v0.13.4";

const PLUGIN_RELEASES: &str = "https://github.com/goplugin/plugin-cosmos/releases/download";
const CW_PLUS_RELEASES: &str = "https://github.com/CosmWasm/cw-plus/releases/download";
const LOCAL_SEARCH_PATHS: [&str; 3] = [
    "./artifacts",
    "./artifacts/bin",
    "./tests/e2e/common_artifacts",
];

/// A contract the CLI can upload and deploy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContractId {
    /// `flags`
    Flags,
    /// `deviation_flagging_validator`
    DeviationFlaggingValidator,
    /// `ocr2`
    Ocr2,
    /// `proxy_ocr2`
    ProxyOcr2,
    /// `access_controller`
    AccessController,
    /// `cw20_base`, the token contract.
    Cw20Base,
    /// `cw3_flex_multisig`
    Cw3FlexMultisig,
    /// `cw4_group`
    Cw4Group,
}

impl ContractId {
    /// Every contract, in upload order.
    pub const ALL: [ContractId; 8] = [
        ContractId::Flags,
        ContractId::DeviationFlaggingValidator,
        ContractId::Ocr2,
        ContractId::ProxyOcr2,
        ContractId::AccessController,
        ContractId::Cw20Base,
        ContractId::Cw3FlexMultisig,
        ContractId::Cw4Group,
    ];

    /// The id used in code id files, artifact names and command ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractId::Flags => "flags",
            ContractId::DeviationFlaggingValidator => "deviation_flagging_validator",
            ContractId::Ocr2 => "ocr2",
            ContractId::ProxyOcr2 => "proxy_ocr2",
            ContractId::AccessController => "access_controller",
            ContractId::Cw20Base => "cw20_base",
            ContractId::Cw3FlexMultisig => "cw3_flex_multisig",
            ContractId::Cw4Group => "cw4_group",
        }
    }

    /// Whether the contract is released by cw-plus rather than plugin-cosmos.
    pub fn is_cw_plus(&self) -> bool {
        matches!(
            self,
            ContractId::Cw20Base | ContractId::Cw3FlexMultisig | ContractId::Cw4Group
        )
    }

    /// The release asset URL of the contract at `version`.
    pub fn download_url(&self, version: &str) -> String {
        let base = if self.is_cw_plus() {
            CW_PLUS_RELEASES
        } else {
            PLUGIN_RELEASES
        };
        format!("{}/{}/{}.wasm", base, version, self.as_str())
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractId {
    type Err = ArtifactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContractId::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ArtifactError::UnknownContract(s.to_string()))
    }
}

/// Resolves contract bytecode from releases or local build directories.
///
/// One registry serves one invocation; every contract may be loaded at a
/// single version only.
pub struct ContractRegistry {
    client: reqwest::Client,
    default_version: String,
    cw_plus_version: String,
    search_paths: Vec<PathBuf>,
    loaded: Mutex<HashMap<ContractId, String>>,
}

impl ContractRegistry {
    /// A registry fetching plugin contracts at `default_version`.
    pub fn new(default_version: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            default_version: default_version.into(),
            cw_plus_version: CW_PLUS_VERSION.to_string(),
            search_paths: LOCAL_SEARCH_PATHS.iter().map(PathBuf::from).collect(),
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// Replaces the directories searched for `local` artifacts.
    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.search_paths = paths;
        self
    }

    fn loaded(&self) -> MutexGuard<'_, HashMap<ContractId, String>> {
        self.loaded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The version `contract` resolves to.
    ///
    /// cw-plus contracts are pinned unless `local` is requested.
    pub fn version_of(&self, contract: ContractId, requested: Option<&str>) -> String {
        let requested = requested.unwrap_or(self.default_version.as_str());
        if contract.is_cw_plus() && requested != LOCAL_ARTIFACTS_VERSION {
            self.cw_plus_version.clone()
        } else {
            requested.to_string()
        }
    }

    fn claim(&self, contract: ContractId, version: &str) -> Result<(), ArtifactError> {
        let mut loaded = self.loaded();
        match loaded.get(&contract) {
            Some(existing) if existing != version => Err(ArtifactError::VersionConflict {
                loaded: existing.clone(),
                requested: version.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                loaded.insert(contract, version.to_string());
                Ok(())
            }
        }
    }

    fn read_local(&self, contract: ContractId) -> Result<Vec<u8>, ArtifactError> {
        let file = format!("{}.wasm", contract);
        for dir in &self.search_paths {
            let path = dir.join(&file);
            if path.is_file() {
                tracing::debug!(target: "upload", contract = %contract, path = %path.display(), "using local artifact");
                return Ok(std::fs::read(&path)?);
            }
        }
        let searched = self
            .search_paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Err(ArtifactError::Io(format!("{} not found in {}", file, searched)))
    }

    async fn download(&self, contract: ContractId, version: &str) -> Result<Vec<u8>, ArtifactError> {
        let url = contract.download_url(version);
        tracing::info!(target: "upload", contract = %contract, version, %url, "downloading artifact");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ArtifactError::Io(format!("GET {}: {}", url, e)))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ArtifactError::Io(format!(
                "Download {}.wasm failed: HTTP {}",
                contract,
                status.as_u16()
            )));
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| ArtifactError::Io(format!("GET {}: {}", url, e)))?;
        if body.is_empty() {
            return Err(ArtifactError::Io(format!("Download {}.wasm failed", contract)));
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl ArtifactSource for ContractRegistry {
    async fn load(&self, contract: &str, version: Option<&str>) -> Result<Vec<u8>, ArtifactError> {
        let id: ContractId = contract.parse()?;
        let version = self.version_of(id, version);
        self.claim(id, &version)?;
        if version == LOCAL_ARTIFACTS_VERSION {
            self.read_local(id)
        } else {
            self.download(id, &version).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_listed_contract() {
        for id in ContractId::ALL {
            assert_eq!(id.as_str().parse::<ContractId>().unwrap(), id);
        }
        let err = "link".parse::<ContractId>().unwrap_err();
        assert_eq!(err.to_string(), "Contract link not found!");
    }

    #[test]
    fn release_urls_depend_on_origin() {
        assert_eq!(
            ContractId::Ocr2.download_url("v0.1.0"),
            "https://github.com/goplugin/plugin-cosmos/releases/download/v0.1.0/ocr2.wasm"
        );
        assert_eq!(
            ContractId::Cw4Group.download_url(CW_PLUS_VERSION),
            "https://github.com/CosmWasm/cw-plus/releases/download/v0.13.4/cw4_group.wasm"
        );
    }

    #[test]
    fn cw_plus_versions_are_pinned() {
        let registry = ContractRegistry::new("v0.2.0");
        assert_eq!(registry.version_of(ContractId::Ocr2, None), "v0.2.0");
        assert_eq!(registry.version_of(ContractId::Ocr2, Some("v0.3.0")), "v0.3.0");
        assert_eq!(registry.version_of(ContractId::Cw20Base, Some("v0.3.0")), CW_PLUS_VERSION);
        assert_eq!(registry.version_of(ContractId::Cw20Base, Some("local")), "local");
    }

    #[tokio::test]
    async fn reads_local_artifacts_in_search_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("artifacts");
        let second = dir.path().join("bin");
        std::fs::create_dir_all(&first).unwrap();
        std::fs::create_dir_all(&second).unwrap();
        std::fs::write(second.join("flags.wasm"), b"\0asm-flags").unwrap();
        std::fs::write(first.join("ocr2.wasm"), b"\0asm-ocr2").unwrap();
        std::fs::write(second.join("ocr2.wasm"), b"stale").unwrap();

        let registry = ContractRegistry::new("local").with_search_paths(vec![first, second]);
        assert_eq!(registry.load("ocr2", None).await.unwrap(), b"\0asm-ocr2");
        assert_eq!(registry.load("flags", None).await.unwrap(), b"\0asm-flags");

        let err = registry.load("proxy_ocr2", None).await.unwrap_err();
        assert!(err.to_string().contains("proxy_ocr2.wasm not found"));
    }

    #[tokio::test]
    async fn one_version_per_contract() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ocr2.wasm"), b"\0asm").unwrap();
        let registry =
            ContractRegistry::new("local").with_search_paths(vec![dir.path().to_path_buf()]);
        registry.load("ocr2", None).await.unwrap();

        let err = registry.load("ocr2", Some("v0.1.0")).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Loading multiple versions (local and v0.1.0) of the same contract is unsupported."
        );
        // The same version again is fine.
        registry.load("ocr2", Some("local")).await.unwrap();
    }
}
