// Path: crates/execution/src/context.rs
//! The collaborators and per-invocation state handed to every instruction.

use gauntlet_api::chain::{Querier, Submitter};
use gauntlet_api::operator::{Confirmer, SecretSource};
use gauntlet_api::rdd::RddSource;
use gauntlet_types::config::MultisigConfig;
use gauntlet_types::error::ArtifactError;
use gauntlet_types::flags::Flags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Code ids of uploaded contracts on one network, keyed by contract id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeIds(BTreeMap<String, u64>);

impl CodeIds {
    /// Loads `path`; a missing file yields an empty set.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        if !path.exists() {
            tracing::debug!(target: "execution", path = %path.display(), "no code id file yet");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| ArtifactError::Io(format!("{}: {}", path.display(), e)))
    }

    /// Writes the set to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(self)
            .map_err(|e| ArtifactError::Io(e.to_string()))?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// The code id of `contract`.
    pub fn get(&self, contract: &str) -> Result<u64, ArtifactError> {
        self.0
            .get(contract)
            .copied()
            .ok_or_else(|| ArtifactError::MissingCodeId(contract.to_string()))
    }

    /// Records the code id of `contract`, replacing any previous one.
    pub fn insert(&mut self, contract: impl Into<String>, code_id: u64) {
        self.0.insert(contract.into(), code_id);
    }

    /// Iterates `(contract, code_id)` pairs in contract order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// The external collaborators a command drives.
///
/// Cloning is cheap; every field is shared.
#[derive(Clone)]
pub struct Providers {
    /// Signs, broadcasts and confirms transactions.
    pub submitter: Arc<dyn Submitter>,
    /// Answers contract queries and event lookups.
    pub querier: Arc<dyn Querier>,
    /// Asks the operator to approve a step.
    pub confirmer: Arc<dyn Confirmer>,
    /// Supplies the offchain config secret.
    pub secrets: Arc<dyn SecretSource>,
    /// Loads RDD files.
    pub rdd: Arc<dyn RddSource>,
    /// Code ids on the active network.
    pub code_ids: CodeIds,
    /// The multisig used by `multisig:` commands, if configured.
    pub multisig: Option<MultisigConfig>,
}

impl Providers {
    /// Bundles the collaborators with no code ids and no multisig.
    pub fn new(
        submitter: Arc<dyn Submitter>,
        querier: Arc<dyn Querier>,
        confirmer: Arc<dyn Confirmer>,
        secrets: Arc<dyn SecretSource>,
        rdd: Arc<dyn RddSource>,
    ) -> Self {
        Self {
            submitter,
            querier,
            confirmer,
            secrets,
            rdd,
            code_ids: CodeIds::default(),
            multisig: None,
        }
    }

    /// Replaces the code ids.
    pub fn with_code_ids(mut self, code_ids: CodeIds) -> Self {
        self.code_ids = code_ids;
        self
    }

    /// Sets the multisig used by `multisig:` commands.
    pub fn with_multisig(mut self, multisig: MultisigConfig) -> Self {
        self.multisig = Some(multisig);
        self
    }
}

/// Everything one instruction invocation may read.
#[derive(Clone)]
pub struct InstructionContext {
    /// `contract:function`, for logs and prompts.
    pub id: String,
    /// The target contract; `None` for deployments.
    pub contract: Option<String>,
    /// The invocation's flags.
    pub flags: Flags,
    /// The collaborators.
    pub providers: Providers,
}

impl InstructionContext {
    /// The target contract or an input construction error.
    pub fn require_contract(&self) -> Result<&str, gauntlet_types::error::InstructionError> {
        self.contract.as_deref().ok_or_else(|| {
            gauntlet_types::error::InstructionError::input(format!(
                "{} requires the contract address as its first argument",
                self.id
            ))
        })
    }
}
