// Path: crates/cli/src/setup.rs
//! Wires a network profile into the collaborators and the command registry.

use crate::providers::{GatewaySubmitter, LcdQuerier, TerminalConfirmer};
use anyhow::{Context, Result};
use gauntlet_api::prelude::{EnvSecretSource, FileRddSource};
use gauntlet_contracts::{ContractRegistry, UploadCommand};
use gauntlet_execution::{CodeIds, CommandRegistry, Providers};
use gauntlet_types::config::NetworkConfig;
use std::path::Path;
use std::sync::Arc;

/// Loads `<networks_dir>/<network>.toml`.
pub fn load_network(networks_dir: &Path, network: &str) -> Result<NetworkConfig> {
    let config = NetworkConfig::load(networks_dir, network)
        .with_context(|| format!("loading network profile '{}'", network))?;
    tracing::info!(
        target: "gauntlet",
        network = %config.name,
        chain_id = %config.chain_id,
        node = %config.node_url,
        "network loaded"
    );
    Ok(config)
}

/// Connects to the signer and node named by `config`.
pub async fn providers(config: &NetworkConfig, auto_approve: bool) -> Result<Providers> {
    let submitter = GatewaySubmitter::connect(config)
        .await
        .context("connecting to the signing gateway")?;
    let code_ids = CodeIds::load(&config.code_ids_path())
        .with_context(|| format!("reading {}", config.code_ids_path().display()))?;

    let mut providers = Providers::new(
        Arc::new(submitter),
        Arc::new(LcdQuerier::new(config.node_url.clone())),
        Arc::new(TerminalConfirmer::new(auto_approve)),
        Arc::new(EnvSecretSource::default()),
        Arc::new(FileRddSource),
    )
    .with_code_ids(code_ids);
    if let Some(multisig) = config.multisig.clone() {
        providers = providers.with_multisig(multisig);
    }
    Ok(providers)
}

/// Every command, including `upload` bound to this network's artifacts and code id file.
pub fn registry(config: &NetworkConfig) -> CommandRegistry {
    let artifacts = ContractRegistry::new(config.artifacts_version.clone());
    let mut registry = gauntlet_contracts::registry();
    registry.register(Arc::new(UploadCommand::new(
        Arc::new(artifacts),
        config.code_ids_path(),
    )));
    registry
}
