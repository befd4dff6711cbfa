// Path: crates/contracts/src/upload/mod.rs
//! The `upload` command: stores contract bytecode and records the code ids.

use crate::artifacts::ContractId;
use async_trait::async_trait;
use gauntlet_api::artifacts::ArtifactSource;
use gauntlet_api::operator::confirm_or_abort;
use gauntlet_execution::{extract_attribute, CodeIds, Command, Providers, RetryPolicy};
use gauntlet_types::app::{CommandResult, ResponseEntry, TxResponse};
use gauntlet_types::error::{EventExtractionError, InstructionError};
use gauntlet_types::flags::{Flags, FlagsExt};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

const STORE_CODE_EVENT: &str = "store_code";

/// Uploads the contracts named in its arguments, or every contract.
///
/// Flags: `--version` selects the artifact version, `--maxRetry` the number
/// of attempts per upload.
pub struct UploadCommand {
    artifacts: Arc<dyn ArtifactSource>,
    code_ids_path: PathBuf,
    retry: RetryPolicy,
}

impl UploadCommand {
    /// An upload command writing code ids to `code_ids_path`.
    pub fn new(artifacts: Arc<dyn ArtifactSource>, code_ids_path: impl Into<PathBuf>) -> Self {
        Self {
            artifacts,
            code_ids_path: code_ids_path.into(),
            retry: RetryPolicy::default(),
        }
    }

    /// Overrides the retry policy; `--maxRetry` still overrides its attempts.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn selected(args: &[String]) -> Result<Vec<ContractId>, InstructionError> {
        if args.is_empty() {
            return Ok(ContractId::ALL.to_vec());
        }
        let mut selected = Vec::with_capacity(args.len());
        for arg in args {
            let id: ContractId = arg.parse()?;
            if !selected.contains(&id) {
                selected.push(id);
            }
        }
        Ok(selected)
    }
}

fn code_id_of(tx: &TxResponse) -> Result<u64, EventExtractionError> {
    if let Some(code_id) = tx.code_id {
        return Ok(code_id);
    }
    let raw = extract_attribute(tx, STORE_CODE_EVENT, "code_id")?;
    raw.parse().map_err(|_| EventExtractionError::AttributeNotFound {
        event_type: STORE_CODE_EVENT.to_string(),
        key: "code_id".to_string(),
        tx_hash: tx.transaction_hash.clone(),
    })
}

fn names(contracts: &[ContractId]) -> String {
    contracts
        .iter()
        .map(ContractId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[async_trait]
impl Command for UploadCommand {
    fn id(&self) -> String {
        "upload".to_string()
    }

    fn examples(&self) -> Vec<String> {
        vec![
            "gauntlet upload --network=local".to_string(),
            "gauntlet upload --network=local --version=local ocr2 proxy_ocr2".to_string(),
        ]
    }

    async fn execute(
        &self,
        providers: &Providers,
        flags: &Flags,
        args: &[String],
    ) -> Result<CommandResult, InstructionError> {
        let contracts = Self::selected(args)?;
        let version = flags.string_of(&["version"]);
        let policy = RetryPolicy {
            max_attempts: flags
                .u64_of("maxRetry")?
                .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
                .unwrap_or(self.retry.max_attempts),
            ..self.retry
        };

        let mut code_ids = CodeIds::load(&self.code_ids_path)?;
        let existing: Vec<ContractId> = contracts
            .iter()
            .copied()
            .filter(|c| code_ids.get(c.as_str()).is_ok())
            .collect();
        if !existing.is_empty() {
            println!(
                "The following contracts are deployed already and will be overwritten: {}",
                names(&existing)
            );
        }

        let confirmer = providers.confirmer.as_ref();
        confirm_or_abort(
            confirmer,
            &format!(
                "Continue uploading the following contract codes: {}?",
                names(&contracts)
            ),
        )
        .await?;

        let mut result = CommandResult::default();
        for contract in contracts {
            confirm_or_abort(
                confirmer,
                &format!("Uploading contract {}, do you wish to continue?", contract),
            )
            .await?;

            let wasm = self.artifacts.load(contract.as_str(), version.as_deref()).await?;
            let submitter = &providers.submitter;
            let wasm = &wasm;
            let tx = policy
                .run(contract.as_str(), move |attempt| {
                    tracing::debug!(target: "upload", contract = %contract, attempt, bytes = wasm.len(), "storing code");
                    submitter.upload(wasm)
                })
                .await?;

            let code_id = code_id_of(&tx)?;
            tracing::info!(target: "upload", contract = %contract, code_id, tx = %tx.transaction_hash, "code stored");
            println!("✅ Uploaded {} with code id {}", contract, code_id);
            code_ids.insert(contract.as_str(), code_id);

            let mut entry = ResponseEntry::from_tx(tx, None);
            entry
                .data
                .insert("contractId".into(), Value::String(contract.to_string()));
            entry.data.insert("codeId".into(), Value::from(code_id));
            result.responses.push(entry);
        }

        code_ids.save(&self.code_ids_path)?;
        println!(
            "New code ids have been saved to {}",
            self.code_ids_path.display()
        );
        Ok(result)
    }
}
