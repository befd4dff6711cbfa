// Path: crates/execution/src/decorators/batch.rs

use crate::command::Command;
use crate::context::Providers;
use async_trait::async_trait;
use gauntlet_api::chain::ContractCall;
use gauntlet_api::operator::confirm_or_abort;
use gauntlet_types::app::{CommandResult, ResponseEntry};
use gauntlet_types::error::InstructionError;
use gauntlet_types::flags::Flags;
use serde_json::Value;
use std::sync::Arc;

/// The id prefix of batched commands.
pub const BATCH_PREFIX: &str = "batch:";

/// Runs the wrapped command once per positional argument and submits every
/// resulting call in one transaction.
pub struct BatchCommand {
    inner: Arc<dyn Command>,
}

impl BatchCommand {
    /// Wraps `inner`.
    pub fn wrap(inner: Arc<dyn Command>) -> Arc<dyn Command> {
        Arc::new(Self { inner })
    }
}

#[async_trait]
impl Command for BatchCommand {
    fn id(&self) -> String {
        format!("{}{}", BATCH_PREFIX, self.inner.id())
    }

    fn examples(&self) -> Vec<String> {
        self.inner
            .examples()
            .into_iter()
            .map(|e| e.replacen(&self.inner.id(), &self.id(), 1))
            .collect()
    }

    async fn execute(
        &self,
        providers: &Providers,
        flags: &Flags,
        args: &[String],
    ) -> Result<CommandResult, InstructionError> {
        let calls = self.prepare(providers, flags, args).await?;
        confirm_or_abort(
            providers.confirmer.as_ref(),
            &format!(
                "Submitting {} {} calls in one transaction. Continue?",
                calls.len(),
                self.inner.id()
            ),
        )
        .await?;

        let tx = providers.submitter.execute_batch(&calls).await?;
        tracing::info!(target: "execution", command = %self.id(), calls = calls.len(), tx = %tx.transaction_hash, "batch confirmed");

        let mut entry = ResponseEntry::from_tx(tx, None);
        entry.data.insert(
            "contracts".into(),
            Value::Array(calls.into_iter().map(|c| Value::String(c.contract)).collect()),
        );
        Ok(CommandResult::single(entry))
    }

    async fn prepare(
        &self,
        providers: &Providers,
        flags: &Flags,
        args: &[String],
    ) -> Result<Vec<ContractCall>, InstructionError> {
        if args.is_empty() {
            return Err(InstructionError::input(format!(
                "{} needs at least one contract address",
                self.id()
            )));
        }
        let mut calls = Vec::with_capacity(args.len());
        for contract in args {
            let prepared = self
                .inner
                .prepare(providers, flags, std::slice::from_ref(contract))
                .await?;
            calls.extend(prepared);
        }
        Ok(calls)
    }
}
