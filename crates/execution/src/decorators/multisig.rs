// Path: crates/execution/src/decorators/multisig.rs

use crate::command::Command;
use crate::context::Providers;
use crate::events::extract_attribute;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use gauntlet_api::chain::ContractCall;
use gauntlet_api::operator::confirm_or_abort;
use gauntlet_types::app::{CommandResult, ResponseEntry, WASM_EVENT};
use gauntlet_types::error::InstructionError;
use gauntlet_types::flags::{Flags, FlagsExt};
use serde_json::{json, Value};
use std::sync::Arc;

/// The id prefix of multisig-wrapped commands.
pub const MULTISIG_PREFIX: &str = "multisig:";

/// Wraps a command into a cw3 multisig proposal.
///
/// Without `--multisigProposal` the wrapped calls are proposed. With it, the
/// proposal is voted on while open and executed once passed.
pub struct MultisigCommand {
    inner: Arc<dyn Command>,
}

impl MultisigCommand {
    /// Wraps `inner`.
    pub fn wrap(inner: Arc<dyn Command>) -> Arc<dyn Command> {
        Arc::new(Self { inner })
    }

    fn multisig(&self, providers: &Providers, flags: &Flags) -> Result<String, InstructionError> {
        flags
            .string_of(&["multisig"])
            .or_else(|| providers.multisig.as_ref().map(|m| m.address.clone()))
            .filter(|a| !a.is_empty())
            .ok_or_else(|| {
                InstructionError::input(
                    "No multisig configured: set [multisig] in the network profile or pass --multisig",
                )
            })
    }

    fn title(&self, providers: &Providers) -> String {
        let prefix = providers
            .multisig
            .as_ref()
            .and_then(|m| m.title_prefix.clone())
            .unwrap_or_default();
        format!("{}{}", prefix, self.inner.id())
    }

    async fn propose(
        &self,
        providers: &Providers,
        flags: &Flags,
        args: &[String],
        multisig: &str,
    ) -> Result<CommandResult, InstructionError> {
        let calls = self.inner.prepare(providers, flags, args).await?;
        let msgs = calls
            .iter()
            .map(wasm_execute)
            .collect::<Result<Vec<_>, _>>()?;
        let title = self.title(providers);
        let description = flags
            .string_of(&["description"])
            .unwrap_or_else(|| title.clone());

        confirm_or_abort(
            providers.confirmer.as_ref(),
            &format!(
                "Creating multisig proposal '{}' with {} message(s) on {}. Continue?",
                title,
                msgs.len(),
                multisig
            ),
        )
        .await?;

        let msg = json!({ "propose": { "title": title, "description": description, "msgs": msgs } });
        let tx = providers.submitter.execute(multisig, &msg).await?;
        let proposal_id = extract_attribute(&tx, WASM_EVENT, "proposal_id")?;
        println!(
            "✅ Multisig proposal {} created on {}. Other signers vote with --multisigProposal={}",
            proposal_id, multisig, proposal_id
        );
        tracing::info!(target: "execution", command = %self.id(), multisig, proposal_id = %proposal_id, "multisig proposal created");

        let mut entry = ResponseEntry::from_tx(tx, Some(multisig.to_string()));
        entry
            .data
            .insert("multisigProposal".into(), Value::String(proposal_id));
        Ok(CommandResult::single(entry))
    }

    async fn advance(
        &self,
        providers: &Providers,
        multisig: &str,
        proposal_id: &str,
    ) -> Result<CommandResult, InstructionError> {
        let id: u64 = proposal_id.parse().map_err(|_| {
            InstructionError::input(format!(
                "--multisigProposal must be a number, got '{}'",
                proposal_id
            ))
        })?;
        let state = providers
            .querier
            .query_contract(multisig, &json!({ "proposal": { "proposal_id": id } }))
            .await?;
        let status = state
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        tracing::info!(target: "execution", multisig, proposal_id = id, status = %status, "multisig proposal state");

        let (action, msg) = match status.as_str() {
            "open" => (
                "Voting yes on",
                json!({ "vote": { "proposal_id": id, "vote": "yes" } }),
            ),
            "passed" => ("Executing", json!({ "execute": { "proposal_id": id } })),
            other => {
                return Err(InstructionError::input(format!(
                    "Multisig proposal {} is {}; nothing left to do",
                    id, other
                )))
            }
        };

        confirm_or_abort(
            providers.confirmer.as_ref(),
            &format!("{} multisig proposal {} on {}. Continue?", action, id, multisig),
        )
        .await?;
        let tx = providers.submitter.execute(multisig, &msg).await?;
        println!("✅ {} multisig proposal {}: done ({})", action, id, tx.transaction_hash);

        let mut entry = ResponseEntry::from_tx(tx, Some(multisig.to_string()));
        entry
            .data
            .insert("multisigProposal".into(), Value::String(id.to_string()));
        entry.data.insert("status".into(), Value::String(status));
        Ok(CommandResult::single(entry))
    }
}

fn wasm_execute(call: &ContractCall) -> Result<Value, InstructionError> {
    let raw = serde_json::to_vec(&call.msg)?;
    Ok(json!({
        "wasm": {
            "execute": {
                "contract_addr": call.contract,
                "msg": BASE64.encode(raw),
                "funds": []
            }
        }
    }))
}

#[async_trait]
impl Command for MultisigCommand {
    fn id(&self) -> String {
        format!("{}{}", MULTISIG_PREFIX, self.inner.id())
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
        let multisig = self.multisig(providers, flags)?;
        match flags.string_of(&["multisigProposal"]) {
            Some(proposal_id) => self.advance(providers, &multisig, &proposal_id).await,
            None => self.propose(providers, flags, args, &multisig).await,
        }
    }
}
