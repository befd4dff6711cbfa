// Path: crates/execution/src/command/mod.rs
//! The instruction-to-command compiler.

use crate::context::{InstructionContext, Providers};
use crate::instruction::{ExecutionInput, Instruction};
use async_trait::async_trait;
use gauntlet_api::chain::ContractCall;
use gauntlet_api::operator::confirm_or_abort;
use gauntlet_types::app::{CommandResult, Operation, ResponseEntry};
use gauntlet_types::error::{InstructionError, ValidationFailure};
use gauntlet_types::flags::{Flags, FlagsExt};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// An executable command, the unit the CLI, the decorators and flows run.
#[async_trait]
pub trait Command: Send + Sync {
    /// The routing id, e.g. `ocr2:begin_proposal`.
    fn id(&self) -> String;

    /// Example invocations.
    fn examples(&self) -> Vec<String> {
        Vec::new()
    }

    /// Runs the command to completion.
    async fn execute(
        &self,
        providers: &Providers,
        flags: &Flags,
        args: &[String],
    ) -> Result<CommandResult, InstructionError>;

    /// Runs every stage up to submission and returns the calls that would be
    /// submitted, for decorators that submit them differently.
    async fn prepare(
        &self,
        _providers: &Providers,
        _flags: &Flags,
        _args: &[String],
    ) -> Result<Vec<ContractCall>, InstructionError> {
        Err(InstructionError::Unsupported(format!(
            "{} cannot be wrapped",
            self.id()
        )))
    }
}

/// Compiles an instruction into a command.
pub fn instruction_to_command<I, C>(instruction: Instruction<I, C>) -> Arc<dyn Command>
where
    I: Send + Sync + 'static,
    C: Serialize + Send + Sync + 'static,
{
    Arc::new(InstructionCommand { instruction })
}

struct InstructionCommand<I, C> {
    instruction: Instruction<I, C>,
}

impl<I, C> InstructionCommand<I, C>
where
    I: Send + Sync + 'static,
    C: Serialize + Send + Sync + 'static,
{
    fn context(&self, providers: &Providers, flags: &Flags, args: &[String]) -> InstructionContext {
        let contract = match self.instruction.id.operation() {
            Operation::Instantiate => None,
            Operation::Execute => args.first().cloned(),
        };
        InstructionContext {
            id: self.instruction.id.to_string(),
            contract,
            flags: flags.clone(),
            providers: providers.clone(),
        }
    }

    fn validate(&self, input: &I) -> Result<(), InstructionError> {
        let rules = std::iter::once(("validateInput", self.instruction.validate_input))
            .chain(self.instruction.validations.iter().copied());
        let mut failures = Vec::new();
        for (name, rule) in rules {
            match rule(input) {
                Ok(()) => {}
                Err(InstructionError::Validation(mut reported)) => failures.append(&mut reported),
                Err(other) => failures.push(ValidationFailure::new(name, other.to_string())),
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            for failure in &failures {
                tracing::warn!(target: "execution", rule = %failure.name, "{}", failure.message);
            }
            Err(InstructionError::Validation(failures))
        }
    }

    /// Stages 1 to 4.
    async fn build(
        &self,
        ctx: &InstructionContext,
        args: &[String],
    ) -> Result<ExecutionInput<I, C>, InstructionError> {
        let instruction = &self.instruction;
        if instruction.id.operation() == Operation::Execute {
            ctx.require_contract()?;
        }

        let user = (instruction.make_input)(ctx, args)?;
        self.validate(&user)?;
        let contract = (instruction.make_contract_input)(&user)?;
        let input = ExecutionInput { user, contract };

        if let Some(before) = instruction.before_execute {
            before(ctx, &input).await?;
        }
        Ok(input)
    }

    fn message(&self, payload: &C) -> Result<Value, InstructionError> {
        let payload = serde_json::to_value(payload)?;
        Ok(match self.instruction.id.operation() {
            Operation::Instantiate => payload,
            Operation::Execute => {
                let mut msg = Map::new();
                msg.insert(self.instruction.id.function.to_string(), payload);
                Value::Object(msg)
            }
        })
    }
}

#[async_trait]
impl<I, C> Command for InstructionCommand<I, C>
where
    I: Send + Sync + 'static,
    C: Serialize + Send + Sync + 'static,
{
    fn id(&self) -> String {
        self.instruction.id.to_string()
    }

    fn examples(&self) -> Vec<String> {
        self.instruction
            .examples
            .iter()
            .map(|e| e.to_string())
            .collect()
    }

    async fn execute(
        &self,
        providers: &Providers,
        flags: &Flags,
        args: &[String],
    ) -> Result<CommandResult, InstructionError> {
        let ctx = self.context(providers, flags, args);
        let operation = self.instruction.id.operation();
        tracing::info!(target: "execution", command = %ctx.id, contract = ?ctx.contract, "running instruction");

        let code_id = match operation {
            Operation::Instantiate => Some(providers.code_ids.get(self.instruction.code_id_key())?),
            Operation::Execute => None,
        };

        let input = self.build(&ctx, args).await?;
        let msg = self.message(&input.contract)?;

        let target = ctx.contract.as_deref().unwrap_or("a new contract");
        confirm_or_abort(
            providers.confirmer.as_ref(),
            &format!("Executing {} on {}. Continue?", ctx.id, target),
        )
        .await?;

        let submitter = &providers.submitter;
        let entry = match code_id {
            Some(code_id) => {
                let label = flags
                    .string_of(&["label"])
                    .unwrap_or_else(|| self.instruction.id.contract.to_string());
                let admin = flags.string_of(&["codeAdmin"]);
                let tx = submitter
                    .instantiate(code_id, &label, &msg, admin.as_deref())
                    .await?;
                let address = tx.contract_address.clone();
                tracing::info!(target: "execution", command = %ctx.id, code_id, contract = ?address, tx = %tx.transaction_hash, "contract instantiated");
                ResponseEntry::from_tx(tx, address)
            }
            None => {
                let contract = ctx.require_contract()?;
                let tx = submitter.execute(contract, &msg).await?;
                tracing::info!(target: "execution", command = %ctx.id, contract, tx = %tx.transaction_hash, "execution confirmed");
                ResponseEntry::from_tx(tx, Some(contract.to_string()))
            }
        };

        let mut result = CommandResult::single(entry);
        if let Some(after) = self.instruction.after_execute {
            let data = after(&ctx, &input, &result).await?;
            if let Some(first) = result.responses.first_mut() {
                first.data.extend(data);
            }
        }
        Ok(result)
    }

    async fn prepare(
        &self,
        providers: &Providers,
        flags: &Flags,
        args: &[String],
    ) -> Result<Vec<ContractCall>, InstructionError> {
        if self.instruction.id.operation() == Operation::Instantiate {
            return Err(InstructionError::Unsupported(format!(
                "{} instantiates a contract and cannot be wrapped",
                self.id()
            )));
        }
        let ctx = self.context(providers, flags, args);
        let contract = ctx.require_contract()?.to_string();
        let input = self.build(&ctx, args).await?;
        Ok(vec![ContractCall::new(contract, self.message(&input.contract)?)])
    }
}
