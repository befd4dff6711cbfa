// Path: crates/contracts/src/flags.rs
//! The flags contract, raised by the deviation flagging validator.

use crate::input::{require_flag, RuleCheck, VALIDATE_INPUT};
use gauntlet_execution::{instruction_to_command, Command, Instruction, InstructionContext, InstructionId};
use gauntlet_types::error::InstructionError;
use serde::Serialize;
use std::sync::Arc;

/// Who may raise and lower flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagsInput {
    /// The access controller gating `raise_flag`.
    pub raising_access_controller: String,
    /// The access controller gating `lower_flags`.
    pub lowering_access_controller: String,
}

#[derive(Debug, Serialize)]
struct InstantiateMsg {
    raising_access_controller: String,
    lowering_access_controller: String,
}

fn make_input(ctx: &InstructionContext, _: &[String]) -> Result<FlagsInput, InstructionError> {
    Ok(FlagsInput {
        raising_access_controller: require_flag(ctx, "raisingAccessController")?,
        lowering_access_controller: require_flag(ctx, "loweringAccessController")?,
    })
}

fn validate_input(input: &FlagsInput) -> Result<(), InstructionError> {
    RuleCheck::new(VALIDATE_INPUT)
        .address(&input.raising_access_controller, "Invalid raisingAccessController address")
        .address(&input.lowering_access_controller, "Invalid loweringAccessController address")
        .finish()
}

fn make_contract_input(input: &FlagsInput) -> Result<InstantiateMsg, InstructionError> {
    Ok(InstantiateMsg {
        raising_access_controller: input.raising_access_controller.clone(),
        lowering_access_controller: input.lowering_access_controller.clone(),
    })
}

/// `flags:deploy`
pub fn deploy() -> Arc<dyn Command> {
    instruction_to_command(
        Instruction::new(InstructionId::new("flags", "deploy"), make_input, make_contract_input)
            .with_validate_input(validate_input)
            .with_examples(&[
                "gauntlet flags:deploy --network=local --raisingAccessController=<AC> --loweringAccessController=<AC>",
            ]),
    )
}
