// Path: crates/contracts/src/deviation_flagging_validator.rs

use crate::input::{require_flag, RuleCheck, VALIDATE_INPUT};
use gauntlet_execution::{instruction_to_command, Command, Instruction, InstructionContext, InstructionId};
use gauntlet_types::error::InstructionError;
use gauntlet_types::flags::FlagsExt;
use serde::Serialize;
use std::sync::Arc;

/// The flags contract to raise and the deviation that raises it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorInput {
    /// The flags contract.
    pub flags: String,
    /// The deviation threshold, in parts per 100k.
    pub flagging_threshold: u32,
}

#[derive(Debug, Serialize)]
struct InstantiateMsg {
    flags: String,
    flagging_threshold: u32,
}

fn make_input(ctx: &InstructionContext, _: &[String]) -> Result<ValidatorInput, InstructionError> {
    let threshold = ctx
        .flags
        .u64_of("flaggingThreshold")?
        .ok_or_else(|| InstructionError::input("--flaggingThreshold is required"))?;
    Ok(ValidatorInput {
        flags: require_flag(ctx, "flags")?,
        flagging_threshold: u32::try_from(threshold).map_err(|_| {
            InstructionError::input(format!("--flaggingThreshold {} is out of range", threshold))
        })?,
    })
}

fn validate_input(input: &ValidatorInput) -> Result<(), InstructionError> {
    RuleCheck::new(VALIDATE_INPUT)
        .address(&input.flags, "Invalid flags address")
        .ensure(input.flagging_threshold > 0, || {
            "Flagging threshold must be greater than 0".to_string()
        })
        .finish()
}

fn make_contract_input(input: &ValidatorInput) -> Result<InstantiateMsg, InstructionError> {
    Ok(InstantiateMsg {
        flags: input.flags.clone(),
        flagging_threshold: input.flagging_threshold,
    })
}

/// `deviation_flagging_validator:deploy`
pub fn deploy() -> Arc<dyn Command> {
    instruction_to_command(
        Instruction::new(
            InstructionId::new("deviation_flagging_validator", "deploy"),
            make_input,
            make_contract_input,
        )
        .with_validate_input(validate_input)
        .with_examples(&[
            "gauntlet deviation_flagging_validator:deploy --network=local --flags=<FLAGS_CONTRACT> --flaggingThreshold=1000",
        ]),
    )
}
