// Path: crates/contracts/src/access_controller.rs

use gauntlet_execution::{instruction_to_command, Command, Instruction, InstructionContext, InstructionId};
use gauntlet_types::error::InstructionError;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct InstantiateMsg {}

fn make_input(_: &InstructionContext, _: &[String]) -> Result<(), InstructionError> {
    Ok(())
}

fn make_contract_input(_: &()) -> Result<InstantiateMsg, InstructionError> {
    Ok(InstantiateMsg {})
}

/// `access_controller:deploy`
pub fn deploy() -> Arc<dyn Command> {
    instruction_to_command(
        Instruction::new(
            InstructionId::new("access_controller", "deploy"),
            make_input,
            make_contract_input,
        )
        .with_examples(&["gauntlet access_controller:deploy --network=local"]),
    )
}
