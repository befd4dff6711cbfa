// Path: crates/contracts/src/proxy_ocr2.rs

use crate::input::{RuleCheck, VALIDATE_INPUT};
use gauntlet_execution::{instruction_to_command, Command, Instruction, InstructionContext, InstructionId};
use gauntlet_types::error::InstructionError;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct InstantiateMsg {
    contract_address: String,
}

fn make_input(_: &InstructionContext, args: &[String]) -> Result<String, InstructionError> {
    args.first().cloned().ok_or_else(|| {
        InstructionError::input("proxy_ocr2:deploy requires the ocr2 contract address as its first argument")
    })
}

fn validate_input(aggregator: &String) -> Result<(), InstructionError> {
    RuleCheck::new(VALIDATE_INPUT)
        .address(aggregator, "Invalid ocr2 contract address")
        .finish()
}

fn make_contract_input(aggregator: &String) -> Result<InstantiateMsg, InstructionError> {
    Ok(InstantiateMsg {
        contract_address: aggregator.clone(),
    })
}

/// `proxy_ocr2:deploy`: a proxy in front of the aggregator given as the first argument.
pub fn deploy() -> Arc<dyn Command> {
    instruction_to_command(
        Instruction::new(InstructionId::new("proxy_ocr2", "deploy"), make_input, make_contract_input)
            .with_validate_input(validate_input)
            .with_examples(&["gauntlet proxy_ocr2:deploy --network=local <OCR2_CONTRACT_ADDRESS>"]),
    )
}
