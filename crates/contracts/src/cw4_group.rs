// Path: crates/contracts/src/cw4_group.rs
//! The cw4 group backing a cw3 flex multisig.

use crate::input::{require_flag, RuleCheck, VALIDATE_INPUT};
use gauntlet_execution::validation::is_valid_address;
use gauntlet_execution::{instruction_to_command, Command, Instruction, InstructionContext, InstructionId};
use gauntlet_types::error::InstructionError;
use gauntlet_types::flags::FlagsExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The group members and its admin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GroupInput {
    /// The wallet owners; every owner gets weight 1.
    pub owners: Vec<String>,
    /// The group admin.
    pub admin: String,
}

#[derive(Debug, Serialize)]
struct Member {
    addr: String,
    weight: u64,
}

#[derive(Debug, Serialize)]
struct InstantiateMsg {
    members: Vec<Member>,
    admin: String,
}

fn make_input(ctx: &InstructionContext, args: &[String]) -> Result<GroupInput, InstructionError> {
    if let Some(input) = ctx.flags.input()? {
        return Ok(input);
    }
    Ok(GroupInput {
        owners: args.to_vec(),
        admin: require_flag(ctx, "admin")?,
    })
}

fn validate_input(input: &GroupInput) -> Result<(), InstructionError> {
    let mut check = RuleCheck::new(VALIDATE_INPUT);
    check
        .ensure(!input.owners.is_empty(), || {
            "You must specify at least one group member (wallet owner)".to_string()
        })
        .ensure(input.owners.iter().all(|o| is_valid_address(o)), || {
            "Owners are not valid".to_string()
        })
        .ensure(is_valid_address(&input.admin), || "Admin is not valid".to_string());
    check.finish()
}

fn make_contract_input(input: &GroupInput) -> Result<InstantiateMsg, InstructionError> {
    Ok(InstantiateMsg {
        members: input
            .owners
            .iter()
            .map(|owner| Member {
                addr: owner.clone(),
                weight: 1,
            })
            .collect(),
        admin: input.admin.clone(),
    })
}

/// `cw4_group:deploy`
pub fn deploy() -> Arc<dyn Command> {
    instruction_to_command(
        Instruction::new(InstructionId::new("cw4_group", "deploy"), make_input, make_contract_input)
            .with_validate_input(validate_input)
            .with_examples(&["gauntlet cw4_group:deploy --network=local --admin=<ADMIN_ADDRESS> <OWNERS_LIST>"]),
    )
}
