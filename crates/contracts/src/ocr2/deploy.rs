// Path: crates/contracts/src/ocr2/deploy.rs

use super::id;
use crate::input::{rdd, rdd_key, require_flag, RuleCheck, VALIDATE_INPUT};
use gauntlet_execution::{instruction_to_command, Command, Instruction, InstructionContext};
use gauntlet_types::error::InstructionError;
use gauntlet_types::flags::FlagsExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The aggregator's immutable parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployInput {
    /// The PLI token contract.
    pub link_token: String,
    /// The smallest accepted answer, an integer string.
    pub min_answer: String,
    /// The largest accepted answer, an integer string.
    pub max_answer: String,
    /// Who may change billing.
    pub billing_access_controller: String,
    /// Who may request new rounds.
    pub requester_access_controller: String,
    /// Decimals of reported answers.
    pub decimals: u8,
    /// The feed description.
    pub description: String,
}

#[derive(Debug, Serialize)]
struct InstantiateMsg {
    link_token: String,
    min_answer: String,
    max_answer: String,
    billing_access_controller: String,
    requester_access_controller: String,
    decimals: u8,
    description: String,
}

fn make_input(ctx: &InstructionContext, args: &[String]) -> Result<DeployInput, InstructionError> {
    if let Some(input) = ctx.flags.input()? {
        return Ok(input);
    }
    let link_token = require_flag(ctx, "link")?;
    let billing_access_controller = require_flag(ctx, "billingAccessController")?;
    let requester_access_controller = require_flag(ctx, "requesterAccessController")?;

    let (min_answer, max_answer, decimals, description) = match rdd(ctx)? {
        Some(rdd) => {
            let key = rdd_key(ctx, args)?;
            let aggregator = rdd.contract(key)?;
            let missing = |field: &str| {
                InstructionError::input(format!("{} of {} is missing in the RDD", field, key))
            };
            (
                aggregator
                    .min_submission_value
                    .clone()
                    .ok_or_else(|| missing("minSubmissionValue"))?,
                aggregator
                    .max_submission_value
                    .clone()
                    .ok_or_else(|| missing("maxSubmissionValue"))?,
                aggregator.decimals.ok_or_else(|| missing("decimals"))?,
                aggregator.name.clone().unwrap_or_default(),
            )
        }
        None => {
            let decimals = ctx
                .flags
                .u64_of("decimals")?
                .ok_or_else(|| InstructionError::input("--decimals is required"))?;
            (
                require_flag(ctx, "minAnswer")?,
                require_flag(ctx, "maxAnswer")?,
                u8::try_from(decimals)
                    .map_err(|_| InstructionError::input(format!("--decimals {} is out of range", decimals)))?,
                ctx.flags.string_of(&["description"]).unwrap_or_default(),
            )
        }
    };

    Ok(DeployInput {
        link_token,
        min_answer,
        max_answer,
        billing_access_controller,
        requester_access_controller,
        decimals,
        description,
    })
}

fn validate_input(input: &DeployInput) -> Result<(), InstructionError> {
    RuleCheck::new(VALIDATE_INPUT)
        .address(&input.link_token, "Invalid link token address")
        .address(&input.billing_access_controller, "Invalid billingAccessController address")
        .address(&input.requester_access_controller, "Invalid requesterAccessController address")
        .finish()
}

fn answer_range(input: &DeployInput) -> Result<(), InstructionError> {
    let min = input.min_answer.trim().parse::<i128>();
    let max = input.max_answer.trim().parse::<i128>();
    let mut check = RuleCheck::new("validAnswerRange");
    check
        .ensure(min.is_ok(), || format!("minAnswer '{}' is not an integer", input.min_answer))
        .ensure(max.is_ok(), || format!("maxAnswer '{}' is not an integer", input.max_answer));
    if let (Ok(min), Ok(max)) = (min, max) {
        check.ensure(min < max, || {
            format!("minAnswer ({}) must be smaller than maxAnswer ({})", min, max)
        });
    }
    check.finish()
}

fn make_contract_input(input: &DeployInput) -> Result<InstantiateMsg, InstructionError> {
    Ok(InstantiateMsg {
        link_token: input.link_token.clone(),
        min_answer: input.min_answer.trim().to_string(),
        max_answer: input.max_answer.trim().to_string(),
        billing_access_controller: input.billing_access_controller.clone(),
        requester_access_controller: input.requester_access_controller.clone(),
        decimals: input.decimals,
        description: input.description.clone(),
    })
}

/// `ocr2:deploy`
pub fn deploy() -> Arc<dyn Command> {
    instruction_to_command(
        Instruction::new(id("deploy"), make_input, make_contract_input)
            .with_validate_input(validate_input)
            .with_validation("validAnswerRange", answer_range)
            .with_examples(&[
                "gauntlet ocr2:deploy --network=local --rdd=./rdd.json --link=<PLI_TOKEN> --billingAccessController=<AC> --requesterAccessController=<AC> <CONTRACT_TEMP_ID>",
            ]),
    )
}
