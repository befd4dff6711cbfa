// Path: crates/contracts/src/ocr2/flow.rs

use super::{
    accept_proposal, begin_proposal, deploy, finalize_proposal, propose_config,
    propose_offchain_config, set_billing, InspectCommand,
};
use futures_util::future::{BoxFuture, FutureExt};
use gauntlet_api::operator::confirm_or_abort;
use gauntlet_execution::{Flow, FlowStep, FlowValue, Providers, StepRegistry};
use gauntlet_types::error::InstructionError;
use std::sync::Arc;

/// Ids of the steps other steps read from.
pub mod step_ids {
    /// The aggregator deployment.
    pub const OCR_2: u32 = 1;
    /// The proposal opening.
    pub const BEGIN_PROPOSAL: u32 = 2;
    /// The proposal finalization.
    pub const FINALIZE_PROPOSAL: u32 = 3;
    /// The offchain config proposal.
    pub const PROPOSE_OFFCHAIN: u32 = 4;
}

fn show_rdd_instructions<'a>(
    providers: &'a Providers,
    steps: &'a StepRegistry,
) -> BoxFuture<'a, Result<(), InstructionError>> {
    async move {
        let contract = steps.resolve_string(&FlowValue::contract_of(step_ids::OCR_2))?;
        println!("\nChange the RDD ID with the new contract address:\n  - Contract Address: {}\n", contract);
        confirm_or_abort(providers.confirmer.as_ref(), "Ready? Continue").await
    }
    .boxed()
}

fn proposal_id() -> FlowValue {
    FlowValue::data_of(step_ids::BEGIN_PROPOSAL, "proposalId")
}

/// `ocr2:initialize:flow`: deploys an aggregator and brings it to its first
/// accepted config.
///
/// Run with `--rdd` and the aggregator's temporary RDD id. After the deploy
/// the operator re-keys the RDD entry by the new address; every later step
/// addresses the deployed contract.
pub fn initialize_flow() -> Flow {
    let ocr2 = || FlowValue::contract_of(step_ids::OCR_2);
    Flow::new(
        "ocr2:initialize:flow",
        vec![
            FlowStep::command("Deploy OCR 2", deploy()).with_id(step_ids::OCR_2),
            FlowStep::exec("Change RDD", show_rdd_instructions),
            FlowStep::command("Set Billing", set_billing()).with_arg(ocr2()),
            FlowStep::command("Begin Proposal", begin_proposal())
                .with_id(step_ids::BEGIN_PROPOSAL)
                .with_arg(ocr2()),
            FlowStep::command("Propose Config", propose_config())
                .with_arg(ocr2())
                .with_flag("proposalId", proposal_id()),
            FlowStep::command("Propose Offchain Config", propose_offchain_config())
                .with_id(step_ids::PROPOSE_OFFCHAIN)
                .with_arg(ocr2())
                .with_flag("proposalId", proposal_id()),
            FlowStep::command("Finalize Proposal", finalize_proposal())
                .with_id(step_ids::FINALIZE_PROPOSAL)
                .with_arg(ocr2())
                .with_flag("proposalId", proposal_id()),
            FlowStep::command("Accept Proposal", accept_proposal())
                .with_arg(ocr2())
                .with_flag("proposalId", proposal_id())
                .with_flag(
                    "digest",
                    FlowValue::data_of(step_ids::FINALIZE_PROPOSAL, "digest"),
                )
                .with_flag(
                    "secret",
                    FlowValue::data_of(step_ids::PROPOSE_OFFCHAIN, "secret"),
                ),
            FlowStep::command("Inspection", Arc::new(InspectCommand)).with_arg(ocr2()),
        ],
    )
    .with_examples(&[
        "gauntlet ocr2:initialize:flow --network=local --rdd=./rdd.json --link=<PLI_TOKEN> --billingAccessController=<AC> --requesterAccessController=<AC> <CONTRACT_TEMP_ID>",
    ])
}
