// Path: crates/contracts/src/ocr2/mod.rs
//! OCR2 aggregator instructions, inspection and the initialize flow.

mod billing;
mod deploy;
mod flow;
mod inspect;
mod offchain;
mod proposal;
mod withdraw;

pub use billing::{set_billing, SetBillingInput};
pub use deploy::{deploy, DeployInput};
pub use flow::{initialize_flow, step_ids};
pub use inspect::InspectCommand;
pub use offchain::{propose_offchain_config, ProposeOffchainConfigInput};
pub use proposal::{
    accept_proposal, begin_proposal, finalize_proposal, propose_config, ProposeConfigInput,
};
pub use withdraw::withdraw_payment;

use gauntlet_execution::{Command, InstructionId};
use std::sync::Arc;

/// The contract and category id.
pub const OCR2: &str = "ocr2";

/// The event the contract emits when a proposal is accepted.
pub const SET_CONFIG_EVENT: &str = "wasm-set_config";

pub(crate) const fn id(function: &'static str) -> InstructionId {
    InstructionId::new(OCR2, function)
}

/// Every OCR2 command.
pub fn commands() -> Vec<Arc<dyn Command>> {
    vec![
        deploy(),
        set_billing(),
        begin_proposal(),
        propose_config(),
        propose_offchain_config(),
        finalize_proposal(),
        accept_proposal(),
        withdraw_payment(),
        Arc::new(InspectCommand),
        Arc::new(initialize_flow()),
    ]
}

#[cfg(test)]
mod tests;
