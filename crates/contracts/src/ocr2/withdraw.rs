// Path: crates/contracts/src/ocr2/withdraw.rs

use super::id;
use crate::input::{require_flag, RuleCheck};
use futures_util::future::{BoxFuture, FutureExt};
use gauntlet_execution::{
    first_tx, instruction_to_command, Command, ExecutionInput, Instruction, InstructionContext,
};
use gauntlet_types::app::CommandResult;
use gauntlet_types::error::InstructionError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// The event emitted when a payee is paid.
pub const ORACLE_PAID_EVENT: &str = "wasm-oracle_paid";

#[derive(Debug, Serialize)]
struct WithdrawPaymentMsg {
    transmitter: String,
}

fn make_input(ctx: &InstructionContext, _: &[String]) -> Result<String, InstructionError> {
    require_flag(ctx, "transmitter")
}

fn valid_transmitter(transmitter: &String) -> Result<(), InstructionError> {
    RuleCheck::new("validTransmitter")
        .address(transmitter, "Invalid transmitter address")
        .finish()
}

fn make_contract_input(transmitter: &String) -> Result<WithdrawPaymentMsg, InstructionError> {
    Ok(WithdrawPaymentMsg {
        transmitter: transmitter.clone(),
    })
}

fn announce<'a>(
    ctx: &'a InstructionContext,
    input: &'a ExecutionInput<String, WithdrawPaymentMsg>,
) -> BoxFuture<'a, Result<(), InstructionError>> {
    async move {
        tracing::info!(
            target: "ocr2",
            transmitter = %input.user,
            contract = ?ctx.contract,
            "withdrawing PLI payment"
        );
        Ok(())
    }
    .boxed()
}

fn report_payment<'a>(
    _: &'a InstructionContext,
    _: &'a ExecutionInput<String, WithdrawPaymentMsg>,
    result: &'a CommandResult,
) -> BoxFuture<'a, Result<Map<String, Value>, InstructionError>> {
    async move {
        let tx = first_tx(result)?;
        let mut data = Map::new();
        match tx.event(ORACLE_PAID_EVENT) {
            None => println!("0 PLI was owed/paid to payee"),
            Some(paid) => {
                let payment: Map<String, Value> = paid
                    .attributes
                    .iter()
                    .map(|a| (a.key.clone(), Value::String(a.value.clone())))
                    .collect();
                println!("Payment Information: {}", Value::Object(payment.clone()));
                data.insert("payment".into(), Value::Object(payment));
            }
        }
        Ok(data)
    }
    .boxed()
}

/// `ocr2:withdraw_payment`
pub fn withdraw_payment() -> Arc<dyn Command> {
    instruction_to_command(
        Instruction::new(id("withdraw_payment"), make_input, make_contract_input)
            .with_validation("validTransmitter", valid_transmitter)
            .with_before_execute(announce)
            .with_after_execute(report_payment)
            .with_examples(&[
                "gauntlet ocr2:withdraw_payment --network=local --transmitter=<TRANSMITTER> <CONTRACT_ADDRESS>",
            ]),
    )
}
