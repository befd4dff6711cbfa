// Path: crates/contracts/src/ocr2/billing.rs

use super::id;
use crate::input::{rdd, rdd_key, require_flag, RuleCheck, VALIDATE_INPUT};
use gauntlet_execution::{instruction_to_command, Command, Instruction, InstructionContext};
use gauntlet_types::error::InstructionError;
use gauntlet_types::flags::FlagsExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Billing amounts as given on the command line or in the RDD.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetBillingInput {
    /// Payment per observation in gjuels, an integer string.
    pub observation_payment_gjuels: String,
    /// Payment per transmission in gjuels, an integer string.
    pub transmission_payment_gjuels: String,
    /// The recommended gas price in micro units, a float string.
    pub recommended_gas_price_micro: String,
}

#[derive(Debug, Serialize)]
struct BillingConfig {
    observation_payment_gjuels: u64,
    transmission_payment_gjuels: u64,
    recommended_gas_price_micro: String,
}

#[derive(Debug, Serialize)]
struct SetBillingMsg {
    config: BillingConfig,
}

fn make_input(ctx: &InstructionContext, args: &[String]) -> Result<SetBillingInput, InstructionError> {
    if let Some(input) = ctx.flags.input()? {
        return Ok(input);
    }
    if let Some(rdd) = rdd(ctx)? {
        let key = rdd_key(ctx, args)?;
        let billing = rdd.contract(key)?.billing.clone().ok_or_else(|| {
            InstructionError::input(format!("Billing information of {} is missing in the RDD", key))
        })?;
        return Ok(SetBillingInput {
            observation_payment_gjuels: billing.observation_payment_gjuels,
            transmission_payment_gjuels: billing.transmission_payment_gjuels,
            recommended_gas_price_micro: billing.recommended_gas_price_micro,
        });
    }
    Ok(SetBillingInput {
        observation_payment_gjuels: require_flag(ctx, "observationPaymentGjuels")?,
        transmission_payment_gjuels: require_flag(ctx, "transmissionPaymentGjuels")?,
        recommended_gas_price_micro: require_flag(ctx, "recommendedGasPriceMicro")?,
    })
}

fn validate_input(input: &SetBillingInput) -> Result<(), InstructionError> {
    let raw_gas = &input.recommended_gas_price_micro;
    let gas = raw_gas.trim().parse::<f64>().ok().filter(|g| g.is_finite());
    let mut check = RuleCheck::new(VALIDATE_INPUT);
    check.ensure(gas.is_some(), || {
        format!("recommendedGasPriceMicro={} is not a valid floating point number.", raw_gas)
    });
    if let Some(gas) = gas {
        check.ensure(gas >= 0.0, || {
            format!("recommendedGasPriceMicro={} cannot be negative", raw_gas)
        });
    }

    let (observation, transmission) = (
        &input.observation_payment_gjuels,
        &input.transmission_payment_gjuels,
    );
    match (
        observation.trim().parse::<i128>(),
        transmission.trim().parse::<i128>(),
    ) {
        (Ok(o), Ok(t)) => {
            check.ensure(o >= 0 && t >= 0, || {
                format!(
                    "observationPaymentGjuels={} and transmissionPaymentGjuels={} cannot be negative",
                    observation, transmission
                )
            });
        }
        _ => {
            check.ensure(false, || {
                format!(
                    "observationPaymentGjuels={} and transmissionPaymentGjuels={} must both be integers",
                    observation, transmission
                )
            });
        }
    }
    check.finish()
}

fn gjuels(field: &str, value: &str) -> Result<u64, InstructionError> {
    value
        .trim()
        .parse()
        .map_err(|_| InstructionError::input(format!("{}={} does not fit a u64", field, value)))
}

fn make_contract_input(input: &SetBillingInput) -> Result<SetBillingMsg, InstructionError> {
    Ok(SetBillingMsg {
        config: BillingConfig {
            observation_payment_gjuels: gjuels(
                "observationPaymentGjuels",
                &input.observation_payment_gjuels,
            )?,
            transmission_payment_gjuels: gjuels(
                "transmissionPaymentGjuels",
                &input.transmission_payment_gjuels,
            )?,
            recommended_gas_price_micro: input.recommended_gas_price_micro.trim().to_string(),
        },
    })
}

/// `ocr2:set_billing`
pub fn set_billing() -> Arc<dyn Command> {
    instruction_to_command(
        Instruction::new(id("set_billing"), make_input, make_contract_input)
            .with_validate_input(validate_input)
            .with_examples(&[
                "gauntlet ocr2:set_billing --network=local --rdd=./rdd.json <CONTRACT_ADDRESS>",
                "gauntlet ocr2:set_billing --network=local --observationPaymentGjuels=1 --transmissionPaymentGjuels=1 --recommendedGasPriceMicro=0.01 <CONTRACT_ADDRESS>",
            ]),
    )
}
