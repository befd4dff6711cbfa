// Path: crates/contracts/src/ocr2/offchain.rs

use super::{id, SET_CONFIG_EVENT};
use crate::input::{rdd, rdd_key, require_proposal_id, RuleCheck, VALIDATE_INPUT};
use futures_util::future::{BoxFuture, FutureExt};
use gauntlet_crypto::generate_secret_words;
use gauntlet_crypto::secret::validate_secret_words;
use gauntlet_execution::diff::{diff, render};
use gauntlet_execution::{
    first_tx, instruction_to_command, Command, ExecutionInput, Instruction, InstructionContext,
};
use gauntlet_ocr2::rdd::offchain_config_from_rdd;
use gauntlet_ocr2::{
    config_public_key, deserialize_base64, offchain_public_key, prepare_for_diff, serialize,
    validate_offchain_config, OffchainConfig, DEFAULT_OFFCHAIN_CONFIG_VERSION,
};
use gauntlet_types::app::CommandResult;
use gauntlet_types::error::InstructionError;
use gauntlet_types::flags::FlagsExt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// An offchain config ready to be encrypted and proposed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposeOffchainConfigInput {
    /// The open proposal.
    pub proposal_id: String,
    /// The config.
    pub offchain_config: OffchainConfig,
    /// The wire version written to the contract.
    pub offchain_config_version: u64,
    /// Config encryption keys, one per oracle.
    pub config_public_keys: Vec<String>,
    /// The operator secret.
    pub secret: String,
    /// The random secret words; generated when not supplied.
    pub random_secret: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFlagInput {
    offchain_config: OffchainConfig,
    config_public_keys: Vec<String>,
    #[serde(default)]
    offchain_config_version: Option<u64>,
}

#[derive(Debug, Serialize)]
struct ProposeOffchainConfigMsg {
    id: String,
    offchain_config_version: u64,
    offchain_config: String,
}

fn make_input(
    ctx: &InstructionContext,
    args: &[String],
) -> Result<ProposeOffchainConfigInput, InstructionError> {
    let secret = ctx.providers.secrets.require_secret()?;
    let proposal_id = require_proposal_id(ctx)?;

    let (offchain_config, config_public_keys, version) = match rdd(ctx)? {
        Some(rdd) => {
            let built = offchain_config_from_rdd(&rdd, rdd_key(ctx, args)?)?;
            (built.offchain_config, built.config_public_keys, None)
        }
        None => {
            let given: ConfigFlagInput = ctx.flags.input()?.ok_or_else(|| {
                InstructionError::input("Either --rdd or --input with the offchain config is required")
            })?;
            (
                given.offchain_config,
                given.config_public_keys,
                given.offchain_config_version,
            )
        }
    };

    let random_secret = match ctx.flags.string_of(&["randomSecret"]) {
        Some(words) => {
            validate_secret_words(&words)?;
            words
        }
        None => generate_secret_words()?,
    };
    let offchain_config_version = match ctx.flags.u64_of("offchainConfigVersion")? {
        Some(v) => v,
        None => version.unwrap_or(DEFAULT_OFFCHAIN_CONFIG_VERSION),
    };

    Ok(ProposeOffchainConfigInput {
        proposal_id,
        offchain_config,
        offchain_config_version,
        config_public_keys,
        secret,
        random_secret,
    })
}

fn validate_input(input: &ProposeOffchainConfigInput) -> Result<(), InstructionError> {
    let keys = input.config_public_keys.len();
    let peers = input.offchain_config.peer_ids.len();
    RuleCheck::new(VALIDATE_INPUT)
        .ensure(keys == peers, || {
            format!(
                "Expected one config public key per oracle: {} keys for {} peers",
                keys, peers
            )
        })
        .finish()
}

fn valid_offchain_config(input: &ProposeOffchainConfigInput) -> Result<(), InstructionError> {
    validate_offchain_config(&input.offchain_config)
}

/// One failure per key that would not encode.
fn valid_keys(input: &ProposeOffchainConfigInput) -> Result<(), InstructionError> {
    let mut check = RuleCheck::new("validKeys");
    for key in &input.offchain_config.offchain_public_keys {
        if let Err(e) = offchain_public_key(key) {
            check.ensure(false, || format!("Offchain public key: {}", e));
        }
    }
    for key in &input.config_public_keys {
        if let Err(e) = config_public_key(key) {
            check.ensure(false, || format!("Config public key: {}", e));
        }
    }
    check.finish()
}

fn make_contract_input(
    input: &ProposeOffchainConfigInput,
) -> Result<ProposeOffchainConfigMsg, InstructionError> {
    let encoded = serialize(
        &input.offchain_config,
        &input.config_public_keys,
        &input.secret,
        Some(&input.random_secret),
    )?;
    Ok(ProposeOffchainConfigMsg {
        id: input.proposal_id.clone(),
        offchain_config_version: input.offchain_config_version,
        offchain_config: encoded.to_base64(),
    })
}

fn print_secret(words: &str) {
    println!(
        "\nImportant: save the secret words below. They are needed to accept the proposal:\n{}\n",
        words
    );
}

fn review_changes<'a>(
    ctx: &'a InstructionContext,
    input: &'a ExecutionInput<ProposeOffchainConfigInput, ProposeOffchainConfigMsg>,
) -> BoxFuture<'a, Result<(), InstructionError>> {
    async move {
        let contract = ctx.require_contract()?;
        let latest = ctx
            .providers
            .querier
            .latest_event(contract, SET_CONFIG_EVENT)
            .await?;

        let mut extra = Map::new();
        let current = match &latest {
            Some(event) => {
                if let Some(f) = event.attribute("f") {
                    extra.insert("f".into(), Value::String(f.to_string()));
                }
                deserialize_base64(event.attribute("offchain_config").unwrap_or_default())
            }
            None => {
                tracing::info!(target: "ocr2", contract, "no config set yet, diffing against an empty config");
                OffchainConfig::default()
            }
        };

        let changes = diff(
            &prepare_for_diff(&current, extra),
            &prepare_for_diff(&input.user.offchain_config, Map::new()),
        );
        println!("Review the proposed changes below: green - added, red - deleted.");
        print!("{}", render(&changes, true));
        print_secret(&input.user.random_secret);
        Ok(())
    }
    .boxed()
}

fn offchain_config_proposed<'a>(
    _: &'a InstructionContext,
    input: &'a ExecutionInput<ProposeOffchainConfigInput, ProposeOffchainConfigMsg>,
    result: &'a CommandResult,
) -> BoxFuture<'a, Result<Map<String, Value>, InstructionError>> {
    async move {
        let tx = first_tx(result)?;
        println!(
            "✅ Offchain config proposed for proposal {} (tx {})",
            input.user.proposal_id, tx.transaction_hash
        );
        print_secret(&input.user.random_secret);
        let mut data = Map::new();
        data.insert(
            "secret".into(),
            Value::String(input.user.random_secret.clone()),
        );
        Ok(data)
    }
    .boxed()
}

/// `ocr2:propose_offchain_config`
///
/// Needs `SECRET` in the environment. The random secret words are returned
/// as `secret`, for `accept_proposal`.
pub fn propose_offchain_config() -> Arc<dyn Command> {
    instruction_to_command(
        Instruction::new(id("propose_offchain_config"), make_input, make_contract_input)
            .with_validate_input(validate_input)
            .with_validation("validOffchainConfig", valid_offchain_config)
            .with_validation("validKeys", valid_keys)
            .with_before_execute(review_changes)
            .with_after_execute(offchain_config_proposed)
            .with_examples(&[
                "SECRET=\"<SECRET>\" gauntlet ocr2:propose_offchain_config --network=local --rdd=./rdd.json --proposalId=<ID> <CONTRACT_ADDRESS>",
            ]),
    )
}
