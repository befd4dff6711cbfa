// Path: crates/contracts/src/ocr2/proposal.rs
//! The config proposal lifecycle: begin, propose, finalize, accept.
//!
//! A proposal is opened by `begin_proposal`, filled by `propose_config` and
//! `propose_offchain_config`, sealed by `finalize_proposal` (which yields its
//! digest) and applied by `accept_proposal`. Each step is a separate
//! transaction; the initialize flow threads the proposal id and digest
//! between them.

use super::id;
use crate::input::{rdd, rdd_key, require_flag, require_proposal_id, RuleCheck, VALIDATE_INPUT};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use futures_util::future::{BoxFuture, FutureExt};
use gauntlet_execution::{
    instruction_to_command, result_attribute, Command, ExecutionInput, Instruction,
    InstructionContext,
};
use gauntlet_ocr2::rdd::{offchain_config_from_rdd, RddConfigInput};
use gauntlet_ocr2::validator::ORACLES_MAX_LENGTH;
use gauntlet_ocr2::{serialize, DEFAULT_OFFCHAIN_CONFIG_VERSION};
use gauntlet_types::app::{CommandResult, WASM_EVENT};
use gauntlet_types::error::InstructionError;
use gauntlet_types::flags::FlagsExt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Network prefix of onchain signing keys in the RDD.
pub const ONCHAIN_PUBLIC_KEY_PREFIX: &str = "ocr2on_cosmos_";

fn data(pairs: &[(&str, &str)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}

// begin_proposal

#[derive(Debug, Serialize)]
struct Empty {}

fn no_input(_: &InstructionContext, _: &[String]) -> Result<(), InstructionError> {
    Ok(())
}

fn empty(_: &()) -> Result<Empty, InstructionError> {
    Ok(Empty {})
}

fn proposal_opened<'a>(
    ctx: &'a InstructionContext,
    _: &'a ExecutionInput<(), Empty>,
    result: &'a CommandResult,
) -> BoxFuture<'a, Result<Map<String, Value>, InstructionError>> {
    async move {
        let proposal_id = result_attribute(result, WASM_EVENT, "proposal_id")?;
        tracing::info!(target: "ocr2", contract = ?ctx.contract, proposal = %proposal_id, "config proposal opened");
        println!("✅ Config Proposal {} started", proposal_id);
        Ok(data(&[("proposalId", proposal_id.as_str())]))
    }
    .boxed()
}

/// `ocr2:begin_proposal`
pub fn begin_proposal() -> Arc<dyn Command> {
    instruction_to_command(
        Instruction::new(id("begin_proposal"), no_input, empty)
            .with_after_execute(proposal_opened)
            .with_examples(&["gauntlet ocr2:begin_proposal --network=local <CONTRACT_ADDRESS>"]),
    )
}

// propose_config

/// The onchain half of a config proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposeConfigInput {
    /// The open proposal.
    pub proposal_id: String,
    /// The fault-tolerance threshold.
    pub f: u8,
    /// Onchain signing keys, hex, prefix optional.
    pub signers: Vec<String>,
    /// Transmitter addresses.
    pub transmitters: Vec<String>,
    /// Payee addresses.
    pub payees: Vec<String>,
    /// The onchain config, base64; empty for the median plugin.
    pub onchain_config: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OracleSet {
    f: u8,
    signers: Vec<String>,
    transmitters: Vec<String>,
    payees: Vec<String>,
    #[serde(default)]
    onchain_config: String,
}

#[derive(Debug, Serialize)]
struct ProposeConfigMsg {
    id: String,
    signers: Vec<String>,
    transmitters: Vec<String>,
    payees: Vec<String>,
    f: u8,
    onchain_config: String,
}

fn list(ctx: &InstructionContext, key: &str) -> Result<Vec<String>, InstructionError> {
    ctx.flags
        .list_of(key)
        .ok_or_else(|| InstructionError::input(format!("--{} is required", key)))
}

fn oracle_set(ctx: &InstructionContext, args: &[String]) -> Result<OracleSet, InstructionError> {
    if let Some(set) = ctx.flags.input()? {
        return Ok(set);
    }
    if let Some(rdd) = rdd(ctx)? {
        let RddConfigInput {
            f,
            signers,
            transmitters,
            payees,
            ..
        } = offchain_config_from_rdd(&rdd, rdd_key(ctx, args)?)?;
        return Ok(OracleSet {
            f,
            signers,
            transmitters,
            payees,
            onchain_config: String::new(),
        });
    }
    let f = ctx
        .flags
        .u64_of("f")?
        .ok_or_else(|| InstructionError::input("--f is required"))?;
    Ok(OracleSet {
        f: u8::try_from(f).map_err(|_| InstructionError::input(format!("--f {} is out of range", f)))?,
        signers: list(ctx, "signers")?,
        transmitters: list(ctx, "transmitters")?,
        payees: list(ctx, "payees")?,
        onchain_config: ctx.flags.string_of(&["onchainConfig"]).unwrap_or_default(),
    })
}

fn propose_config_input(
    ctx: &InstructionContext,
    args: &[String],
) -> Result<ProposeConfigInput, InstructionError> {
    let proposal_id = require_proposal_id(ctx)?;
    let set = oracle_set(ctx, args)?;
    Ok(ProposeConfigInput {
        proposal_id,
        f: set.f,
        signers: set.signers,
        transmitters: set.transmitters,
        payees: set.payees,
        onchain_config: set.onchain_config,
    })
}

fn validate_oracle_set(input: &ProposeConfigInput) -> Result<(), InstructionError> {
    let n = input.signers.len();
    let f = usize::from(input.f);
    let mut check = RuleCheck::new(VALIDATE_INPUT);
    check
        .ensure(n > 0, || "At least one oracle is required".to_string())
        .ensure(
            input.transmitters.len() == n && input.payees.len() == n,
            || {
                format!(
                    "Signers ({}), transmitters ({}) and payees ({}) must have the same length",
                    n,
                    input.transmitters.len(),
                    input.payees.len()
                )
            },
        )
        .ensure(i64::try_from(n).map_or(false, |n| n <= ORACLES_MAX_LENGTH), || {
            format!("Too many oracles: {} (max {})", n, ORACLES_MAX_LENGTH)
        })
        .ensure(f > 0, || "f must be greater than 0".to_string())
        .ensure(3 * f < n, || {
            format!("Faulty oracles f ({}) must be less than a third of the oracles ({})", f, n)
        });
    check.finish()
}

fn signer_bytes(signer: &str) -> Result<Vec<u8>, String> {
    let raw = signer
        .strip_prefix(ONCHAIN_PUBLIC_KEY_PREFIX)
        .unwrap_or(signer)
        .trim_start_matches("0x");
    match hex::decode(raw) {
        Ok(bytes) if !bytes.is_empty() => Ok(bytes),
        Ok(_) => Err(format!("Signer '{}' is empty", signer)),
        Err(e) => Err(format!("Signer '{}' is not valid hex: {}", signer, e)),
    }
}

fn valid_signers(input: &ProposeConfigInput) -> Result<(), InstructionError> {
    let mut check = RuleCheck::new("validSigners");
    for signer in &input.signers {
        let decoded = signer_bytes(signer);
        check.ensure(decoded.is_ok(), || decoded.err().unwrap_or_default());
    }
    check.finish()
}

fn valid_transmitters(input: &ProposeConfigInput) -> Result<(), InstructionError> {
    let mut check = RuleCheck::new("validTransmitters");
    for transmitter in &input.transmitters {
        check.address(transmitter, "Invalid transmitter address");
    }
    check.finish()
}

fn valid_payees(input: &ProposeConfigInput) -> Result<(), InstructionError> {
    let mut check = RuleCheck::new("validPayees");
    for payee in &input.payees {
        check.address(payee, "Invalid payee address");
    }
    check.finish()
}

fn propose_config_msg(input: &ProposeConfigInput) -> Result<ProposeConfigMsg, InstructionError> {
    let signers = input
        .signers
        .iter()
        .map(|s| signer_bytes(s).map(|b| BASE64.encode(b)))
        .collect::<Result<Vec<_>, _>>()
        .map_err(InstructionError::input)?;
    Ok(ProposeConfigMsg {
        id: input.proposal_id.clone(),
        signers,
        transmitters: input.transmitters.clone(),
        payees: input.payees.clone(),
        f: input.f,
        onchain_config: input.onchain_config.clone(),
    })
}

/// `ocr2:propose_config`
pub fn propose_config() -> Arc<dyn Command> {
    instruction_to_command(
        Instruction::new(id("propose_config"), propose_config_input, propose_config_msg)
            .with_validate_input(validate_oracle_set)
            .with_validation("validSigners", valid_signers)
            .with_validation("validTransmitters", valid_transmitters)
            .with_validation("validPayees", valid_payees)
            .with_examples(&[
                "gauntlet ocr2:propose_config --network=local --rdd=./rdd.json --proposalId=<ID> <CONTRACT_ADDRESS>",
            ]),
    )
}

// finalize_proposal

#[derive(Debug, Serialize)]
struct ProposalRef {
    id: String,
}

fn proposal_input(ctx: &InstructionContext, _: &[String]) -> Result<String, InstructionError> {
    require_proposal_id(ctx)
}

fn proposal_ref(proposal_id: &String) -> Result<ProposalRef, InstructionError> {
    Ok(ProposalRef {
        id: proposal_id.clone(),
    })
}

fn proposal_finalized<'a>(
    _: &'a InstructionContext,
    input: &'a ExecutionInput<String, ProposalRef>,
    result: &'a CommandResult,
) -> BoxFuture<'a, Result<Map<String, Value>, InstructionError>> {
    async move {
        let digest = result_attribute(result, WASM_EVENT, "digest")?;
        let proposal_id = &input.user;
        println!("✅ Config Proposal {} finalized", proposal_id);
        println!("Important: Save the config proposal DIGEST to accept the proposal in the future:");
        println!("{}", digest);
        Ok(data(&[("proposalId", proposal_id.as_str()), ("digest", digest.as_str())]))
    }
    .boxed()
}

/// `ocr2:finalize_proposal`
pub fn finalize_proposal() -> Arc<dyn Command> {
    instruction_to_command(
        Instruction::new(id("finalize_proposal"), proposal_input, proposal_ref)
            .with_after_execute(proposal_finalized)
            .with_examples(&[
                "gauntlet ocr2:finalize_proposal --network=local --configProposal=<ID> <CONTRACT_ADDRESS>",
            ]),
    )
}

// accept_proposal

/// Everything needed to verify and accept a finalized proposal.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptProposalInput {
    /// The finalized proposal.
    pub proposal_id: String,
    /// The digest returned by `finalize_proposal`, hex.
    pub digest: String,
    /// The random secret words the offchain config was encrypted with.
    pub random_secret: String,
    /// The operator secret.
    pub secret: String,
    /// The config the proposal is expected to hold.
    pub expected: RddConfigInput,
}

#[derive(Debug, Serialize)]
struct AcceptProposalMsg {
    id: String,
    digest: String,
}

fn accept_input(
    ctx: &InstructionContext,
    args: &[String],
) -> Result<AcceptProposalInput, InstructionError> {
    let secret = ctx.providers.secrets.require_secret()?;
    let proposal_id = require_proposal_id(ctx)?;
    let digest = require_flag(ctx, "digest")?;
    let random_secret = ctx
        .flags
        .string_of(&["randomSecret", "secret"])
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| {
            InstructionError::input(
                "--secret is required: the random secret words printed by ocr2:propose_offchain_config",
            )
        })?;
    let rdd = rdd(ctx)?.ok_or_else(|| {
        InstructionError::input("--rdd is required to verify the proposal before accepting it")
    })?;
    let expected = offchain_config_from_rdd(&rdd, rdd_key(ctx, args)?)?;
    Ok(AcceptProposalInput {
        proposal_id,
        digest,
        random_secret,
        secret,
        expected,
    })
}

fn digest_bytes(digest: &str) -> Result<Vec<u8>, String> {
    match hex::decode(digest.trim().trim_start_matches("0x")) {
        Ok(bytes) if !bytes.is_empty() => Ok(bytes),
        Ok(_) => Err("Digest is empty".to_string()),
        Err(e) => Err(format!("Digest '{}' is not valid hex: {}", digest, e)),
    }
}

fn validate_digest(input: &AcceptProposalInput) -> Result<(), InstructionError> {
    let decoded = digest_bytes(&input.digest);
    RuleCheck::new(VALIDATE_INPUT)
        .ensure(decoded.is_ok(), || decoded.err().unwrap_or_default())
        .finish()
}

fn accept_msg(input: &AcceptProposalInput) -> Result<AcceptProposalMsg, InstructionError> {
    Ok(AcceptProposalMsg {
        id: input.proposal_id.clone(),
        digest: BASE64.encode(digest_bytes(&input.digest).map_err(InstructionError::input)?),
    })
}

/// The rule name reported when the proposal differs from the RDD.
pub const PROPOSAL_MATCHES_RDD: &str = "proposalMatchesRdd";

fn verify_proposal<'a>(
    ctx: &'a InstructionContext,
    input: &'a ExecutionInput<AcceptProposalInput, AcceptProposalMsg>,
) -> BoxFuture<'a, Result<(), InstructionError>> {
    async move {
        let contract = ctx.require_contract()?;
        let user = &input.user;
        let query = serde_json::json!({ "proposal": { "id": user.proposal_id } });
        let proposal = ctx.providers.querier.query_contract(contract, &query).await?;
        let on_chain = proposal
            .get("offchain_config")
            .and_then(Value::as_str)
            .unwrap_or_default();

        let expected = serialize(
            &user.expected.offchain_config,
            &user.expected.config_public_keys,
            &user.secret,
            Some(&user.random_secret),
        )?
        .to_base64();

        if on_chain != expected {
            tracing::warn!(target: "ocr2", contract, proposal = %user.proposal_id, "proposed offchain config differs from the RDD");
            return Err(InstructionError::validation(
                PROPOSAL_MATCHES_RDD,
                format!(
                    "Offchain config of proposal {} does not match the RDD encoded with the given secret",
                    user.proposal_id
                ),
            ));
        }
        let version = proposal
            .get("offchain_config_version")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_OFFCHAIN_CONFIG_VERSION);
        println!(
            "✅ Proposal {} matches the RDD (offchain config version {})",
            user.proposal_id, version
        );
        Ok(())
    }
    .boxed()
}

fn proposal_accepted<'a>(
    _: &'a InstructionContext,
    input: &'a ExecutionInput<AcceptProposalInput, AcceptProposalMsg>,
    _: &'a CommandResult,
) -> BoxFuture<'a, Result<Map<String, Value>, InstructionError>> {
    async move {
        println!("✅ Config Proposal {} accepted", input.user.proposal_id);
        Ok(data(&[("proposalId", input.user.proposal_id.as_str())]))
    }
    .boxed()
}

/// `ocr2:accept_proposal`
pub fn accept_proposal() -> Arc<dyn Command> {
    instruction_to_command(
        Instruction::new(id("accept_proposal"), accept_input, accept_msg)
            .with_validate_input(validate_digest)
            .with_before_execute(verify_proposal)
            .with_after_execute(proposal_accepted)
            .with_examples(&[
                "gauntlet ocr2:accept_proposal --network=local --rdd=./rdd.json --configProposal=<ID> --digest=<DIGEST> --secret=\"<WORDS>\" <CONTRACT_ADDRESS>",
            ]),
    )
}
