// Path: crates/ocr2/src/rdd.rs

use crate::config::{OffchainConfig, ReportingPluginConfig};
use crate::duration::parse_duration_nanoseconds;
use gauntlet_types::error::ConfigError;
use gauntlet_types::rdd::{Rdd, RddOperator};

/// Everything `propose_config` and `propose_offchain_config` need, built from one
/// aggregator entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RddConfigInput {
    /// The fault-tolerance threshold.
    pub f: u8,
    /// Onchain signing keys, one per oracle.
    pub signers: Vec<String>,
    /// Transmitter addresses, one per oracle.
    pub transmitters: Vec<String>,
    /// Payee addresses, one per oracle.
    pub payees: Vec<String>,
    /// The offchain config.
    pub offchain_config: OffchainConfig,
    /// Config encryption keys, one per oracle, prefixes intact.
    pub config_public_keys: Vec<String>,
}

fn duration(field: &str, value: &str) -> Result<i64, ConfigError> {
    parse_duration_nanoseconds(value)
        .map_err(|e| ConfigError::Invalid(format!("{}: {}", field, e)))
}

fn first(name: &str, field: &str, values: &[String]) -> Result<String, ConfigError> {
    values
        .first()
        .cloned()
        .ok_or_else(|| ConfigError::Invalid(format!("Operator {} has no {}", name, field)))
}

fn ppb(field: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{} must be a non-negative integer, got '{}'", field, value)))
}

/// Builds the config input for `contract` from the RDD.
pub fn offchain_config_from_rdd(rdd: &Rdd, contract: &str) -> Result<RddConfigInput, ConfigError> {
    let aggregator = rdd.contract(contract)?;
    let config = &aggregator.config;
    let operators: Vec<(&str, &RddOperator)> = aggregator
        .oracles
        .iter()
        .map(|o| o.operator.as_str())
        .zip(rdd.operators_of(aggregator)?)
        .collect();

    let mut input = RddConfigInput {
        f: config.f,
        ..Default::default()
    };
    let mut offchain_public_keys = Vec::with_capacity(operators.len());
    let mut peer_ids = Vec::with_capacity(operators.len());

    for (name, op) in &operators {
        offchain_public_keys.push(first(name, "ocr2OffchainPublicKey", &op.ocr2_offchain_public_key)?);
        peer_ids.push(first(name, "peerId", &op.peer_id)?);
        input
            .config_public_keys
            .push(first(name, "ocr2ConfigPublicKey", &op.ocr2_config_public_key)?);
        input
            .signers
            .push(first(name, "ocr2OnchainPublicKey", &op.ocr2_onchain_public_key)?);
        input
            .transmitters
            .push(first(name, "ocrNodeAddress", &op.ocr_node_address)?);
        if let Some(payee) = &op.payee_address {
            input.payees.push(payee.clone());
        }
    }

    let rpc = &config.reporting_plugin_config;
    input.offchain_config = OffchainConfig {
        delta_progress_nanoseconds: duration("deltaProgress", &config.delta_progress)?,
        delta_resend_nanoseconds: duration("deltaResend", &config.delta_resend)?,
        delta_round_nanoseconds: duration("deltaRound", &config.delta_round)?,
        delta_grace_nanoseconds: duration("deltaGrace", &config.delta_grace)?,
        delta_stage_nanoseconds: duration("deltaStage", &config.delta_stage)?,
        r_max: config.r_max,
        s: config.s.clone(),
        offchain_public_keys,
        peer_ids,
        reporting_plugin_config: ReportingPluginConfig {
            alpha_report_infinite: rpc.alpha_report_infinite,
            alpha_report_ppb: ppb("alphaReportPpb", &rpc.alpha_report_ppb)?,
            alpha_accept_infinite: rpc.alpha_accept_infinite,
            alpha_accept_ppb: ppb("alphaAcceptPpb", &rpc.alpha_accept_ppb)?,
            delta_c_nanoseconds: duration("deltaC", &rpc.delta_c)?,
        },
        max_duration_query_nanoseconds: duration("maxDurationQuery", &config.max_duration_query)?,
        max_duration_observation_nanoseconds: duration(
            "maxDurationObservation",
            &config.max_duration_observation,
        )?,
        max_duration_report_nanoseconds: duration("maxDurationReport", &config.max_duration_report)?,
        max_duration_should_accept_finalized_report_nanoseconds: duration(
            "maxDurationShouldAcceptFinalizedReport",
            &config.max_duration_should_accept_finalized_report,
        )?,
        max_duration_should_transmit_accepted_report_nanoseconds: duration(
            "maxDurationShouldTransmitAcceptedReport",
            &config.max_duration_should_transmit_accepted_report,
        )?,
    };

    tracing::debug!(
        target: "ocr2",
        contract,
        oracles = operators.len(),
        "built offchain config from RDD"
    );
    Ok(input)
}
