// Path: crates/types/src/rdd.rs

//! The reporting-directory-data (RDD) model.
//!
//! The RDD is a static JSON document describing the intended operator set and
//! the timing parameters of every aggregator. It is read-only input to input
//! construction; nothing in the CLI writes it.

use crate::error::ConfigError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// The whole RDD document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rdd {
    /// Aggregators keyed by contract address (or a temporary id before deployment).
    #[serde(default)]
    pub contracts: BTreeMap<String, RddContract>,
    /// Node operators keyed by name.
    #[serde(default)]
    pub operators: BTreeMap<String, RddOperator>,
}

impl Rdd {
    /// Reads and parses an RDD file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Looks up an aggregator by its key.
    pub fn contract(&self, key: &str) -> Result<&RddContract, ConfigError> {
        self.contracts
            .get(key)
            .ok_or_else(|| ConfigError::Invalid(format!("Contract {} not found in RDD", key)))
    }

    /// Resolves the operators of an aggregator, in oracle order.
    pub fn operators_of(&self, contract: &RddContract) -> Result<Vec<&RddOperator>, ConfigError> {
        contract
            .oracles
            .iter()
            .map(|o| {
                self.operators.get(&o.operator).ok_or_else(|| {
                    ConfigError::Invalid(format!("Operator {} not found in RDD", o.operator))
                })
            })
            .collect()
    }
}

/// One aggregator entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RddContract {
    /// OCR2 timing and fault-tolerance parameters.
    pub config: RddOcrConfig,
    /// Billing parameters for `set_billing`.
    #[serde(default)]
    pub billing: Option<RddBilling>,
    /// The oracles serving this aggregator.
    #[serde(default)]
    pub oracles: Vec<RddOracle>,
    /// The feed description, e.g. `ETH / USD`.
    #[serde(default)]
    pub name: Option<String>,
    /// The number of decimals of reported answers.
    #[serde(default)]
    pub decimals: Option<u8>,
    /// The smallest answer the aggregator accepts.
    #[serde(default)]
    pub min_submission_value: Option<String>,
    /// The largest answer the aggregator accepts.
    #[serde(default)]
    pub max_submission_value: Option<String>,
}

/// A reference from an aggregator to an operator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RddOracle {
    /// The operator name, a key into [`Rdd::operators`].
    pub operator: String,
}

/// Billing parameters, amounts as decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RddBilling {
    /// Payment per observation, in gjuels.
    #[serde(deserialize_with = "string_or_number")]
    pub observation_payment_gjuels: String,
    /// Payment per transmission, in gjuels.
    #[serde(deserialize_with = "string_or_number")]
    pub transmission_payment_gjuels: String,
    /// The recommended gas price in micro units, a float string.
    #[serde(deserialize_with = "string_or_number")]
    pub recommended_gas_price_micro: String,
}

/// OCR2 parameters with Go-style duration strings (`"200ms"`, `"1m30s"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RddOcrConfig {
    /// The fault-tolerance threshold.
    pub f: u8,
    /// The maximum number of rounds per epoch.
    pub r_max: i64,
    /// The transmission schedule.
    #[serde(default)]
    pub s: Vec<i64>,
    /// DeltaProgress.
    pub delta_progress: String,
    /// DeltaResend.
    pub delta_resend: String,
    /// DeltaRound.
    pub delta_round: String,
    /// DeltaGrace.
    pub delta_grace: String,
    /// DeltaStage.
    pub delta_stage: String,
    /// MaxDurationQuery.
    pub max_duration_query: String,
    /// MaxDurationObservation.
    pub max_duration_observation: String,
    /// MaxDurationReport.
    pub max_duration_report: String,
    /// MaxDurationShouldAcceptFinalizedReport.
    pub max_duration_should_accept_finalized_report: String,
    /// MaxDurationShouldTransmitAcceptedReport.
    pub max_duration_should_transmit_accepted_report: String,
    /// Median reporting plugin parameters.
    pub reporting_plugin_config: RddReportingPluginConfig,
}

/// Median reporting plugin parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RddReportingPluginConfig {
    /// Whether the report deviation threshold is infinite.
    #[serde(default)]
    pub alpha_report_infinite: bool,
    /// The report deviation threshold in parts per billion.
    #[serde(deserialize_with = "string_or_number")]
    pub alpha_report_ppb: String,
    /// Whether the accept deviation threshold is infinite.
    #[serde(default)]
    pub alpha_accept_infinite: bool,
    /// The accept deviation threshold in parts per billion.
    #[serde(deserialize_with = "string_or_number")]
    pub alpha_accept_ppb: String,
    /// The heartbeat, as a duration string.
    pub delta_c: String,
}

/// A node operator and its per-chain key material. Keys are lists because an
/// operator can run several nodes; the first entry is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RddOperator {
    /// Offchain signing keys, `ocr2off_cosmos_`-prefixed hex.
    #[serde(default)]
    pub ocr2_offchain_public_key: Vec<String>,
    /// Onchain signing keys, `ocr2on_cosmos_`-prefixed hex.
    #[serde(default)]
    pub ocr2_onchain_public_key: Vec<String>,
    /// Config encryption keys, `ocr2cfg_cosmos_`-prefixed hex.
    #[serde(default)]
    pub ocr2_config_public_key: Vec<String>,
    /// libp2p peer ids.
    #[serde(default)]
    pub peer_id: Vec<String>,
    /// Transmitter account addresses.
    #[serde(default)]
    pub ocr_node_address: Vec<String>,
    /// The account that receives payments.
    #[serde(default)]
    pub payee_address: Option<String>,
    /// A human-readable name.
    #[serde(default)]
    pub display_name: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        S(String),
        N(serde_json::Number),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::S(s) => s,
        Raw::N(n) => n.to_string(),
    })
}
