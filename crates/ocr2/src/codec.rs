// Path: crates/ocr2/src/codec.rs
//! Encoding of an [`OffchainConfig`] into the versioned binary blob.

use crate::config::{OffchainConfig, ReportingPluginConfig};
use crate::proto::{NumericalMedianConfigProto, OffchainConfigProto};
use base64::Engine as _;
use gauntlet_crypto::encryption::config_public_key_from_hex;
use gauntlet_crypto::{derive_secrets, encrypt_shared_secret, generate_secret_words};
use gauntlet_types::error::CodecError;
use prost::Message;

/// Network prefix of offchain signing keys in the RDD.
pub const OFFCHAIN_PUBLIC_KEY_PREFIX: &str = "ocr2off_cosmos_";
/// Network prefix of config encryption keys in the RDD.
pub const CONFIG_PUBLIC_KEY_PREFIX: &str = "ocr2cfg_cosmos_";

/// The output of [`serialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedOffchainConfig {
    /// The protobuf blob submitted on-chain.
    pub offchain_config_bytes: Vec<u8>,
    /// The random words the blob was encrypted with; generated when not supplied.
    pub random_secret_words: String,
}

impl SerializedOffchainConfig {
    /// The blob as the contract expects it.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.offchain_config_bytes)
    }
}

/// What to do when a blob cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeFallback {
    /// Treat any decode failure as "no config on chain": the empty config.
    #[default]
    AbsentConfig,
}

impl DecodeFallback {
    /// Applies the policy to a decode result.
    pub fn apply(self, decoded: Result<OffchainConfig, CodecError>) -> OffchainConfig {
        match (self, decoded) {
            (_, Ok(config)) => config,
            (DecodeFallback::AbsentConfig, Err(e)) => {
                tracing::debug!(target: "ocr2", error = %e, "offchain config not decodable, treating as absent");
                OffchainConfig::default()
            }
        }
    }
}

fn strip_prefix<'a>(key: &'a str, prefix: &str) -> &'a str {
    key.strip_prefix(prefix).unwrap_or(key)
}

/// Length of an offchain signing key.
pub const OFFCHAIN_PUBLIC_KEY_LEN: usize = 32;

/// The bytes of an offchain signing key given as hex, with or without its prefix.
pub fn offchain_public_key(key: &str) -> Result<[u8; OFFCHAIN_PUBLIC_KEY_LEN], CodecError> {
    let stripped = strip_prefix(key, OFFCHAIN_PUBLIC_KEY_PREFIX);
    let raw = hex::decode(stripped.trim_start_matches("0x")).map_err(|e| CodecError::InvalidPublicKey {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    <[u8; OFFCHAIN_PUBLIC_KEY_LEN]>::try_from(raw.as_slice()).map_err(|_| CodecError::InvalidPublicKey {
        key: key.to_string(),
        reason: format!("expected {} bytes, got {}", OFFCHAIN_PUBLIC_KEY_LEN, raw.len()),
    })
}

/// The bytes of a config encryption key given as hex, with or without its prefix.
pub fn config_public_key(key: &str) -> Result<[u8; 32], CodecError> {
    config_public_key_from_hex(strip_prefix(key, CONFIG_PUBLIC_KEY_PREFIX))
}

fn unsigned(name: &str, value: i64) -> Result<u64, CodecError> {
    u64::try_from(value)
        .map_err(|_| CodecError::Encode(format!("{} must be non-negative, got {}", name, value)))
}

fn signed(name: &str, value: u64) -> Result<i64, CodecError> {
    i64::try_from(value).map_err(|_| CodecError::Decode(format!("{} overflows: {}", name, value)))
}

fn to_proto(config: &OffchainConfig) -> Result<OffchainConfigProto, CodecError> {
    let rpc = &config.reporting_plugin_config;
    let median = NumericalMedianConfigProto {
        alpha_report_infinite: rpc.alpha_report_infinite,
        alpha_report_ppb: rpc.alpha_report_ppb,
        alpha_accept_infinite: rpc.alpha_accept_infinite,
        alpha_accept_ppb: rpc.alpha_accept_ppb,
        delta_c_nanoseconds: unsigned("deltaCNanoseconds", rpc.delta_c_nanoseconds)?,
    };

    Ok(OffchainConfigProto {
        delta_progress_nanoseconds: unsigned("deltaProgressNanoseconds", config.delta_progress_nanoseconds)?,
        delta_resend_nanoseconds: unsigned("deltaResendNanoseconds", config.delta_resend_nanoseconds)?,
        delta_round_nanoseconds: unsigned("deltaRoundNanoseconds", config.delta_round_nanoseconds)?,
        delta_grace_nanoseconds: unsigned("deltaGraceNanoseconds", config.delta_grace_nanoseconds)?,
        delta_stage_nanoseconds: unsigned("deltaStageNanoseconds", config.delta_stage_nanoseconds)?,
        r_max: u32::try_from(config.r_max)
            .map_err(|_| CodecError::Encode(format!("rMax out of range: {}", config.r_max)))?,
        s: config
            .s
            .iter()
            .map(|v| u32::try_from(*v).map_err(|_| CodecError::Encode(format!("S entry out of range: {}", v))))
            .collect::<Result<_, _>>()?,
        offchain_public_keys: config
            .offchain_public_keys
            .iter()
            .map(|k| offchain_public_key(k).map(|b| b.to_vec()))
            .collect::<Result<_, _>>()?,
        peer_ids: config.peer_ids.clone(),
        reporting_plugin_config: median.encode_to_vec(),
        max_duration_query_nanoseconds: unsigned(
            "maxDurationQueryNanoseconds",
            config.max_duration_query_nanoseconds,
        )?,
        max_duration_observation_nanoseconds: unsigned(
            "maxDurationObservationNanoseconds",
            config.max_duration_observation_nanoseconds,
        )?,
        max_duration_report_nanoseconds: unsigned(
            "maxDurationReportNanoseconds",
            config.max_duration_report_nanoseconds,
        )?,
        max_duration_should_accept_finalized_report_nanoseconds: unsigned(
            "maxDurationShouldAcceptFinalizedReportNanoseconds",
            config.max_duration_should_accept_finalized_report_nanoseconds,
        )?,
        max_duration_should_transmit_accepted_report_nanoseconds: unsigned(
            "maxDurationShouldTransmitAcceptedReportNanoseconds",
            config.max_duration_should_transmit_accepted_report_nanoseconds,
        )?,
        shared_secret_encryptions: None,
    })
}

fn from_proto(proto: OffchainConfigProto) -> Result<OffchainConfig, CodecError> {
    let median = proto
        .median_config()
        .map_err(|e| CodecError::Decode(format!("reporting plugin config: {}", e)))?;

    Ok(OffchainConfig {
        delta_progress_nanoseconds: signed("deltaProgressNanoseconds", proto.delta_progress_nanoseconds)?,
        delta_resend_nanoseconds: signed("deltaResendNanoseconds", proto.delta_resend_nanoseconds)?,
        delta_round_nanoseconds: signed("deltaRoundNanoseconds", proto.delta_round_nanoseconds)?,
        delta_grace_nanoseconds: signed("deltaGraceNanoseconds", proto.delta_grace_nanoseconds)?,
        delta_stage_nanoseconds: signed("deltaStageNanoseconds", proto.delta_stage_nanoseconds)?,
        r_max: i64::from(proto.r_max),
        s: proto.s.iter().map(|v| i64::from(*v)).collect(),
        offchain_public_keys: proto.offchain_public_keys.iter().map(hex::encode).collect(),
        peer_ids: proto.peer_ids,
        reporting_plugin_config: ReportingPluginConfig {
            alpha_report_infinite: median.alpha_report_infinite,
            alpha_report_ppb: median.alpha_report_ppb,
            alpha_accept_infinite: median.alpha_accept_infinite,
            alpha_accept_ppb: median.alpha_accept_ppb,
            delta_c_nanoseconds: signed("deltaCNanoseconds", median.delta_c_nanoseconds)?,
        },
        max_duration_query_nanoseconds: signed(
            "maxDurationQueryNanoseconds",
            proto.max_duration_query_nanoseconds,
        )?,
        max_duration_observation_nanoseconds: signed(
            "maxDurationObservationNanoseconds",
            proto.max_duration_observation_nanoseconds,
        )?,
        max_duration_report_nanoseconds: signed(
            "maxDurationReportNanoseconds",
            proto.max_duration_report_nanoseconds,
        )?,
        max_duration_should_accept_finalized_report_nanoseconds: signed(
            "maxDurationShouldAcceptFinalizedReportNanoseconds",
            proto.max_duration_should_accept_finalized_report_nanoseconds,
        )?,
        max_duration_should_transmit_accepted_report_nanoseconds: signed(
            "maxDurationShouldTransmitAcceptedReportNanoseconds",
            proto.max_duration_should_transmit_accepted_report_nanoseconds,
        )?,
    })
}

/// Encodes `config` into the on-chain blob.
///
/// The shared secret is derived from `secret` and `random_secret_words` and
/// encrypted to each of `config_public_keys` (hex, `ocr2cfg_cosmos_` prefix
/// optional). When no words are supplied a fresh 12-word phrase is generated
/// and returned. The output is byte-identical for identical inputs.
pub fn serialize(
    config: &OffchainConfig,
    config_public_keys: &[String],
    secret: &str,
    random_secret_words: Option<&str>,
) -> Result<SerializedOffchainConfig, CodecError> {
    let words = match random_secret_words {
        Some(w) if !w.trim().is_empty() => w.to_string(),
        _ => generate_secret_words()?,
    };

    let recipients = config_public_keys
        .iter()
        .map(|k| config_public_key(k))
        .collect::<Result<Vec<_>, _>>()?;
    let secrets = derive_secrets(secret, &words)?;

    let mut proto = to_proto(config)?;
    proto.shared_secret_encryptions = Some(encrypt_shared_secret(&recipients, &secrets).into());

    Ok(SerializedOffchainConfig {
        offchain_config_bytes: proto.encode_to_vec(),
        random_secret_words: words,
    })
}

/// Decodes a blob, reporting every failure.
pub fn try_deserialize(bytes: &[u8]) -> Result<OffchainConfig, CodecError> {
    let proto = OffchainConfigProto::decode(bytes).map_err(|e| CodecError::Decode(e.to_string()))?;
    from_proto(proto)
}

/// Decodes a blob. Never fails: undecodable input is an absent config.
pub fn deserialize(bytes: &[u8]) -> OffchainConfig {
    DecodeFallback::AbsentConfig.apply(try_deserialize(bytes))
}

/// Decodes a base64 blob as read from a contract event. Never fails.
pub fn deserialize_base64(encoded: &str) -> OffchainConfig {
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| CodecError::Decode(format!("base64: {}", e)))
        .and_then(|bytes| try_deserialize(&bytes));
    DecodeFallback::AbsentConfig.apply(decoded)
}
