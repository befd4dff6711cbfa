// Path: crates/ocr2/src/proto.rs
//! Protobuf messages of the offchain config blob.
//!
//! Field numbers are part of the on-chain format and must not change.

use prost::Message;

#[derive(Clone, PartialEq, Message)]
pub struct OffchainConfigProto {
    #[prost(uint64, tag = "1")]
    pub delta_progress_nanoseconds: u64,
    #[prost(uint64, tag = "2")]
    pub delta_resend_nanoseconds: u64,
    #[prost(uint64, tag = "3")]
    pub delta_round_nanoseconds: u64,
    #[prost(uint64, tag = "4")]
    pub delta_grace_nanoseconds: u64,
    #[prost(uint64, tag = "5")]
    pub delta_stage_nanoseconds: u64,
    #[prost(uint32, tag = "6")]
    pub r_max: u32,
    #[prost(uint32, repeated, tag = "7")]
    pub s: Vec<u32>,
    #[prost(bytes = "vec", repeated, tag = "8")]
    pub offchain_public_keys: Vec<Vec<u8>>,
    #[prost(string, repeated, tag = "9")]
    pub peer_ids: Vec<String>,
    /// An encoded [`NumericalMedianConfigProto`].
    #[prost(bytes = "vec", tag = "10")]
    pub reporting_plugin_config: Vec<u8>,
    #[prost(uint64, tag = "11")]
    pub max_duration_query_nanoseconds: u64,
    #[prost(uint64, tag = "12")]
    pub max_duration_observation_nanoseconds: u64,
    #[prost(uint64, tag = "13")]
    pub max_duration_report_nanoseconds: u64,
    #[prost(uint64, tag = "14")]
    pub max_duration_should_accept_finalized_report_nanoseconds: u64,
    #[prost(uint64, tag = "15")]
    pub max_duration_should_transmit_accepted_report_nanoseconds: u64,
    #[prost(message, optional, tag = "16")]
    pub shared_secret_encryptions: Option<SharedSecretEncryptionsProto>,
}

#[derive(Clone, PartialEq, Message)]
pub struct SharedSecretEncryptionsProto {
    #[prost(bytes = "vec", tag = "1")]
    pub diffie_hellman_point: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub shared_secret_hash: Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "3")]
    pub encryptions: Vec<Vec<u8>>,
}

/// The median plugin's parameters, nested as bytes in field 10.
#[derive(Clone, PartialEq, Message)]
pub struct NumericalMedianConfigProto {
    #[prost(bool, tag = "1")]
    pub alpha_report_infinite: bool,
    #[prost(uint64, tag = "2")]
    pub alpha_report_ppb: u64,
    #[prost(bool, tag = "3")]
    pub alpha_accept_infinite: bool,
    #[prost(uint64, tag = "4")]
    pub alpha_accept_ppb: u64,
    #[prost(uint64, tag = "5")]
    pub delta_c_nanoseconds: u64,
}

impl From<gauntlet_crypto::SharedSecretEncryptions> for SharedSecretEncryptionsProto {
    fn from(sse: gauntlet_crypto::SharedSecretEncryptions) -> Self {
        Self {
            diffie_hellman_point: sse.diffie_hellman_point,
            shared_secret_hash: sse.shared_secret_hash,
            encryptions: sse.encryptions,
        }
    }
}

impl From<SharedSecretEncryptionsProto> for gauntlet_crypto::SharedSecretEncryptions {
    fn from(p: SharedSecretEncryptionsProto) -> Self {
        Self {
            diffie_hellman_point: p.diffie_hellman_point,
            shared_secret_hash: p.shared_secret_hash,
            encryptions: p.encryptions,
        }
    }
}

impl OffchainConfigProto {
    /// Decodes the nested median config.
    pub fn median_config(&self) -> Result<NumericalMedianConfigProto, prost::DecodeError> {
        NumericalMedianConfigProto::decode(self.reporting_plugin_config.as_slice())
    }
}
