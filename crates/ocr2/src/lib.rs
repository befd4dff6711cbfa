// Path: crates/ocr2/src/lib.rs
//! # Gauntlet OCR2 Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free code. Panics are disallowed in non-test code to promote
//! robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
//! # Gauntlet OCR2
//!
//! The OCR2 offchain config: its model, the versioned binary wire format it is
//! proposed on-chain in, the timing-safety rules checked before any proposal,
//! and the mapping from RDD entries to a config.

/// The offchain config model.
pub mod config;
/// Go-style duration strings.
pub mod duration;
/// Protobuf messages of the wire format.
pub mod proto;
/// Building config inputs from RDD entries.
pub mod rdd;
/// The timing-safety and size rules.
pub mod validator;

mod codec;

pub use codec::{
    config_public_key, deserialize, deserialize_base64, offchain_public_key, serialize,
    try_deserialize, DecodeFallback, SerializedOffchainConfig, CONFIG_PUBLIC_KEY_PREFIX,
    OFFCHAIN_PUBLIC_KEY_LEN, OFFCHAIN_PUBLIC_KEY_PREFIX,
};
pub use config::{prepare_for_diff, OffchainConfig, ReportingPluginConfig};
pub use validator::{validate_offchain_config, ORACLES_MAX_LENGTH, SAFE_INTERVAL_NANOSECONDS};

/// The offchain config version written by this tool.
pub const DEFAULT_OFFCHAIN_CONFIG_VERSION: u64 = 2;
