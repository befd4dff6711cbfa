// Path: crates/crypto/src/lib.rs
//! # Gauntlet Crypto Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free, and well-documented code. Panics are disallowed in non-test
//! code to promote robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]
//! # Gauntlet Cryptography
//!
//! Key material for OCR2 offchain configs: the random secret words that seed a
//! proposal, the derivation of an ephemeral X25519 key and a shared secret from
//! `SECRET` plus those words, and the per-operator encryptions of the shared
//! secret that travel inside the config blob.
//!
//! Everything here is deterministic given the same secret and words, so two
//! parties can independently reproduce a byte-identical blob.

pub mod algorithms;
pub mod encryption;
pub mod error;
pub mod secret;

pub use encryption::{encrypt_shared_secret, SharedSecretEncryptions};
pub use secret::{derive_secrets, generate_secret_words, DerivedSecrets};
