// Path: crates/api/src/lib.rs

//! # Gauntlet API Crate Lints
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
//! # Gauntlet API
//!
//! Core traits for the collaborators the instruction pipeline drives but does
//! not own: transaction submission, chain queries, operator confirmation, the
//! secret source, the RDD source and the artifact source. Network plumbing implements these in the
//! CLI; tests implement them with recording mocks.

/// Contract bytecode resolution.
pub mod artifacts;
/// Submission and query traits.
pub mod chain;
/// Operator-facing traits: confirmation prompts and the secret source.
pub mod operator;
/// The RDD source trait and its file-backed implementation.
pub mod rdd;

/// A curated set of the most commonly used traits and types.
pub mod prelude {
    pub use crate::artifacts::ArtifactSource;
    pub use crate::chain::{ContractCall, Querier, Submitter};
    pub use crate::operator::{confirm_or_abort, Confirmer, EnvSecretSource, SecretSource};
    pub use crate::rdd::{FileRddSource, RddSource};
}
