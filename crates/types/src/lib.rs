// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Gauntlet Types
//!
//! This crate is the foundational library for the Gauntlet Cosmos CLI, containing
//! the transaction and event shapes returned by the chain, the result shape of
//! every command, network configuration, the RDD model and all error types.
//!
//! ## Architectural Role
//!
//! As the base crate, `gauntlet-types` has minimal dependencies and is itself a
//! dependency for every other crate in the workspace. This keeps the pipeline,
//! the codec and the per-contract instructions agreeing on one definition of
//! `TxResponse`, `CommandResult` and `InstructionError`.

/// Transaction, event and command result shapes.
pub mod app;
/// Network profiles loaded from `networks/<name>.toml`.
pub mod config;
/// A unified set of all error types used across the workspace.
pub mod error;
/// Untyped CLI flags and typed accessors over them.
pub mod flags;
/// The reporting-directory-data (RDD) model.
pub mod rdd;
