// Path: crates/test_utils/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Gauntlet Test Utilities
//!
//! Recording mock collaborators, an RDD fixture and assertion macros for
//! testing instructions and flows without a chain.

pub mod assertions;
pub mod fixtures;
pub mod mocks;

pub use mocks::{MockQuerier, MockSubmitter, RecordedCall, ScriptedConfirmer, StaticSecret};
