// Path: crates/cli/src/lib.rs
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

//! # Gauntlet CLI Library
//!
//! Drives the instruction pipeline against a live chain. This crate holds no
//! contract logic of its own: it loads a network profile, connects the
//! collaborators the pipeline needs and runs one command from the registry.
//!
//! - `providers`: the LCD querier, the signing gateway submitter and the
//!   terminal confirmer.
//! - `setup`: network profile loading and registry wiring.
//! - `commands`: the `list` and command-execution entry points.
//! - `report`: the `<REPORT_NAME>.json` writer.

pub mod commands;
pub mod providers;
pub mod report;
pub mod setup;
