// Path: crates/contracts/src/lib.rs
//! # Gauntlet Contracts Crate Lints
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
//! # Gauntlet Contracts
//!
//! The instructions of every contract the CLI manages, the OCR2 initialize
//! flow, the contract artifact registry and the `upload` command. Everything
//! here is data for the pipeline in `gauntlet-execution`: each module builds
//! its commands with `instruction_to_command`.

pub mod access_controller;
pub mod artifacts;
pub mod cw4_group;
pub mod deviation_flagging_validator;
pub mod flags;
pub mod ocr2;
pub mod proxy_ocr2;
pub mod token;
pub mod upload;

mod input;

pub use artifacts::{ContractId, ContractRegistry};
pub use upload::UploadCommand;

use gauntlet_execution::CommandRegistry;

/// Every instruction, inspection and flow command, undecorated.
///
/// `upload` depends on the active network and is registered by the caller.
pub fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry
        .extend(ocr2::commands())
        .extend([
            flags::deploy(),
            deviation_flagging_validator::deploy(),
            proxy_ocr2::deploy(),
            access_controller::deploy(),
            cw4_group::deploy(),
            token::deploy(),
        ]);
    registry
}
