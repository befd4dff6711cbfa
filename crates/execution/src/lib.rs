// Path: crates/execution/src/lib.rs
//! # Gauntlet Execution Crate Lints
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
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]
//! # Gauntlet Execution
//!
//! The instruction pipeline. An [`Instruction`] describes how to build,
//! validate and post-process one contract call; [`instruction_to_command`]
//! compiles it into a [`Command`] with a fixed lifecycle, and a [`Flow`]
//! sequences commands while threading outputs of earlier steps into later
//! ones. The `multisig:` and `batch:` decorators wrap any command.

pub mod command;
pub mod context;
pub mod decorators;
pub mod diff;
pub mod events;
pub mod flow;
pub mod instruction;
pub mod registry;
pub mod retry;
pub mod validation;

pub use command::{instruction_to_command, Command};
pub use context::{CodeIds, InstructionContext, Providers};
pub use events::{extract_attribute, first_tx, result_attribute};
pub use flow::{Flow, FlowStep, FlowValue, StepRegistry};
pub use instruction::{ExecutionInput, Instruction, InstructionId};
pub use registry::CommandRegistry;
pub use retry::RetryPolicy;
