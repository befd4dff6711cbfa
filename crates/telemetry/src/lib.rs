// Path: crates/telemetry/src/lib.rs
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

//! # Gauntlet Telemetry
//!
//! Structured logging for the CLI. Operator-facing output goes to stdout;
//! `tracing` events go to stderr, filtered by `RUST_LOG`.

/// The initialization routine for global structured logging.
pub mod init;
/// A scope timer that logs how long a command took.
pub mod time;

pub use init::{init_tracing, LogFormat};
pub use time::Timer;
