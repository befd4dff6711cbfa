// Path: crates/execution/src/decorators/mod.rs
//! Command decorators: `batch:` submits one command against several contracts
//! in a single transaction, `multisig:` routes it through a cw3 multisig.

mod batch;
mod multisig;

pub use batch::{BatchCommand, BATCH_PREFIX};
pub use multisig::{MultisigCommand, MULTISIG_PREFIX};
