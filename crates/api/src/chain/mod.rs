// Path: crates/api/src/chain/mod.rs
//! Defines the traits for submitting transactions to and querying a CosmWasm chain.

use async_trait::async_trait;
use gauntlet_types::app::{Event, TxResponse};
use gauntlet_types::error::{QueryError, SubmissionError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single execute message addressed to a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractCall {
    /// The target contract address.
    pub contract: String,
    /// The execute message, `{ "<function>": { ...payload } }`.
    pub msg: Value,
}

impl ContractCall {
    /// Creates a call.
    pub fn new(contract: impl Into<String>, msg: Value) -> Self {
        Self {
            contract: contract.into(),
            msg,
        }
    }
}

/// The submission collaborator.
///
/// Every method returns only once the transaction is confirmed, so callers may
/// forward-reference its outputs. Emitted events must be surfaced verbatim.
#[async_trait]
pub trait Submitter: Send + Sync {
    /// The address transactions are signed by.
    fn sender(&self) -> &str;

    /// Instantiates a contract from an uploaded code id.
    async fn instantiate(
        &self,
        code_id: u64,
        label: &str,
        msg: &Value,
        admin: Option<&str>,
    ) -> Result<TxResponse, SubmissionError>;

    /// Executes a single message against a contract.
    async fn execute(&self, contract: &str, msg: &Value) -> Result<TxResponse, SubmissionError>;

    /// Executes several messages atomically in one transaction.
    async fn execute_batch(&self, calls: &[ContractCall]) -> Result<TxResponse, SubmissionError>;

    /// Uploads contract bytecode; the response carries the assigned code id.
    async fn upload(&self, wasm: &[u8]) -> Result<TxResponse, SubmissionError>;
}

/// The query collaborator, used to fetch current on-chain state for diffing.
#[async_trait]
pub trait Querier: Send + Sync {
    /// Runs a smart query against a contract and returns its JSON response.
    async fn query_contract(&self, contract: &str, query: &Value) -> Result<Value, QueryError>;

    /// Returns the most recent event of `event_type` emitted by `contract`, if any.
    async fn latest_event(
        &self,
        contract: &str,
        event_type: &str,
    ) -> Result<Option<Event>, QueryError>;
}
