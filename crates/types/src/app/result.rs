// Path: crates/types/src/app/result.rs

use super::TxResponse;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry in a command result: the transaction, the contract it created or
/// targeted, and any auxiliary data returned by the post-processing hook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseEntry {
    /// The confirmed transaction, absent for query-only commands.
    #[serde(default)]
    pub tx: Option<TxResponse>,
    /// The contract address this entry refers to.
    #[serde(default)]
    pub contract: Option<String>,
    /// Auxiliary key/value data available to later flow steps.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
}

impl ResponseEntry {
    /// An entry for a submitted transaction.
    pub fn from_tx(tx: TxResponse, contract: Option<String>) -> Self {
        Self {
            tx: Some(tx),
            contract,
            data: Map::new(),
        }
    }
}

/// The result of a compiled command: `{ responses: [ { tx, contract?, ...data } ] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandResult {
    /// The responses, one per submitted transaction.
    pub responses: Vec<ResponseEntry>,
}

impl CommandResult {
    /// A result holding a single response.
    pub fn single(entry: ResponseEntry) -> Self {
        Self {
            responses: vec![entry],
        }
    }

    /// The first response, which flow steps read their outputs from.
    pub fn first(&self) -> Option<&ResponseEntry> {
        self.responses.first()
    }
}
