// Path: crates/types/src/app/mod.rs
//! Core application-level data structures: transactions, events and command results.

/// Emitted events and their attributes.
pub mod events;
/// The result shape returned by every compiled command.
pub mod result;

pub use events::*;
pub use result::*;

use serde::{Deserialize, Serialize};

/// The kind of on-chain entry point an instruction targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Instantiates a new contract from an uploaded code id.
    Instantiate,
    /// Executes a message against an existing contract.
    Execute,
}

impl Operation {
    /// The operation implied by an instruction's function name: `deploy`
    /// instantiates, everything else executes.
    pub fn for_function(function: &str) -> Self {
        if function == "deploy" {
            Operation::Instantiate
        } else {
            Operation::Execute
        }
    }
}

/// A confirmed transaction as returned by the submission collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxResponse {
    /// The transaction hash.
    pub transaction_hash: String,
    /// The block height the transaction was included at, if known.
    #[serde(default)]
    pub height: Option<u64>,
    /// Every event emitted by the transaction, verbatim.
    #[serde(default)]
    pub events: Vec<Event>,
    /// The address of a freshly instantiated contract.
    #[serde(default)]
    pub contract_address: Option<String>,
    /// The code id assigned by an upload.
    #[serde(default)]
    pub code_id: Option<u64>,
    /// Gas consumed, if reported.
    #[serde(default)]
    pub gas_used: Option<u64>,
}

impl TxResponse {
    /// Returns the first event of the given type.
    pub fn event(&self, event_type: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.kind == event_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deploy_maps_to_instantiate() {
        assert_eq!(Operation::for_function("deploy"), Operation::Instantiate);
        assert_eq!(
            Operation::for_function("begin_proposal"),
            Operation::Execute
        );
    }

    #[test]
    fn tx_response_reads_gateway_json() {
        let raw = serde_json::json!({
            "transactionHash": "ABCD",
            "height": 12,
            "events": [
                { "type": "wasm", "attributes": [{ "key": "proposal_id", "value": "7" }] }
            ]
        });
        let tx: TxResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(tx.height, Some(12));
        assert_eq!(
            tx.event(WASM_EVENT).and_then(|e| e.attribute("proposal_id")),
            Some("7")
        );
        assert!(tx.contract_address.is_none());
    }
}
