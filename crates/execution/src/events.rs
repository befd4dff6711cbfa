// Path: crates/execution/src/events.rs
//! Extraction of on-chain assigned identifiers from emitted events.

use gauntlet_types::app::{CommandResult, TxResponse};
use gauntlet_types::error::EventExtractionError;

/// Returns the `key` attribute of the first `event_type` event in `tx`.
pub fn extract_attribute(
    tx: &TxResponse,
    event_type: &str,
    key: &str,
) -> Result<String, EventExtractionError> {
    let event = tx
        .event(event_type)
        .ok_or_else(|| EventExtractionError::EventNotFound {
            event_type: event_type.to_string(),
            tx_hash: tx.transaction_hash.clone(),
        })?;
    event
        .attribute(key)
        .map(str::to_string)
        .ok_or_else(|| EventExtractionError::AttributeNotFound {
            event_type: event_type.to_string(),
            key: key.to_string(),
            tx_hash: tx.transaction_hash.clone(),
        })
}

/// The transaction of the first response.
pub fn first_tx(result: &CommandResult) -> Result<&TxResponse, EventExtractionError> {
    result
        .first()
        .and_then(|entry| entry.tx.as_ref())
        .ok_or(EventExtractionError::NoResponse)
}

/// [`extract_attribute`] over the first response of `result`.
pub fn result_attribute(
    result: &CommandResult,
    event_type: &str,
    key: &str,
) -> Result<String, EventExtractionError> {
    extract_attribute(first_tx(result)?, event_type, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauntlet_test_utils::fixtures::wasm_tx;
    use gauntlet_types::app::{ResponseEntry, WASM_EVENT};

    #[test]
    fn finds_attribute_in_wasm_event() {
        let tx = wasm_tx("T1", &[("proposal_id", "7"), ("digest", "abcd")]);
        assert_eq!(extract_attribute(&tx, WASM_EVENT, "digest").unwrap(), "abcd");
    }

    #[test]
    fn distinguishes_missing_event_from_missing_attribute() {
        let tx = wasm_tx("T2", &[("digest", "abcd")]);
        assert_eq!(
            extract_attribute(&tx, WASM_EVENT, "proposal_id").unwrap_err(),
            EventExtractionError::AttributeNotFound {
                event_type: WASM_EVENT.into(),
                key: "proposal_id".into(),
                tx_hash: "T2".into(),
            }
        );
        assert!(matches!(
            extract_attribute(&tx, "wasm-oracle_paid", "amount"),
            Err(EventExtractionError::EventNotFound { .. })
        ));
    }

    #[test]
    fn empty_result_has_no_response() {
        assert_eq!(
            result_attribute(&CommandResult::default(), WASM_EVENT, "digest").unwrap_err(),
            EventExtractionError::NoResponse
        );
        let query_only = CommandResult::single(ResponseEntry::default());
        assert_eq!(first_tx(&query_only).unwrap_err(), EventExtractionError::NoResponse);
    }
}
