// Path: crates/cli/src/providers/lcd.rs
//! Contract queries and event lookups against a Cosmos LCD (REST) endpoint.

use super::http::{send, Reply, RetryOn};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE as B64;
use base64::Engine as _;
use gauntlet_api::chain::Querier;
use gauntlet_types::app::Event;
use gauntlet_types::error::QueryError;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// The attribute CosmWasm stamps on every contract event.
const CONTRACT_ADDRESS_ATTRIBUTE: &str = "_contract_address";

/// A [`Querier`] over the LCD REST API.
#[derive(Clone)]
pub struct LcdQuerier {
    base: String,
    client: Client,
}

#[derive(Deserialize)]
struct SmartQueryResponse {
    data: Value,
}

#[derive(Deserialize, Default)]
struct TxLog {
    #[serde(default)]
    events: Vec<Event>,
}

#[derive(Deserialize)]
struct TxResponseJson {
    #[serde(default)]
    logs: Vec<TxLog>,
    #[serde(default)]
    events: Vec<Event>,
}

#[derive(Deserialize)]
struct TxSearchResponse {
    #[serde(default)]
    tx_responses: Vec<TxResponseJson>,
}

impl LcdQuerier {
    /// A querier for the node at `base`, e.g. `http://127.0.0.1:1317`.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// The smart query URL for `query` against `contract`.
    pub fn smart_query_url(&self, contract: &str, query: &Value) -> String {
        format!(
            "{}/cosmwasm/wasm/v1/contract/{}/smart/{}",
            self.base,
            contract,
            B64.encode(query.to_string())
        )
    }

    fn fail(what: &str, reply: &Reply) -> QueryError {
        if reply.status.is_client_error() {
            QueryError::Contract(format!("{} (HTTP {}): {}", what, reply.status.as_u16(), reply.snippet()))
        } else {
            QueryError::Transport(format!("{} (HTTP {}): {}", what, reply.status.as_u16(), reply.snippet()))
        }
    }
}

/// The newest event of `event_type` emitted by `contract` in a tx search answer.
pub(crate) fn latest_contract_event(body: &[u8], contract: &str, event_type: &str) -> Result<Option<Event>, QueryError> {
    let search: TxSearchResponse =
        serde_json::from_slice(body).map_err(|e| QueryError::Malformed(format!("tx search: {}", e)))?;
    let by_contract = |e: &&Event| {
        e.kind == event_type && e.attribute(CONTRACT_ADDRESS_ATTRIBUTE) == Some(contract)
    };
    for tx in &search.tx_responses {
        let from_logs = tx.logs.iter().flat_map(|l| l.events.iter());
        if let Some(event) = from_logs.chain(tx.events.iter()).filter(by_contract).last() {
            return Ok(Some(event.clone()));
        }
    }
    Ok(None)
}

#[async_trait]
impl Querier for LcdQuerier {
    async fn query_contract(&self, contract: &str, query: &Value) -> Result<Value, QueryError> {
        let url = self.smart_query_url(contract, query);
        tracing::debug!(target: "provider", contract, %query, "smart query");
        let reply = send("smart query", RetryOn::Transient, || self.client.get(&url))
            .await
            .map_err(QueryError::Transport)?;
        if !reply.status.is_success() {
            return Err(Self::fail("smart query", &reply));
        }
        let parsed: SmartQueryResponse = serde_json::from_slice(&reply.body)
            .map_err(|e| QueryError::Malformed(format!("smart query: {}", e)))?;
        Ok(parsed.data)
    }

    async fn latest_event(
        &self,
        contract: &str,
        event_type: &str,
    ) -> Result<Option<Event>, QueryError> {
        let url = format!("{}/cosmos/tx/v1beta1/txs", self.base);
        let filter = format!("{}.{}='{}'", event_type, CONTRACT_ADDRESS_ATTRIBUTE, contract);
        tracing::debug!(target: "provider", contract, event_type, "searching latest event");
        let reply = send("tx search", RetryOn::Transient, || {
            self.client.get(&url).query(&[
                ("events", filter.as_str()),
                ("order_by", "ORDER_BY_DESC"),
                ("pagination.limit", "1"),
            ])
        })
        .await
        .map_err(QueryError::Transport)?;
        if !reply.status.is_success() {
            return Err(Self::fail("tx search", &reply));
        }
        latest_contract_event(&reply.body, contract, event_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const AGGREGATOR: &str = "wasm13cz5jjr74ztusal7ttjj3qftjcl3s4e383vptw4mtpaz0p7h827qfaewgt";

    #[test]
    fn smart_query_path_carries_url_safe_base64() {
        let lcd = LcdQuerier::new("http://127.0.0.1:1317/");
        let url = lcd.smart_query_url(AGGREGATOR, &json!({ "owner": {} }));
        assert_eq!(
            url,
            format!(
                "http://127.0.0.1:1317/cosmwasm/wasm/v1/contract/{}/smart/eyJvd25lciI6e319",
                AGGREGATOR
            )
        );
    }

    #[test]
    fn picks_matching_event_from_logs() {
        let body = json!({
            "tx_responses": [{
                "txhash": "ABC",
                "logs": [{
                    "msg_index": 0,
                    "events": [
                        { "type": "message", "attributes": [{ "key": "action", "value": "execute" }] },
                        { "type": "wasm-set_config", "attributes": [
                            { "key": "_contract_address", "value": "wasm1other" },
                            { "key": "f", "value": "2" }
                        ]},
                        { "type": "wasm-set_config", "attributes": [
                            { "key": "_contract_address", "value": AGGREGATOR },
                            { "key": "f", "value": "1" },
                            { "key": "offchain_config", "value": "CAE=" }
                        ]}
                    ]
                }]
            }]
        });
        let event = latest_contract_event(body.to_string().as_bytes(), AGGREGATOR, "wasm-set_config")
            .unwrap()
            .unwrap();
        assert_eq!(event.attribute("f"), Some("1"));
        assert_eq!(event.attribute("offchain_config"), Some("CAE="));
    }

    #[test]
    fn falls_back_to_top_level_events() {
        let body = json!({
            "tx_responses": [{
                "logs": [],
                "events": [{ "type": "wasm-set_config", "attributes": [
                    { "key": "_contract_address", "value": AGGREGATOR, "index": true }
                ]}]
            }]
        });
        let event = latest_contract_event(body.to_string().as_bytes(), AGGREGATOR, "wasm-set_config").unwrap();
        assert!(event.is_some());
    }

    #[test]
    fn no_transactions_means_no_event() {
        let body = br#"{ "txs": [], "tx_responses": [], "pagination": null }"#;
        assert_eq!(latest_contract_event(body, AGGREGATOR, "wasm-set_config").unwrap(), None);
    }

    #[test]
    fn garbage_is_malformed() {
        let err = latest_contract_event(b"<html>", AGGREGATOR, "wasm-set_config").unwrap_err();
        assert!(matches!(err, QueryError::Malformed(_)));
    }
}
