// Path: crates/cli/src/providers/gateway.rs
//! Transaction submission through a signing gateway.
//!
//! The gateway holds the deployer key. It signs, broadcasts and waits for the
//! transaction to be included, answering with the confirmed response:
//!
//! - `GET  /account` returns `{ "address": "wasm1..." }`
//! - `POST /instantiate`, `/execute`, `/execute_batch`, `/upload` return a
//!   camelCase `TxResponse`
//! - `504` means the transaction was broadcast but not seen in a block; the
//!   body carries its `transactionHash`

use super::http::{send, Reply, RetryOn, HTTP_RETRIES};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine as _;
use gauntlet_api::chain::{ContractCall, Submitter};
use gauntlet_types::app::TxResponse;
use gauntlet_types::config::NetworkConfig;
use gauntlet_types::error::SubmissionError;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A [`Submitter`] backed by the signing gateway at `signer_url`.
pub struct GatewaySubmitter {
    base: String,
    sender: String,
    chain_id: String,
    gas_price: String,
    client: Client,
}

#[derive(Deserialize)]
struct Account {
    address: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    chain_id: &'a str,
    gas_price: &'a str,
    #[serde(flatten)]
    body: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pending {
    transaction_hash: String,
}

impl GatewaySubmitter {
    /// Connects to the gateway and learns the signing address.
    pub async fn connect(config: &NetworkConfig) -> Result<Self, SubmissionError> {
        let base = config.signer_url.trim_end_matches('/').to_string();
        let client = Client::new();
        let url = format!("{}/account", base);
        let reply = send("account", RetryOn::Transient, || client.get(&url))
            .await
            .map_err(SubmissionError::Transport)?;
        if !reply.status.is_success() {
            return Err(SubmissionError::Transport(format!(
                "account (HTTP {}): {}",
                reply.status.as_u16(),
                reply.snippet()
            )));
        }
        let account: Account = serde_json::from_slice(&reply.body)
            .map_err(|e| SubmissionError::Transport(format!("account: {}", e)))?;
        tracing::info!(target: "provider", sender = %account.address, gateway = %base, "connected to signer");
        Ok(Self {
            base,
            sender: account.address,
            chain_id: config.chain_id.clone(),
            gas_price: config.gas_price.clone(),
            client,
        })
    }

    async fn post(&self, route: &str, body: Value) -> Result<TxResponse, SubmissionError> {
        let url = format!("{}/{}", self.base, route);
        let envelope = Envelope {
            chain_id: &self.chain_id,
            gas_price: &self.gas_price,
            body,
        };
        let reply = send(route, RetryOn::RateLimit, || self.client.post(&url).json(&envelope))
            .await
            .map_err(SubmissionError::Transport)?;
        let tx = confirmed(route, reply)?;
        tracing::info!(
            target: "provider",
            route,
            tx = %tx.transaction_hash,
            height = ?tx.height,
            gas_used = ?tx.gas_used,
            "transaction confirmed"
        );
        Ok(tx)
    }
}

/// Maps a gateway reply to the confirmed transaction or a submission error.
pub(crate) fn confirmed(route: &str, reply: Reply) -> Result<TxResponse, SubmissionError> {
    match reply.status {
        s if s.is_success() => serde_json::from_slice(&reply.body)
            .map_err(|e| SubmissionError::Transport(format!("{}: malformed response: {}", route, e))),
        StatusCode::GATEWAY_TIMEOUT => {
            let hash = serde_json::from_slice::<Pending>(&reply.body)
                .map(|p| p.transaction_hash)
                .unwrap_or_else(|_| reply.snippet());
            Err(SubmissionError::Unconfirmed(hash))
        }
        StatusCode::TOO_MANY_REQUESTS => Err(SubmissionError::RetriesExhausted {
            attempts: HTTP_RETRIES + 1,
            last_error: format!("{}: rate limited", route),
        }),
        s if s.is_client_error() => Err(SubmissionError::Rejected(reply.snippet())),
        s => Err(SubmissionError::Transport(format!(
            "{} (HTTP {}): {}",
            route,
            s.as_u16(),
            reply.snippet()
        ))),
    }
}

#[async_trait]
impl Submitter for GatewaySubmitter {
    fn sender(&self) -> &str {
        &self.sender
    }

    async fn instantiate(
        &self,
        code_id: u64,
        label: &str,
        msg: &Value,
        admin: Option<&str>,
    ) -> Result<TxResponse, SubmissionError> {
        self.post(
            "instantiate",
            json!({ "codeId": code_id, "label": label, "msg": msg, "admin": admin }),
        )
        .await
    }

    async fn execute(&self, contract: &str, msg: &Value) -> Result<TxResponse, SubmissionError> {
        self.post("execute", json!({ "contract": contract, "msg": msg }))
            .await
    }

    async fn execute_batch(&self, calls: &[ContractCall]) -> Result<TxResponse, SubmissionError> {
        self.post("execute_batch", json!({ "calls": calls })).await
    }

    async fn upload(&self, wasm: &[u8]) -> Result<TxResponse, SubmissionError> {
        tracing::debug!(target: "provider", bytes = wasm.len(), "uploading bytecode");
        self.post("upload", json!({ "wasm": B64.encode(wasm) }))
            .await
    }
}
