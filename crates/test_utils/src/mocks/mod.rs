//! Recording mock collaborators.
//!
//! Every mock records what it was asked and answers from a script; an empty
//! script falls back to a plausible default so simple tests need no setup.

use async_trait::async_trait;
use gauntlet_api::chain::{ContractCall, Querier, Submitter};
use gauntlet_api::operator::{Confirmer, SecretSource};
use gauntlet_types::app::{Event, TxResponse};
use gauntlet_types::error::{InstructionError, QueryError, SubmissionError};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A call received by [`MockSubmitter`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    /// `instantiate`.
    Instantiate {
        /// The code id.
        code_id: u64,
        /// The label.
        label: String,
        /// The instantiate message.
        msg: Value,
        /// The admin, if any.
        admin: Option<String>,
    },
    /// `execute`.
    Execute {
        /// The target contract.
        contract: String,
        /// The execute message.
        msg: Value,
    },
    /// `execute_batch`.
    ExecuteBatch {
        /// The calls, in order.
        calls: Vec<ContractCall>,
    },
    /// `upload`, with the size of the bytecode.
    Upload {
        /// Bytecode length.
        len: usize,
    },
}

/// A submitter that records calls and replays scripted responses.
pub struct MockSubmitter {
    sender: String,
    calls: Mutex<Vec<RecordedCall>>,
    responses: Mutex<VecDeque<Result<TxResponse, SubmissionError>>>,
}

impl Default for MockSubmitter {
    fn default() -> Self {
        Self::new(crate::fixtures::FIXTURE_SENDER)
    }
}

impl MockSubmitter {
    /// A submitter signing as `sender`.
    pub fn new(sender: &str) -> Self {
        Self {
            sender: sender.to_string(),
            calls: Mutex::new(Vec::new()),
            responses: Mutex::new(VecDeque::new()),
        }
    }

    /// Queues a successful response.
    pub fn push_response(&self, tx: TxResponse) -> &Self {
        lock(&self.responses).push_back(Ok(tx));
        self
    }

    /// Queues a failure.
    pub fn push_error(&self, err: SubmissionError) -> &Self {
        lock(&self.responses).push_back(Err(err));
        self
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// The number of calls received so far.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    fn respond(&self, call: RecordedCall) -> Result<TxResponse, SubmissionError> {
        let n = {
            let mut calls = lock(&self.calls);
            calls.push(call.clone());
            calls.len()
        };
        if let Some(scripted) = lock(&self.responses).pop_front() {
            return scripted;
        }
        let mut tx = TxResponse {
            transaction_hash: format!("MOCKTX{}", n),
            height: Some(n as u64),
            ..Default::default()
        };
        match call {
            RecordedCall::Instantiate { .. } => tx.contract_address = Some(format!("wasm1mockcontract{}", n)),
            RecordedCall::Upload { .. } => tx.code_id = Some(n as u64),
            _ => {}
        }
        Ok(tx)
    }
}

#[async_trait]
impl Submitter for MockSubmitter {
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
        self.respond(RecordedCall::Instantiate {
            code_id,
            label: label.to_string(),
            msg: msg.clone(),
            admin: admin.map(str::to_string),
        })
    }

    async fn execute(&self, contract: &str, msg: &Value) -> Result<TxResponse, SubmissionError> {
        self.respond(RecordedCall::Execute {
            contract: contract.to_string(),
            msg: msg.clone(),
        })
    }

    async fn execute_batch(&self, calls: &[ContractCall]) -> Result<TxResponse, SubmissionError> {
        self.respond(RecordedCall::ExecuteBatch {
            calls: calls.to_vec(),
        })
    }

    async fn upload(&self, wasm: &[u8]) -> Result<TxResponse, SubmissionError> {
        self.respond(RecordedCall::Upload { len: wasm.len() })
    }
}

/// A querier answering from fixed per-contract state.
///
/// Smart queries are matched on the contract and the query's top-level key
/// (`{"proposal": {...}}` matches `"proposal"`).
#[derive(Default)]
pub struct MockQuerier {
    answers: Mutex<HashMap<(String, String), Value>>,
    events: Mutex<HashMap<(String, String), Event>>,
    queries: Mutex<Vec<(String, Value)>>,
}

fn query_key(query: &Value) -> String {
    match query {
        Value::Object(map) => map.keys().next().cloned().unwrap_or_default(),
        Value::String(s) => s.clone(),
        _ => String::new(),
    }
}

impl MockQuerier {
    /// An empty querier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `query_key` queries against `contract` with `answer`.
    pub fn with_answer(self, contract: &str, query_key: &str, answer: Value) -> Self {
        lock(&self.answers).insert((contract.to_string(), query_key.to_string()), answer);
        self
    }

    /// Makes `event` the latest event of its type for `contract`.
    pub fn with_event(self, contract: &str, event: Event) -> Self {
        lock(&self.events).insert((contract.to_string(), event.kind.clone()), event);
        self
    }

    /// Every smart query received so far.
    pub fn queries(&self) -> Vec<(String, Value)> {
        lock(&self.queries).clone()
    }
}

#[async_trait]
impl Querier for MockQuerier {
    async fn query_contract(&self, contract: &str, query: &Value) -> Result<Value, QueryError> {
        lock(&self.queries).push((contract.to_string(), query.clone()));
        let key = (contract.to_string(), query_key(query));
        lock(&self.answers)
            .get(&key)
            .cloned()
            .ok_or_else(|| QueryError::Contract(format!("no answer for {} on {}", key.1, contract)))
    }

    async fn latest_event(
        &self,
        contract: &str,
        event_type: &str,
    ) -> Result<Option<Event>, QueryError> {
        Ok(lock(&self.events)
            .get(&(contract.to_string(), event_type.to_string()))
            .cloned())
    }
}

/// A confirmer replaying scripted answers, then a default.
pub struct ScriptedConfirmer {
    answers: Mutex<VecDeque<bool>>,
    default: bool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirmer {
    /// Approves everything.
    pub fn approving() -> Self {
        Self::scripted(Vec::new(), true)
    }

    /// Denies everything.
    pub fn denying() -> Self {
        Self::scripted(Vec::new(), false)
    }

    /// Answers with `answers` in order, then `default`.
    pub fn scripted(answers: Vec<bool>, default: bool) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            default,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every prompt shown so far.
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }
}

#[async_trait]
impl Confirmer for ScriptedConfirmer {
    async fn confirm(&self, prompt: &str) -> Result<bool, InstructionError> {
        lock(&self.prompts).push(prompt.to_string());
        Ok(lock(&self.answers).pop_front().unwrap_or(self.default))
    }
}

/// A secret source with a fixed value.
#[derive(Debug, Clone, Default)]
pub struct StaticSecret(pub Option<String>);

impl StaticSecret {
    /// A source returning `secret`.
    pub fn new(secret: &str) -> Self {
        Self(Some(secret.to_string()))
    }

    /// A source with no secret configured.
    pub fn missing() -> Self {
        Self(None)
    }
}

impl SecretSource for StaticSecret {
    fn secret(&self) -> Option<String> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn submitter_records_and_defaults() {
        let submitter = MockSubmitter::default();
        let tx = submitter.instantiate(3, "ocr2", &json!({}), None).await.unwrap();
        assert_eq!(tx.contract_address.as_deref(), Some("wasm1mockcontract1"));
        submitter.push_error(SubmissionError::Rejected("out of gas".into()));
        assert!(submitter.execute("wasm1x", &json!({ "a": {} })).await.is_err());
        assert_eq!(submitter.call_count(), 2);
        assert!(matches!(&submitter.calls()[1], RecordedCall::Execute { contract, .. } if contract == "wasm1x"));
    }

    #[tokio::test]
    async fn querier_matches_top_level_key() {
        let q = MockQuerier::new().with_answer("wasm1x", "owner", json!("wasm1owner"));
        assert_eq!(
            q.query_contract("wasm1x", &json!({ "owner": {} })).await.unwrap(),
            json!("wasm1owner")
        );
        assert!(q.query_contract("wasm1x", &json!({ "other": {} })).await.is_err());
        assert!(q.latest_event("wasm1x", "wasm-set_config").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn confirmer_replays_script() {
        let c = ScriptedConfirmer::scripted(vec![false], true);
        assert!(!c.confirm("first").await.unwrap());
        assert!(c.confirm("second").await.unwrap());
        assert_eq!(c.prompts(), vec!["first".to_string(), "second".to_string()]);
    }
}
