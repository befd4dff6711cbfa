// Path: crates/types/src/app/events.rs

use serde::{Deserialize, Serialize};

/// The event type emitted by CosmWasm contracts for their custom attributes.
pub const WASM_EVENT: &str = "wasm";

/// A single key/value attribute of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    /// The attribute key.
    pub key: String,
    /// The attribute value.
    pub value: String,
}

impl EventAttribute {
    /// Creates an attribute.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// An event emitted by a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The event type, e.g. `wasm` or `wasm-oracle_paid`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The event's attributes in emission order.
    #[serde(default)]
    pub attributes: Vec<EventAttribute>,
}

impl Event {
    /// Creates an event from `(key, value)` pairs.
    pub fn new<K, V>(kind: impl Into<String>, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            kind: kind.into(),
            attributes: attributes
                .into_iter()
                .map(|(k, v)| EventAttribute::new(k, v))
                .collect(),
        }
    }

    /// Returns the value of the first attribute with the given key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }
}
