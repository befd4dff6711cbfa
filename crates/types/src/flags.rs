// Path: crates/types/src/flags.rs

//! Untyped CLI flags as handed to an instruction's input constructor.
//!
//! Flags arrive either from the command line (`--key=value`, `--key value`,
//! bare `--flag`) or from a flow step, so they are kept as a JSON object and
//! read through the typed accessors on [`FlagsExt`].

use crate::error::InstructionError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// The raw flags of one command invocation.
pub type Flags = Map<String, Value>;

/// Flags that never take a value, so a positional after them stays positional.
pub const SWITCHES: &[&str] = &["yes", "y", "help"];

/// Splits raw command-line tokens into flags and positional arguments.
///
/// `--key=value` and `--key value` set a flag. A `--key` followed by another
/// flag or nothing, or one of [`SWITCHES`], is set to `true`. Values that look
/// like JSON objects or arrays are parsed as JSON; everything else is kept as a
/// string. A lone `--` ends flag parsing.
pub fn parse_raw_args<S: AsRef<str>>(raw: &[S]) -> (Flags, Vec<String>) {
    let mut flags = Flags::new();
    let mut args = Vec::new();
    let mut tokens = raw.iter().map(AsRef::as_ref).peekable();

    while let Some(token) = tokens.next() {
        if token == "--" {
            args.extend(tokens.by_ref().map(str::to_string));
            break;
        }
        let Some(body) = token.strip_prefix("--") else {
            args.push(token.to_string());
            continue;
        };
        if let Some((key, value)) = body.split_once('=') {
            flags.insert(key.to_string(), parse_flag_value(value));
            continue;
        }
        let value = if SWITCHES.contains(&body) {
            None
        } else {
            tokens.next_if(|next| !next.starts_with("--"))
        };
        flags.insert(body.to_string(), value.map_or(Value::Bool(true), parse_flag_value));
    }
    (flags, args)
}

fn parse_flag_value(value: &str) -> Value {
    let trimmed = value.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(parsed) = serde_json::from_str(value) {
            return parsed;
        }
    }
    Value::String(value.to_string())
}

/// Typed accessors over [`Flags`].
pub trait FlagsExt {
    /// Returns the first present key among `keys` as a string. Numbers and
    /// booleans are rendered; `null` counts as absent.
    fn string_of(&self, keys: &[&str]) -> Option<String>;

    /// Returns a list flag given either as a JSON array or a comma-separated string.
    fn list_of(&self, key: &str) -> Option<Vec<String>>;

    /// Returns an integer flag, failing if it is present but not an integer.
    fn u64_of(&self, key: &str) -> Result<Option<u64>, InstructionError>;

    /// Returns `true` if the flag is set to `true`/`"true"`.
    fn is_set(&self, key: &str) -> bool;

    /// Deserializes the `--input` flag, which bypasses flag-by-flag construction.
    fn input<T: DeserializeOwned>(&self) -> Result<Option<T>, InstructionError>;
}

fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

impl FlagsExt for Flags {
    fn string_of(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|k| self.get(*k).and_then(render))
    }

    fn list_of(&self, key: &str) -> Option<Vec<String>> {
        match self.get(key)? {
            Value::Array(items) => Some(items.iter().filter_map(render).collect()),
            Value::String(s) => Some(
                s.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            _ => None,
        }
    }

    fn u64_of(&self, key: &str) -> Result<Option<u64>, InstructionError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .map(Some)
                .ok_or_else(|| InstructionError::input(format!("--{} must be a non-negative integer, got {}", key, n))),
            Some(Value::String(s)) => s
                .trim()
                .parse::<u64>()
                .map(Some)
                .map_err(|_| InstructionError::input(format!("--{} must be a non-negative integer, got '{}'", key, s))),
            Some(other) => Err(InstructionError::input(format!(
                "--{} must be a non-negative integer, got {}",
                key, other
            ))),
        }
    }

    fn is_set(&self, key: &str) -> bool {
        match self.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s == "true",
            _ => false,
        }
    }

    fn input<T: DeserializeOwned>(&self) -> Result<Option<T>, InstructionError> {
        match self.get("input") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(raw)) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|e| InstructionError::input(format!("--input is not valid JSON: {}", e))),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| InstructionError::input(format!("--input has the wrong shape: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn splits_flags_and_positionals() {
        let (flags, args) = parse_raw_args(&[
            "--network=local",
            "wasm1abc",
            "--yes",
            "--signers=[\"a\",\"b\"]",
            "--",
            "--not-a-flag",
        ]);
        assert_eq!(flags.string_of(&["network"]).as_deref(), Some("local"));
        assert!(flags.is_set("yes"));
        assert_eq!(flags.list_of("signers"), Some(vec!["a".into(), "b".into()]));
        assert_eq!(args, vec!["wasm1abc".to_string(), "--not-a-flag".to_string()]);
    }

    #[test]
    fn space_separated_values_are_taken_by_the_flag() {
        let (flags, args) = parse_raw_args(&["--configProposal", "7", "wasm1abc"]);
        assert_eq!(flags.get("configProposal"), Some(&json!("7")));
        assert_eq!(args, vec!["wasm1abc".to_string()]);

        let (flags, args) = parse_raw_args(&[
            "--signers",
            "[\"a\"]",
            "--dryRun",
            "--network",
            "testnet",
            "--yes",
            "wasm1abc",
            "--help",
        ]);
        assert_eq!(flags.list_of("signers"), Some(vec!["a".into()]));
        assert!(flags.is_set("dryRun"));
        assert_eq!(flags.string_of(&["network"]).as_deref(), Some("testnet"));
        assert!(flags.is_set("yes"));
        assert!(flags.is_set("help"));
        assert_eq!(args, vec!["wasm1abc".to_string()]);
    }

    #[test]
    fn aliases_resolve_in_order() {
        let mut flags = Flags::new();
        flags.insert("configProposal".into(), json!(4));
        assert_eq!(
            flags.string_of(&["proposalId", "configProposal", "id"]).as_deref(),
            Some("4")
        );
    }

    #[test]
    fn rejects_non_integer() {
        let mut flags = Flags::new();
        flags.insert("maxRetry".into(), json!("five"));
        assert!(flags.u64_of("maxRetry").is_err());
        flags.insert("maxRetry".into(), json!("5"));
        assert_eq!(flags.u64_of("maxRetry").unwrap(), Some(5));
    }

    #[test]
    fn input_flag_accepts_object_or_string() {
        #[derive(serde::Deserialize, PartialEq, Debug)]
        struct In {
            proposal_id: String,
        }
        let mut flags = Flags::new();
        flags.insert("input".into(), json!({ "proposal_id": "9" }));
        assert_eq!(
            flags.input::<In>().unwrap(),
            Some(In {
                proposal_id: "9".into()
            })
        );
        flags.insert("input".into(), json!("{\"proposal_id\":\"10\"}"));
        assert_eq!(flags.input::<In>().unwrap().unwrap().proposal_id, "10");
    }
}
