// Path: crates/execution/src/diff.rs
//! Field-level diffs between two JSON documents, shown before a proposal.

use serde_json::Value;
use std::fmt::Write as _;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// One difference between the current and the proposed document.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// Present only in the proposed document.
    Added {
        /// The JSON path, e.g. `peerIds[3]`.
        path: String,
        /// The new value.
        value: Value,
    },
    /// Present only in the current document.
    Removed {
        /// The JSON path.
        path: String,
        /// The old value.
        value: Value,
    },
    /// Present in both with different scalar values.
    Changed {
        /// The JSON path.
        path: String,
        /// The current value.
        from: Value,
        /// The proposed value.
        to: Value,
    },
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn walk(path: &str, from: Option<&Value>, to: Option<&Value>, out: &mut Vec<Change>) {
    match (from, to) {
        (None, None) => {}
        (None, Some(v)) => out.push(Change::Added {
            path: path.to_string(),
            value: v.clone(),
        }),
        (Some(v), None) => out.push(Change::Removed {
            path: path.to_string(),
            value: v.clone(),
        }),
        (Some(Value::Object(a)), Some(Value::Object(b))) => {
            let mut keys: Vec<&String> = a.keys().chain(b.keys()).collect();
            keys.sort();
            keys.dedup();
            for key in keys {
                walk(&join(path, key), a.get(key), b.get(key), out);
            }
        }
        (Some(Value::Array(a)), Some(Value::Array(b))) => {
            for i in 0..a.len().max(b.len()) {
                walk(&format!("{}[{}]", path, i), a.get(i), b.get(i), out);
            }
        }
        (Some(a), Some(b)) if a == b => {}
        (Some(a), Some(b)) => out.push(Change::Changed {
            path: path.to_string(),
            from: a.clone(),
            to: b.clone(),
        }),
    }
}

/// Every difference from `current` to `proposed`, in path order.
pub fn diff(current: &Value, proposed: &Value) -> Vec<Change> {
    let mut out = Vec::new();
    walk("", Some(current), Some(proposed), &mut out);
    out
}

/// Renders changes one per line: `+` added, `-` removed, both for a change.
pub fn render(changes: &[Change], color: bool) -> String {
    let (green, red, reset) = if color {
        (GREEN, RED, RESET)
    } else {
        ("", "", "")
    };
    let mut out = String::new();
    for change in changes {
        // Writing to a String cannot fail.
        let _ = match change {
            Change::Added { path, value } => {
                writeln!(out, "{green}+ {path}: {value}{reset}")
            }
            Change::Removed { path, value } => {
                writeln!(out, "{red}- {path}: {value}{reset}")
            }
            Change::Changed { path, from, to } => {
                writeln!(out, "{red}- {path}: {from}{reset}")
                    .and_then(|_| writeln!(out, "{green}+ {path}: {to}{reset}"))
            }
        };
    }
    out
}
