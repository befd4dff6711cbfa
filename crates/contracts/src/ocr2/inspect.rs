// Path: crates/contracts/src/ocr2/inspect.rs

use super::OCR2;
use async_trait::async_trait;
use gauntlet_execution::{Command, Providers};
use gauntlet_ocr2::rdd::offchain_config_from_rdd;
use gauntlet_types::app::{CommandResult, ResponseEntry};
use gauntlet_types::error::InstructionError;
use gauntlet_types::flags::{Flags, FlagsExt};
use serde_json::{json, Map, Value};

/// Queries run by `ocr2:inspect`, with the key their answer is reported under.
const QUERIES: [(&str, &str); 7] = [
    ("latest_config_details", "latestConfigDetails"),
    ("transmitters", "transmitters"),
    ("billing", "billing"),
    ("link_token", "linkToken"),
    ("owner", "owner"),
    ("description", "description"),
    ("decimals", "decimals"),
];

/// `ocr2:inspect`: reads the aggregator's state without submitting anything.
///
/// With `--rdd` the transmitters, description and decimals are compared
/// against the RDD entry of the contract.
pub struct InspectCommand;

fn transmitters(answer: &Value) -> Vec<String> {
    let list = answer.get("addresses").unwrap_or(answer);
    list.as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn report(check: &str, expected: &Value, actual: Option<&Value>) -> bool {
    let matches = actual == Some(expected);
    if matches {
        println!("  ✅ {} matches the RDD", check);
    } else {
        println!(
            "  ❌ {}: expected {}, found {}",
            check,
            expected,
            actual.map(Value::to_string).unwrap_or_else(|| "nothing".into())
        );
    }
    matches
}

impl InspectCommand {
    fn compare_with_rdd(
        &self,
        providers: &Providers,
        path: &str,
        contract: &str,
        state: &Map<String, Value>,
    ) -> Result<bool, InstructionError> {
        let rdd = providers.rdd.load(path)?;
        let aggregator = rdd.contract(contract)?;
        let expected = offchain_config_from_rdd(&rdd, contract)?;

        let actual_transmitters = state
            .get("transmitters")
            .map(|t| json!(transmitters(t)));
        let mut ok = report(
            "transmitters",
            &json!(expected.transmitters),
            actual_transmitters.as_ref(),
        );
        if let Some(name) = &aggregator.name {
            ok &= report("description", &json!(name), state.get("description"));
        }
        if let Some(decimals) = aggregator.decimals {
            ok &= report("decimals", &json!(decimals), state.get("decimals"));
        }
        Ok(ok)
    }
}

#[async_trait]
impl Command for InspectCommand {
    fn id(&self) -> String {
        format!("{}:inspect", OCR2)
    }

    fn examples(&self) -> Vec<String> {
        vec!["gauntlet ocr2:inspect --network=local [--rdd=./rdd.json] <CONTRACT_ADDRESS>".to_string()]
    }

    async fn execute(
        &self,
        providers: &Providers,
        flags: &Flags,
        args: &[String],
    ) -> Result<CommandResult, InstructionError> {
        let contract = args.first().ok_or_else(|| {
            InstructionError::input("ocr2:inspect requires the contract address as its first argument")
        })?;

        println!("Inspecting {}", contract);
        let mut state = Map::new();
        for (query, key) in QUERIES {
            let mut msg = Map::new();
            msg.insert(query.to_string(), json!({}));
            let answer = providers
                .querier
                .query_contract(contract, &Value::Object(msg))
                .await?;
            println!("  {}: {}", key, answer);
            state.insert(key.to_string(), answer);
        }

        let mut entry = ResponseEntry {
            contract: Some(contract.clone()),
            ..Default::default()
        };
        if let Some(path) = flags.string_of(&["rdd"]) {
            let matches = self.compare_with_rdd(providers, &path, contract, &state)?;
            tracing::info!(target: "ocr2", contract = %contract, matches, "inspection compared with RDD");
            entry.data.insert("matchesRdd".into(), Value::Bool(matches));
        }
        entry.data.insert("inspection".into(), Value::Object(state));
        Ok(CommandResult::single(entry))
    }
}
