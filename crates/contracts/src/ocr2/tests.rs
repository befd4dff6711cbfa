// Path: crates/contracts/src/ocr2/tests.rs

use super::proposal::PROPOSAL_MATCHES_RDD;
use super::*;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use gauntlet_api::rdd::FileRddSource;
use gauntlet_execution::{CodeIds, Providers};
use gauntlet_ocr2::rdd::offchain_config_from_rdd;
use gauntlet_ocr2::serialize;
use gauntlet_test_utils::fixtures::{
    instantiate_tx, rdd_fixture, wasm_tx, Fixtures, FIXTURE_AGGREGATOR, FIXTURE_SECRET,
    FIXTURE_TRANSMITTER, FIXTURE_WORDS,
};
use gauntlet_test_utils::{
    assert_err, assert_error_code, MockQuerier, MockSubmitter, RecordedCall, ScriptedConfirmer,
    StaticSecret,
};
use gauntlet_types::app::{Event, TxResponse};
use gauntlet_types::error::InstructionError;
use gauntlet_types::flags::Flags;
use serde_json::{json, Value};

const LINK: &str = "wasm1wyarfg7rzwlyymg4khrze2wpzksl56362dpphg";
const BILLING_AC: &str = "wasm19y60kjwkkw9daupkc286c6033rl2uzf9nuccfekee77s7d29flkqj5szxu";
const REQUESTER_AC: &str = "wasm105xlfyt26ujmurz33dxancyzd6r6cqzpepf2lu7d72huygaq8vpq4kwu2y";

struct Harness {
    submitter: Arc<MockSubmitter>,
    querier: Arc<MockQuerier>,
    providers: Providers,
    fixtures: Fixtures,
}

impl Harness {
    fn new(querier: MockQuerier, secret: StaticSecret) -> Self {
        let submitter = Arc::new(MockSubmitter::default());
        let querier = Arc::new(querier);
        let mut ids = CodeIds::default();
        ids.insert(OCR2, 3);
        let providers = Providers::new(
            submitter.clone(),
            querier.clone(),
            Arc::new(ScriptedConfirmer::approving()),
            Arc::new(secret),
            Arc::new(FileRddSource),
        )
        .with_code_ids(ids);
        Self {
            submitter,
            querier,
            providers,
            fixtures: Fixtures::new().unwrap(),
        }
    }

    fn plain() -> Self {
        Self::new(MockQuerier::new(), StaticSecret::new(FIXTURE_SECRET))
    }

    fn rdd_path(&self) -> String {
        self.fixtures.write_rdd().unwrap().display().to_string()
    }

    async fn run(
        &self,
        command: Arc<dyn Command>,
        flags: &[(&str, Value)],
    ) -> Result<gauntlet_types::app::CommandResult, InstructionError> {
        let flags: Flags = flags
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        command
            .execute(&self.providers, &flags, &[FIXTURE_AGGREGATOR.to_string()])
            .await
    }
}

fn failures(err: &InstructionError) -> Vec<(String, String)> {
    match err {
        InstructionError::Validation(list) => list
            .iter()
            .map(|f| (f.name.clone(), f.message.clone()))
            .collect(),
        other => panic!("expected a validation error, got {other}"),
    }
}

fn encoded_rdd_config() -> String {
    let expected = offchain_config_from_rdd(&rdd_fixture().unwrap(), FIXTURE_AGGREGATOR).unwrap();
    serialize(
        &expected.offchain_config,
        &expected.config_public_keys,
        FIXTURE_SECRET,
        Some(FIXTURE_WORDS),
    )
    .unwrap()
    .to_base64()
}

fn with_inspection(querier: MockQuerier) -> MockQuerier {
    let expected = offchain_config_from_rdd(&rdd_fixture().unwrap(), FIXTURE_AGGREGATOR).unwrap();
    querier
        .with_answer(FIXTURE_AGGREGATOR, "latest_config_details", json!({ "config_count": 1 }))
        .with_answer(FIXTURE_AGGREGATOR, "transmitters", json!({ "addresses": expected.transmitters }))
        .with_answer(FIXTURE_AGGREGATOR, "billing", json!({ "recommended_gas_price_micro": "0.01" }))
        .with_answer(FIXTURE_AGGREGATOR, "link_token", json!(LINK))
        .with_answer(FIXTURE_AGGREGATOR, "owner", json!("wasm1pgm8hyk0pvphmlvfjc8wsvk4daluz5tg3ly25n"))
        .with_answer(FIXTURE_AGGREGATOR, "description", json!("ETH / USD"))
        .with_answer(FIXTURE_AGGREGATOR, "decimals", json!(8))
}

#[tokio::test]
async fn deploy_reads_answer_range_from_rdd() {
    let h = Harness::plain();
    h.submitter
        .push_response(instantiate_tx("T1", FIXTURE_AGGREGATOR));
    let rdd = h.rdd_path();
    let result = h
        .run(
            deploy(),
            &[
                ("rdd", json!(rdd)),
                ("link", json!(LINK)),
                ("billingAccessController", json!(BILLING_AC)),
                ("requesterAccessController", json!(REQUESTER_AC)),
            ],
        )
        .await
        .unwrap();

    assert_eq!(
        h.submitter.calls()[0],
        RecordedCall::Instantiate {
            code_id: 3,
            label: "ocr2".into(),
            msg: json!({
                "link_token": LINK,
                "min_answer": "1",
                "max_answer": "100000000000000000000",
                "billing_access_controller": BILLING_AC,
                "requester_access_controller": REQUESTER_AC,
                "decimals": 8,
                "description": "ETH / USD",
            }),
            admin: None,
        }
    );
    assert_eq!(result.first().unwrap().contract.as_deref(), Some(FIXTURE_AGGREGATOR));
}

#[tokio::test]
async fn deploy_reports_every_failed_rule() {
    let h = Harness::plain();
    let err = assert_err!(
        h.run(
            deploy(),
            &[
                ("link", json!("not-an-address")),
                ("billingAccessController", json!(BILLING_AC)),
                ("requesterAccessController", json!(REQUESTER_AC)),
                ("minAnswer", json!("10")),
                ("maxAnswer", json!("5")),
                ("decimals", json!(8)),
            ],
        )
        .await
    );
    assert_error_code!(err, "INSTRUCTION_VALIDATION_FAILED");
    let names: Vec<String> = failures(&err).into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["validateInput", "validAnswerRange"]);
    assert_eq!(h.submitter.call_count(), 0);
}

#[tokio::test]
async fn set_billing_from_rdd() {
    let h = Harness::plain();
    h.submitter.push_response(wasm_tx("T1", &[]));
    let rdd = h.rdd_path();
    h.run(set_billing(), &[("rdd", json!(rdd))]).await.unwrap();
    assert_eq!(
        h.submitter.calls()[0],
        RecordedCall::Execute {
            contract: FIXTURE_AGGREGATOR.into(),
            msg: json!({
                "set_billing": {
                    "config": {
                        "observation_payment_gjuels": 1,
                        "transmission_payment_gjuels": 1,
                        "recommended_gas_price_micro": "0.01",
                    }
                }
            }),
        }
    );
}

#[tokio::test]
async fn set_billing_rejects_malformed_amounts() {
    let h = Harness::plain();
    let err = assert_err!(
        h.run(
            set_billing(),
            &[
                ("observationPaymentGjuels", json!("1")),
                ("transmissionPaymentGjuels", json!("one")),
                ("recommendedGasPriceMicro", json!("cheap")),
            ],
        )
        .await
    );
    let messages: Vec<String> = failures(&err).into_iter().map(|(_, m)| m).collect();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("not a valid floating point number"));
    assert!(messages[1].contains("must both be integers"));
    assert_eq!(h.submitter.call_count(), 0);
}

#[tokio::test]
async fn begin_proposal_returns_its_id() {
    let h = Harness::plain();
    h.submitter
        .push_response(wasm_tx("T1", &[("proposal_id", "12")]));
    let result = h.run(begin_proposal(), &[]).await.unwrap();
    assert_eq!(
        h.submitter.calls()[0],
        RecordedCall::Execute {
            contract: FIXTURE_AGGREGATOR.into(),
            msg: json!({ "begin_proposal": {} }),
        }
    );
    assert_eq!(result.first().unwrap().data["proposalId"], json!("12"));
}

#[tokio::test]
async fn propose_config_encodes_signers() {
    let h = Harness::plain();
    h.submitter.push_response(wasm_tx("T1", &[]));
    let rdd = h.rdd_path();
    h.run(propose_config(), &[("rdd", json!(rdd)), ("proposalId", json!("12"))])
        .await
        .unwrap();

    let expected = offchain_config_from_rdd(&rdd_fixture().unwrap(), FIXTURE_AGGREGATOR).unwrap();
    let calls = h.submitter.calls();
    let RecordedCall::Execute { msg, .. } = &calls[0] else {
        panic!("expected an execute, got {:?}", calls[0]);
    };
    let proposed = &msg["propose_config"];
    assert_eq!(proposed["id"], json!("12"));
    assert_eq!(proposed["f"], json!(1));
    assert_eq!(proposed["signers"][0], json!(BASE64.encode([0xa1u8; 32])));
    assert_eq!(proposed["signers"][3], json!(BASE64.encode([0xd4u8; 32])));
    assert_eq!(proposed["transmitters"], json!(expected.transmitters));
    assert_eq!(proposed["transmitters"][0], json!(FIXTURE_TRANSMITTER));
    assert_eq!(proposed["payees"], json!(expected.payees));
    assert_eq!(proposed["onchain_config"], json!(""));
}

#[tokio::test]
async fn propose_config_requires_enough_oracles_for_f() {
    let h = Harness::plain();
    let err = assert_err!(
        h.run(
            propose_config(),
            &[
                ("proposalId", json!("12")),
                ("f", json!(1)),
                ("signers", json!("a1a1,zz")),
                ("transmitters", json!([FIXTURE_TRANSMITTER, FIXTURE_TRANSMITTER])),
                ("payees", json!([LINK, "wasm1bad"])),
            ],
        )
        .await
    );
    let names: Vec<String> = failures(&err).into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["validateInput", "validSigners", "validPayees"]);
}

#[tokio::test]
async fn propose_config_needs_a_proposal() {
    let h = Harness::plain();
    let err = assert_err!(h.run(propose_config(), &[]).await);
    assert_error_code!(err, "INSTRUCTION_INPUT_CONSTRUCTION_FAILED");
    assert!(err.to_string().contains("--configProposal"));
}

#[tokio::test]
async fn propose_offchain_config_needs_secret() {
    let h = Harness::new(MockQuerier::new(), StaticSecret::missing());
    let rdd = h.rdd_path();
    let err = assert_err!(
        h.run(propose_offchain_config(), &[("rdd", json!(rdd)), ("proposalId", json!("12"))])
            .await
    );
    assert!(err.to_string().contains("SECRET is not set in env!"));
    assert_eq!(h.submitter.call_count(), 0);
}

#[tokio::test]
async fn propose_offchain_config_is_reproducible_with_given_words() {
    let h = Harness::plain();
    h.submitter.push_response(wasm_tx("T1", &[]));
    let rdd = h.rdd_path();
    let result = h
        .run(
            propose_offchain_config(),
            &[
                ("rdd", json!(rdd)),
                ("proposalId", json!("12")),
                ("randomSecret", json!(FIXTURE_WORDS)),
            ],
        )
        .await
        .unwrap();

    assert_eq!(
        h.submitter.calls()[0],
        RecordedCall::Execute {
            contract: FIXTURE_AGGREGATOR.into(),
            msg: json!({
                "propose_offchain_config": {
                    "id": "12",
                    "offchain_config_version": 2,
                    "offchain_config": encoded_rdd_config(),
                }
            }),
        }
    );
    assert_eq!(result.first().unwrap().data["secret"], json!(FIXTURE_WORDS));
}

#[tokio::test]
async fn propose_offchain_config_diffs_against_current_config() {
    let current = Event::new(
        SET_CONFIG_EVENT,
        [("f", "1"), ("offchain_config", encoded_rdd_config().as_str())],
    );
    let h = Harness::new(
        MockQuerier::new().with_event(FIXTURE_AGGREGATOR, current),
        StaticSecret::new(FIXTURE_SECRET),
    );
    h.submitter.push_response(wasm_tx("T1", &[]));
    let rdd = h.rdd_path();
    let result = h
        .run(
            propose_offchain_config(),
            &[
                ("rdd", json!(rdd)),
                ("proposalId", json!("13")),
                ("offchainConfigVersion", json!(3)),
            ],
        )
        .await
        .unwrap();

    let calls = h.submitter.calls();
    let RecordedCall::Execute { msg, .. } = &calls[0] else {
        panic!("expected an execute, got {:?}", calls[0]);
    };
    assert_eq!(msg["propose_offchain_config"]["offchain_config_version"], json!(3));
    let words = result.first().unwrap().data["secret"].as_str().unwrap().to_string();
    assert_eq!(words.split_whitespace().count(), 12);
}

#[tokio::test]
async fn propose_offchain_config_rejects_bad_words() {
    let h = Harness::plain();
    let rdd = h.rdd_path();
    let err = assert_err!(
        h.run(
            propose_offchain_config(),
            &[
                ("rdd", json!(rdd)),
                ("proposalId", json!("12")),
                ("randomSecret", json!("too few words")),
            ],
        )
        .await
    );
    assert!(!matches!(err, InstructionError::Validation(_)));
    assert_eq!(h.submitter.call_count(), 0);
}

#[tokio::test]
async fn propose_offchain_config_rejects_malformed_keys() {
    let mut built = offchain_config_from_rdd(&rdd_fixture().unwrap(), FIXTURE_AGGREGATOR).unwrap();
    built.offchain_config.offchain_public_keys[0] = "ocr2off_cosmos_zz".into();
    built.offchain_config.offchain_public_keys[1] = format!("ocr2off_cosmos_{}", "ab".repeat(31));
    built.config_public_keys[0] = "ocr2cfg_cosmos_abcd".into();
    let input = json!({
        "offchainConfig": built.offchain_config,
        "configPublicKeys": built.config_public_keys,
    });

    let h = Harness::plain();
    let err = assert_err!(
        h.run(
            propose_offchain_config(),
            &[("proposalId", json!("12")), ("input", json!(input.to_string()))],
        )
        .await
    );
    let failed = failures(&err);
    assert_eq!(failed.len(), 3, "{failed:?}");
    assert!(failed.iter().all(|(name, _)| name == "validKeys"));
    assert!(failed[0].1.contains("ocr2off_cosmos_zz"));
    assert!(failed[1].1.contains("expected 32 bytes, got 31"));
    assert!(failed[2].1.contains("ocr2cfg_cosmos_abcd"));
    assert_eq!(h.submitter.call_count(), 0);
}

#[tokio::test]
async fn finalize_returns_digest() {
    let h = Harness::plain();
    h.submitter
        .push_response(wasm_tx("T1", &[("digest", "abcd")]));
    let result = h
        .run(finalize_proposal(), &[("configProposal", json!(12))])
        .await
        .unwrap();
    assert_eq!(
        h.submitter.calls()[0],
        RecordedCall::Execute {
            contract: FIXTURE_AGGREGATOR.into(),
            msg: json!({ "finalize_proposal": { "id": "12" } }),
        }
    );
    let data = &result.first().unwrap().data;
    assert_eq!(data["digest"], json!("abcd"));
    assert_eq!(data["proposalId"], json!("12"));
}

fn accept_flags(rdd: &str) -> Vec<(&'static str, Value)> {
    vec![
        ("rdd", json!(rdd)),
        ("proposalId", json!("12")),
        ("digest", json!("abcd")),
        ("secret", json!(FIXTURE_WORDS)),
    ]
}

#[tokio::test]
async fn accept_verifies_proposal_against_rdd() {
    let querier = MockQuerier::new().with_answer(
        FIXTURE_AGGREGATOR,
        "proposal",
        json!({ "offchain_config": encoded_rdd_config(), "offchain_config_version": 2 }),
    );
    let h = Harness::new(querier, StaticSecret::new(FIXTURE_SECRET));
    h.submitter.push_response(wasm_tx("T1", &[]));
    let rdd = h.rdd_path();
    let result = h.run(accept_proposal(), &accept_flags(&rdd)).await.unwrap();

    assert_eq!(
        h.querier.queries()[0],
        (FIXTURE_AGGREGATOR.to_string(), json!({ "proposal": { "id": "12" } }))
    );
    assert_eq!(
        h.submitter.calls()[0],
        RecordedCall::Execute {
            contract: FIXTURE_AGGREGATOR.into(),
            msg: json!({ "accept_proposal": { "id": "12", "digest": "q80=" } }),
        }
    );
    assert_eq!(result.first().unwrap().data["proposalId"], json!("12"));
}

#[tokio::test]
async fn accept_refuses_a_proposal_that_differs_from_rdd() {
    let querier = MockQuerier::new().with_answer(
        FIXTURE_AGGREGATOR,
        "proposal",
        json!({ "offchain_config": "AAAA" }),
    );
    let h = Harness::new(querier, StaticSecret::new(FIXTURE_SECRET));
    let rdd = h.rdd_path();
    let err = assert_err!(h.run(accept_proposal(), &accept_flags(&rdd)).await);
    let names: Vec<String> = failures(&err).into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec![PROPOSAL_MATCHES_RDD]);
    assert_eq!(h.submitter.call_count(), 0);
}

#[tokio::test]
async fn accept_rejects_non_hex_digest() {
    let h = Harness::plain();
    let rdd = h.rdd_path();
    let mut flags = accept_flags(&rdd);
    flags[2] = ("digest", json!("xyz"));
    let err = assert_err!(h.run(accept_proposal(), &flags).await);
    assert_error_code!(err, "INSTRUCTION_VALIDATION_FAILED");
    assert!(h.querier.queries().is_empty());
}

#[tokio::test]
async fn withdraw_reports_payment() {
    let h = Harness::plain();
    h.submitter.push_response(TxResponse {
        transaction_hash: "T1".into(),
        events: vec![Event::new(
            withdraw::ORACLE_PAID_EVENT,
            [("transmitter", FIXTURE_TRANSMITTER), ("amount", "42")],
        )],
        ..Default::default()
    });
    let result = h
        .run(withdraw_payment(), &[("transmitter", json!(FIXTURE_TRANSMITTER))])
        .await
        .unwrap();
    assert_eq!(
        h.submitter.calls()[0],
        RecordedCall::Execute {
            contract: FIXTURE_AGGREGATOR.into(),
            msg: json!({ "withdraw_payment": { "transmitter": FIXTURE_TRANSMITTER } }),
        }
    );
    assert_eq!(result.first().unwrap().data["payment"]["amount"], json!("42"));
}

#[tokio::test]
async fn withdraw_without_payment_event_returns_no_data() {
    let h = Harness::plain();
    h.submitter.push_response(wasm_tx("T1", &[]));
    let result = h
        .run(withdraw_payment(), &[("transmitter", json!(FIXTURE_TRANSMITTER))])
        .await
        .unwrap();
    assert!(result.first().unwrap().data.get("payment").is_none());
}

#[tokio::test]
async fn withdraw_validates_transmitter() {
    let h = Harness::plain();
    let err = assert_err!(
        h.run(withdraw_payment(), &[("transmitter", json!("wasm1nope"))])
            .await
    );
    let found = failures(&err);
    assert_eq!(found[0].0, "validTransmitter");
    assert!(found[0].1.starts_with("Invalid transmitter address"));
}

#[tokio::test]
async fn inspect_compares_with_rdd() {
    let h = Harness::new(
        with_inspection(MockQuerier::new()),
        StaticSecret::missing(),
    );
    let rdd = h.rdd_path();
    let result = h
        .run(Arc::new(InspectCommand), &[("rdd", json!(rdd))])
        .await
        .unwrap();
    let entry = result.first().unwrap();
    assert!(entry.tx.is_none());
    assert_eq!(entry.data["matchesRdd"], json!(true));
    assert_eq!(entry.data["inspection"]["linkToken"], json!(LINK));
    assert_eq!(h.querier.queries().len(), 7);
    assert_eq!(h.submitter.call_count(), 0);
}

#[tokio::test]
async fn inspect_flags_mismatches_without_failing() {
    let querier = with_inspection(MockQuerier::new())
        .with_answer(FIXTURE_AGGREGATOR, "decimals", json!(18));
    let h = Harness::new(querier, StaticSecret::missing());
    let rdd = h.rdd_path();
    let result = h
        .run(Arc::new(InspectCommand), &[("rdd", json!(rdd))])
        .await
        .unwrap();
    assert_eq!(result.first().unwrap().data["matchesRdd"], json!(false));
}

#[test]
fn commands_are_routable() {
    let ids: Vec<String> = commands().iter().map(|c| c.id()).collect();
    for id in [
        "ocr2:deploy",
        "ocr2:set_billing",
        "ocr2:begin_proposal",
        "ocr2:propose_config",
        "ocr2:propose_offchain_config",
        "ocr2:finalize_proposal",
        "ocr2:accept_proposal",
        "ocr2:withdraw_payment",
        "ocr2:inspect",
        "ocr2:initialize:flow",
    ] {
        assert!(ids.iter().any(|i| i == id), "{id} is not registered");
    }
}

#[tokio::test]
async fn initialize_flow_runs_every_step() {
    let querier = with_inspection(MockQuerier::new()).with_answer(
        FIXTURE_AGGREGATOR,
        "proposal",
        json!({ "offchain_config": encoded_rdd_config(), "offchain_config_version": 2 }),
    );
    let h = Harness::new(querier, StaticSecret::new(FIXTURE_SECRET));
    h.submitter
        .push_response(instantiate_tx("T1", FIXTURE_AGGREGATOR))
        .push_response(wasm_tx("T2", &[]))
        .push_response(wasm_tx("T3", &[("proposal_id", "1")]))
        .push_response(wasm_tx("T4", &[]))
        .push_response(wasm_tx("T5", &[]))
        .push_response(wasm_tx("T6", &[("digest", "0a0b0c")]))
        .push_response(wasm_tx("T7", &[]));
    let rdd = h.rdd_path();

    let result = h
        .run(
            Arc::new(initialize_flow()),
            &[
                ("rdd", json!(rdd)),
                ("link", json!(LINK)),
                ("billingAccessController", json!(BILLING_AC)),
                ("requesterAccessController", json!(REQUESTER_AC)),
                ("randomSecret", json!(FIXTURE_WORDS)),
            ],
        )
        .await
        .unwrap();

    let calls = h.submitter.calls();
    assert_eq!(calls.len(), 7);
    let functions: Vec<String> = calls
        .iter()
        .skip(1)
        .map(|call| match call {
            RecordedCall::Execute { contract, msg } => {
                assert_eq!(contract, FIXTURE_AGGREGATOR);
                msg.as_object().unwrap().keys().next().unwrap().clone()
            }
            other => panic!("unexpected call {other:?}"),
        })
        .collect();
    assert_eq!(
        functions,
        vec![
            "set_billing",
            "begin_proposal",
            "propose_config",
            "propose_offchain_config",
            "finalize_proposal",
            "accept_proposal",
        ]
    );
    assert_eq!(
        calls[6],
        RecordedCall::Execute {
            contract: FIXTURE_AGGREGATOR.into(),
            msg: json!({ "accept_proposal": { "id": "1", "digest": BASE64.encode([0x0a, 0x0b, 0x0c]) } }),
        }
    );
    assert_eq!(result.responses.len(), 8);
    let last = result.responses.last().unwrap();
    assert_eq!(last.data["matchesRdd"], json!(true));
}

#[tokio::test]
async fn initialize_flow_stops_when_operator_declines_rdd_change() {
    let mut h = Harness::plain();
    let confirmer = Arc::new(ScriptedConfirmer::scripted(vec![true, false], true));
    let shared: Arc<dyn gauntlet_api::operator::Confirmer> = confirmer.clone();
    h.providers.confirmer = shared;
    h.submitter
        .push_response(instantiate_tx("T1", FIXTURE_AGGREGATOR));
    let rdd = h.rdd_path();

    let err = assert_err!(
        h.run(
            Arc::new(initialize_flow()),
            &[
                ("rdd", json!(rdd)),
                ("link", json!(LINK)),
                ("billingAccessController", json!(BILLING_AC)),
                ("requesterAccessController", json!(REQUESTER_AC)),
            ],
        )
        .await
    );
    assert_error_code!(err, "INSTRUCTION_CONFIRMATION_DENIED");
    assert_eq!(confirmer.prompts()[1], "Ready? Continue");
    assert_eq!(h.submitter.call_count(), 1);
}
