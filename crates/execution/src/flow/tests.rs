// Path: crates/execution/src/flow/tests.rs

use super::*;
use crate::command::instruction_to_command;
use crate::context::{CodeIds, InstructionContext};
use crate::events::result_attribute;
use crate::instruction::{ExecutionInput, Instruction, InstructionId};
use futures_util::future::FutureExt;
use gauntlet_api::rdd::FileRddSource;
use gauntlet_test_utils::fixtures::{instantiate_tx, wasm_tx};
use gauntlet_test_utils::{
    assert_err, assert_error_code, MockQuerier, MockSubmitter, RecordedCall, ScriptedConfirmer,
    StaticSecret,
};
use gauntlet_types::app::{TxResponse, WASM_EVENT};
use gauntlet_types::flags::FlagsExt;
use serde::Serialize;
use serde_json::{json, Map, Value};

#[derive(Serialize)]
struct Empty {}

#[derive(Serialize)]
struct ProposalPayload {
    id: String,
}

fn nothing(_: &InstructionContext, _: &[String]) -> Result<(), InstructionError> {
    Ok(())
}

fn empty(_: &()) -> Result<Empty, InstructionError> {
    Ok(Empty {})
}

fn proposal_id(ctx: &InstructionContext, _: &[String]) -> Result<String, InstructionError> {
    ctx.flags
        .string_of(&["proposalId"])
        .ok_or_else(|| InstructionError::input("proposalId is required"))
}

fn by_id(id: &String) -> Result<ProposalPayload, InstructionError> {
    Ok(ProposalPayload { id: id.clone() })
}

fn extract_proposal<'a>(
    _: &'a InstructionContext,
    _: &'a ExecutionInput<(), Empty>,
    result: &'a CommandResult,
) -> BoxFuture<'a, Result<Map<String, Value>, InstructionError>> {
    async move {
        let id = result_attribute(result, WASM_EVENT, "proposal_id")?;
        Ok(Map::from_iter([("proposalId".to_string(), Value::String(id))]))
    }
    .boxed()
}

fn deploy() -> Arc<dyn Command> {
    instruction_to_command(Instruction::new(
        InstructionId::new("ocr2", "deploy"),
        nothing,
        empty,
    ))
}

fn propose() -> Arc<dyn Command> {
    instruction_to_command(
        Instruction::new(InstructionId::new("ocr2", "begin_proposal"), nothing, empty)
            .with_after_execute(extract_proposal),
    )
}

fn finalize() -> Arc<dyn Command> {
    instruction_to_command(Instruction::new(
        InstructionId::new("ocr2", "finalize_proposal"),
        proposal_id,
        by_id,
    ))
}

fn three_steps() -> Flow {
    Flow::new(
        "ocr2:test:flow",
        vec![
            FlowStep::command("Deploy", deploy()).with_id(1),
            FlowStep::command("Propose", propose())
                .with_id(2)
                .with_arg(FlowValue::contract_of(1)),
            FlowStep::command("Finalize", finalize())
                .with_arg(FlowValue::contract_of(1))
                .with_flag("proposalId", FlowValue::data_of(2, "proposalId")),
        ],
    )
}

fn providers(submitter: Arc<MockSubmitter>) -> Providers {
    let mut ids = CodeIds::default();
    ids.insert("ocr2", 4);
    Providers::new(
        submitter,
        Arc::new(MockQuerier::new()),
        Arc::new(ScriptedConfirmer::approving()),
        Arc::new(StaticSecret::missing()),
        Arc::new(FileRddSource),
    )
    .with_code_ids(ids)
}

#[tokio::test]
async fn later_steps_receive_earlier_outputs() {
    let submitter = Arc::new(MockSubmitter::default());
    submitter
        .push_response(instantiate_tx("T1", "wasm1abc"))
        .push_response(wasm_tx("T2", &[("proposal_id", "7")]))
        .push_response(wasm_tx("T3", &[("digest", "beef")]));

    let result = three_steps()
        .execute(&providers(submitter.clone()), &Flags::new(), &[])
        .await
        .unwrap();

    let calls = submitter.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls[1],
        RecordedCall::Execute {
            contract: "wasm1abc".into(),
            msg: json!({ "begin_proposal": {} }),
        }
    );
    assert_eq!(
        calls[2],
        RecordedCall::Execute {
            contract: "wasm1abc".into(),
            msg: json!({ "finalize_proposal": { "id": "7" } }),
        }
    );
    assert_eq!(result.responses.len(), 3);
    assert_eq!(result.responses[1].data.get("proposalId"), Some(&json!("7")));
}

#[tokio::test]
async fn missing_event_aborts_remaining_steps() {
    let submitter = Arc::new(MockSubmitter::default());
    submitter
        .push_response(instantiate_tx("T1", "wasm1abc"))
        .push_response(TxResponse {
            transaction_hash: "T2".into(),
            ..Default::default()
        });

    let err = assert_err!(
        three_steps()
            .execute(&providers(submitter.clone()), &Flags::new(), &[])
            .await
    );
    assert_error_code!(err, "EVENT_NOT_FOUND");
    assert_eq!(submitter.call_count(), 2);
}

#[tokio::test]
async fn reference_to_unrun_step_fails_at_resolution() {
    let submitter = Arc::new(MockSubmitter::default());
    let flow = Flow::new(
        "ocr2:broken:flow",
        vec![
            FlowStep::command("Deploy", deploy()).with_id(1),
            FlowStep::command("Finalize", finalize())
                .with_arg(FlowValue::contract_of(1))
                .with_flag("proposalId", FlowValue::data_of(9, "proposalId")),
        ],
    );
    let err = assert_err!(
        flow.execute(&providers(submitter.clone()), &Flags::new(), &[])
            .await
    );
    assert!(matches!(
        err,
        InstructionError::Flow(FlowError::StepNotExecuted { step_id: 9 })
    ));
    // The deploy before the bad reference did run.
    assert_eq!(submitter.call_count(), 1);
}

#[tokio::test]
async fn duplicate_ids_are_rejected_before_any_step() {
    let submitter = Arc::new(MockSubmitter::default());
    let flow = Flow::new(
        "ocr2:dup:flow",
        vec![
            FlowStep::command("Deploy", deploy()).with_id(1),
            FlowStep::command("Deploy again", deploy()).with_id(1),
        ],
    );
    let err = assert_err!(
        flow.execute(&providers(submitter.clone()), &Flags::new(), &[])
            .await
    );
    assert_error_code!(err, "FLOW_DUPLICATE_STEP_ID");
    assert_eq!(submitter.call_count(), 0);
}

fn ask_operator<'a>(
    providers: &'a Providers,
    registry: &'a StepRegistry,
) -> BoxFuture<'a, Result<(), InstructionError>> {
    async move {
        let contract = registry.resolve_string(&FlowValue::contract_of(1))?;
        gauntlet_api::operator::confirm_or_abort(
            providers.confirmer.as_ref(),
            &format!("Update the RDD for {}. Ready?", contract),
        )
        .await
    }
    .boxed()
}

#[tokio::test]
async fn exec_steps_can_read_registry_and_abort() {
    let submitter = Arc::new(MockSubmitter::default());
    submitter.push_response(instantiate_tx("T1", "wasm1abc"));
    let confirmer = Arc::new(ScriptedConfirmer::scripted(vec![true, false], true));
    let mut providers = providers(submitter.clone());
    let shared: Arc<dyn gauntlet_api::operator::Confirmer> = confirmer.clone();
    providers.confirmer = shared;

    let flow = Flow::new(
        "ocr2:exec:flow",
        vec![
            FlowStep::command("Deploy", deploy()).with_id(1),
            FlowStep::exec("Change RDD", ask_operator),
            FlowStep::command("Propose", propose()).with_arg(FlowValue::contract_of(1)),
        ],
    );
    let err = assert_err!(flow.execute(&providers, &Flags::new(), &[]).await);
    assert_error_code!(err, "INSTRUCTION_CONFIRMATION_DENIED");
    assert_eq!(confirmer.prompts()[1], "Update the RDD for wasm1abc. Ready?");
    assert_eq!(submitter.call_count(), 1);
}

#[tokio::test]
async fn flow_flags_reach_every_step() {
    let submitter = Arc::new(MockSubmitter::default());
    submitter.push_response(wasm_tx("T1", &[]));
    let flow = Flow::new(
        "ocr2:finalize:flow",
        vec![FlowStep::command("Finalize", finalize()).with_arg(FlowValue::literal("wasm1abc"))],
    );
    let flags = Flags::from_iter([("proposalId".to_string(), json!(3))]);
    flow.execute(&providers(submitter.clone()), &flags, &[])
        .await
        .unwrap();
    assert_eq!(
        submitter.calls()[0],
        RecordedCall::Execute {
            contract: "wasm1abc".into(),
            msg: json!({ "finalize_proposal": { "id": "3" } }),
        }
    );
}

#[tokio::test]
async fn steps_without_args_receive_flow_args() {
    let submitter = Arc::new(MockSubmitter::default());
    submitter.push_response(wasm_tx("T1", &[]));
    let flow = Flow::new(
        "ocr2:finalize:flow",
        vec![FlowStep::command("Finalize", finalize())],
    );
    let flags = Flags::from_iter([("proposalId".to_string(), json!("5"))]);
    flow.execute(&providers(submitter.clone()), &flags, &["wasm1xyz".to_string()])
        .await
        .unwrap();
    assert_eq!(
        submitter.calls()[0],
        RecordedCall::Execute {
            contract: "wasm1xyz".into(),
            msg: json!({ "finalize_proposal": { "id": "5" } }),
        }
    );
}
