// Path: crates/contracts/src/token.rs
//! The PLI token, a cw20-base contract minted entirely to the deployer.

use futures_util::future::{BoxFuture, FutureExt};
use gauntlet_api::operator::confirm_or_abort;
use gauntlet_execution::{
    instruction_to_command, Command, ExecutionInput, Instruction, InstructionContext,
    InstructionId,
};
use gauntlet_types::app::CommandResult;
use gauntlet_types::error::InstructionError;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// The cw20 code the token is deployed from.
pub const CW20_BASE: &str = "cw20_base";
/// Total supply, in the smallest unit (1e9 PLI at 18 decimals).
pub const TOTAL_SUPPLY: &str = "1000000000000000000000000000";

const TOKEN_NAME: &str = "Plugin Token";
const TOKEN_SYMBOL: &str = "PLI";
const TOKEN_DECIMALS: u8 = 18;
const LOGO_URL: &str =
    "https://assets-global.website-files.com/5e8c4efdc725c62673645017/5e981c33430c9765dba5a098_Symbol%20White.svg";

#[derive(Debug, Serialize)]
struct Balance {
    address: String,
    amount: String,
}

#[derive(Debug, Serialize)]
struct Logo {
    url: String,
}

#[derive(Debug, Serialize)]
struct Marketing {
    project: String,
    logo: Logo,
}

#[derive(Debug, Serialize)]
struct Minter {
    minter: String,
}

#[derive(Debug, Serialize)]
struct InstantiateMsg {
    name: String,
    symbol: String,
    decimals: u8,
    initial_balances: Vec<Balance>,
    marketing: Marketing,
    mint: Minter,
}

/// The deployer: it holds the supply and is the minter.
fn make_input(ctx: &InstructionContext, _: &[String]) -> Result<String, InstructionError> {
    Ok(ctx.providers.submitter.sender().to_string())
}

fn make_contract_input(owner: &String) -> Result<InstantiateMsg, InstructionError> {
    Ok(InstantiateMsg {
        name: TOKEN_NAME.to_string(),
        symbol: TOKEN_SYMBOL.to_string(),
        decimals: TOKEN_DECIMALS,
        initial_balances: vec![Balance {
            address: owner.clone(),
            amount: TOTAL_SUPPLY.to_string(),
        }],
        marketing: Marketing {
            project: "Plugin".to_string(),
            logo: Logo {
                url: LOGO_URL.to_string(),
            },
        },
        mint: Minter {
            minter: owner.clone(),
        },
    })
}

fn confirm_deploy<'a>(
    ctx: &'a InstructionContext,
    _: &'a ExecutionInput<String, InstantiateMsg>,
) -> BoxFuture<'a, Result<(), InstructionError>> {
    async move { confirm_or_abort(ctx.providers.confirmer.as_ref(), "Begin deploying PLI Token?").await }
        .boxed()
}

fn report_token<'a>(
    ctx: &'a InstructionContext,
    input: &'a ExecutionInput<String, InstantiateMsg>,
    result: &'a CommandResult,
) -> BoxFuture<'a, Result<Map<String, Value>, InstructionError>> {
    async move {
        let mut data = Map::new();
        let Some(address) = result.first().and_then(|entry| entry.contract.clone()) else {
            return Ok(data);
        };
        let info = ctx
            .providers
            .querier
            .query_contract(&address, &json!({ "token_info": {} }))
            .await?;
        tracing::info!(target: "token", contract = %address, owner = %input.user, "PLI token deployed");
        println!("✅ PLI token deployed at {}", address);
        println!("{}", info);
        data.insert("tokenInfo".to_string(), info);
        Ok(data)
    }
    .boxed()
}

/// `token:deploy`
pub fn deploy() -> Arc<dyn Command> {
    instruction_to_command(
        Instruction::new(
            InstructionId::new(CW20_BASE, "deploy").in_category("token"),
            make_input,
            make_contract_input,
        )
        .with_before_execute(confirm_deploy)
        .with_after_execute(report_token)
        .with_examples(&["gauntlet token:deploy --network=local"]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauntlet_api::rdd::FileRddSource;
    use gauntlet_execution::{CodeIds, Providers};
    use gauntlet_test_utils::fixtures::{instantiate_tx, FIXTURE_SENDER};
    use gauntlet_test_utils::{
        assert_err, assert_error_code, MockQuerier, MockSubmitter, RecordedCall,
        ScriptedConfirmer, StaticSecret,
    };
    use gauntlet_types::flags::Flags;

    const TOKEN: &str = "wasm1wxtjwxy29n63uhc9xyw4jacs3qejy2kq6fcf79anlfvtuha7097s3wr2dx";

    fn providers(submitter: Arc<MockSubmitter>, confirmer: ScriptedConfirmer) -> Providers {
        let mut ids = CodeIds::default();
        ids.insert(CW20_BASE, 11);
        let querier = MockQuerier::new().with_answer(
            TOKEN,
            "token_info",
            json!({ "name": TOKEN_NAME, "symbol": TOKEN_SYMBOL, "decimals": 18, "total_supply": TOTAL_SUPPLY }),
        );
        Providers::new(
            submitter,
            Arc::new(querier),
            Arc::new(confirmer),
            Arc::new(StaticSecret::missing()),
            Arc::new(FileRddSource),
        )
        .with_code_ids(ids)
    }

    #[tokio::test]
    async fn mints_supply_to_deployer() {
        let submitter = Arc::new(MockSubmitter::default());
        submitter.push_response(instantiate_tx("T1", TOKEN));
        let command = deploy();
        assert_eq!(command.id(), "token:deploy");

        let result = command
            .execute(
                &providers(submitter.clone(), ScriptedConfirmer::approving()),
                &Flags::new(),
                &[],
            )
            .await
            .unwrap();

        let calls = submitter.calls();
        let RecordedCall::Instantiate { code_id, msg, .. } = &calls[0] else {
            panic!("expected an instantiate, got {:?}", calls[0]);
        };
        assert_eq!(*code_id, 11);
        assert_eq!(msg["symbol"], json!("PLI"));
        assert_eq!(msg["decimals"], json!(18));
        assert_eq!(
            msg["initial_balances"],
            json!([{ "address": FIXTURE_SENDER, "amount": TOTAL_SUPPLY }])
        );
        assert_eq!(msg["mint"], json!({ "minter": FIXTURE_SENDER }));
        assert_eq!(msg["marketing"]["logo"]["url"], json!(LOGO_URL));

        let entry = result.first().unwrap();
        assert_eq!(entry.contract.as_deref(), Some(TOKEN));
        assert_eq!(entry.data["tokenInfo"]["symbol"], json!("PLI"));
    }

    #[tokio::test]
    async fn declining_the_prompt_deploys_nothing() {
        let submitter = Arc::new(MockSubmitter::default());
        let confirmer = ScriptedConfirmer::denying();
        let err = assert_err!(
            deploy()
                .execute(&providers(submitter.clone(), confirmer), &Flags::new(), &[])
                .await
        );
        assert_error_code!(err, "INSTRUCTION_CONFIRMATION_DENIED");
        assert_eq!(submitter.call_count(), 0);
    }
}
