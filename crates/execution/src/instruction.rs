// Path: crates/execution/src/instruction.rs
//! The instruction descriptor.
//!
//! An instruction is plain data: a routing id plus one function pointer per
//! lifecycle hook. It carries no state, so one value can be compiled and run
//! any number of times.

use crate::context::InstructionContext;
use futures_util::future::BoxFuture;
use gauntlet_types::app::{CommandResult, Operation};
use gauntlet_types::error::InstructionError;
use serde_json::{Map, Value};
use std::fmt;

/// Identifies the on-chain entry point an instruction targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstructionId {
    /// The command category, e.g. `ocr2`.
    pub category: &'static str,
    /// The contract id used for code ids and artifacts.
    pub contract: &'static str,
    /// The contract function; `deploy` instantiates.
    pub function: &'static str,
}

impl InstructionId {
    /// An id whose category is the contract id.
    pub const fn new(contract: &'static str, function: &'static str) -> Self {
        Self {
            category: contract,
            contract,
            function,
        }
    }

    /// Overrides the category.
    pub const fn in_category(mut self, category: &'static str) -> Self {
        self.category = category;
        self
    }

    /// Whether the instruction instantiates or executes.
    pub fn operation(&self) -> Operation {
        Operation::for_function(self.function)
    }
}

impl fmt::Display for InstructionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category, self.function)
    }
}

/// The user-shaped input and the wire-shaped payload of one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionInput<I, C> {
    /// The command input built from flags and arguments.
    pub user: I,
    /// The contract payload built from the command input.
    pub contract: C,
}

/// Builds the command input from the invocation's flags and positional arguments.
pub type MakeInput<I> = fn(&InstructionContext, &[String]) -> Result<I, InstructionError>;

/// A validation rule over the command input.
pub type Validate<I> = fn(&I) -> Result<(), InstructionError>;

/// Builds the contract payload from a validated command input.
pub type MakeContractInput<I, C> = fn(&I) -> Result<C, InstructionError>;

/// Side-effecting pre-flight, run after validation and before submission.
pub type BeforeExecute<I, C> = for<'a> fn(
    &'a InstructionContext,
    &'a ExecutionInput<I, C>,
) -> BoxFuture<'a, Result<(), InstructionError>>;

/// Post-processing of the submission result; returns data for later flow steps.
pub type AfterExecute<I, C> = for<'a> fn(
    &'a InstructionContext,
    &'a ExecutionInput<I, C>,
    &'a CommandResult,
) -> BoxFuture<'a, Result<Map<String, Value>, InstructionError>>;

/// A declarative description of one contract call.
pub struct Instruction<I, C> {
    /// The routing id.
    pub id: InstructionId,
    /// Example invocations shown by `list`.
    pub examples: Vec<&'static str>,
    /// Stage 1.
    pub make_input: MakeInput<I>,
    /// Stage 2, always run first among the rules.
    pub validate_input: Validate<I>,
    /// Named rules run after `validate_input`; each failure is reported.
    pub validations: Vec<(&'static str, Validate<I>)>,
    /// Stage 3.
    pub make_contract_input: MakeContractInput<I, C>,
    /// Stage 4.
    pub before_execute: Option<BeforeExecute<I, C>>,
    /// Stage 6.
    pub after_execute: Option<AfterExecute<I, C>>,
    /// The code id key for deployments when it differs from the contract id.
    pub code_id_key: Option<&'static str>,
}

fn accept_any<I>(_: &I) -> Result<(), InstructionError> {
    Ok(())
}

impl<I, C> Instruction<I, C> {
    /// An instruction with no extra validations or hooks.
    pub fn new(
        id: InstructionId,
        make_input: MakeInput<I>,
        make_contract_input: MakeContractInput<I, C>,
    ) -> Self {
        Self {
            id,
            examples: Vec::new(),
            make_input,
            validate_input: accept_any::<I>,
            validations: Vec::new(),
            make_contract_input,
            before_execute: None,
            after_execute: None,
            code_id_key: None,
        }
    }

    /// Sets `validateInput`.
    pub fn with_validate_input(mut self, rule: Validate<I>) -> Self {
        self.validate_input = rule;
        self
    }

    /// Adds a named validation.
    pub fn with_validation(mut self, name: &'static str, rule: Validate<I>) -> Self {
        self.validations.push((name, rule));
        self
    }

    /// Sets the pre-flight hook.
    pub fn with_before_execute(mut self, hook: BeforeExecute<I, C>) -> Self {
        self.before_execute = Some(hook);
        self
    }

    /// Sets the post-processing hook.
    pub fn with_after_execute(mut self, hook: AfterExecute<I, C>) -> Self {
        self.after_execute = Some(hook);
        self
    }

    /// Adds example invocations.
    pub fn with_examples(mut self, examples: &[&'static str]) -> Self {
        self.examples.extend_from_slice(examples);
        self
    }

    /// Deploys from the code id stored under `key`.
    pub fn with_code_id_key(mut self, key: &'static str) -> Self {
        self.code_id_key = Some(key);
        self
    }

    /// The code id key for deployments.
    pub fn code_id_key(&self) -> &'static str {
        self.code_id_key.unwrap_or(self.id.contract)
    }
}
