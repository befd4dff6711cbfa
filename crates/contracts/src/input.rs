// Path: crates/contracts/src/input.rs
//! Flag and argument helpers shared by the instructions.

use gauntlet_execution::validation::is_valid_address;
use gauntlet_execution::InstructionContext;
use gauntlet_types::error::{InstructionError, ValidationFailure};
use gauntlet_types::flags::FlagsExt;
use gauntlet_types::rdd::Rdd;

/// `--proposalId`, with its aliases in precedence order.
pub(crate) const PROPOSAL_ID_FLAGS: [&str; 3] = ["proposalId", "configProposal", "id"];

/// The rule name of `validateInput`.
pub(crate) const VALIDATE_INPUT: &str = "validateInput";

pub(crate) fn proposal_id(ctx: &InstructionContext) -> Option<String> {
    ctx.flags.string_of(&PROPOSAL_ID_FLAGS)
}

pub(crate) fn require_proposal_id(ctx: &InstructionContext) -> Result<String, InstructionError> {
    proposal_id(ctx).ok_or_else(|| {
        InstructionError::input("A Config Proposal ID is required. Provide it with --configProposal flag")
    })
}

/// Loads the RDD named by `--rdd`, if given.
pub(crate) fn rdd(ctx: &InstructionContext) -> Result<Option<Rdd>, InstructionError> {
    match ctx.flags.string_of(&["rdd"]) {
        Some(path) => Ok(Some(ctx.providers.rdd.load(&path)?)),
        None => Ok(None),
    }
}

/// The RDD key of the aggregator: the first argument.
pub(crate) fn rdd_key<'a>(ctx: &InstructionContext, args: &'a [String]) -> Result<&'a str, InstructionError> {
    args.first().map(String::as_str).ok_or_else(|| {
        InstructionError::input(format!(
            "{} with --rdd needs the contract id in the RDD as its first argument",
            ctx.id
        ))
    })
}

pub(crate) fn require_flag(ctx: &InstructionContext, key: &str) -> Result<String, InstructionError> {
    ctx.flags
        .string_of(&[key])
        .filter(|v| !v.is_empty())
        .ok_or_else(|| InstructionError::input(format!("--{} is required", key)))
}

/// Collects the failures of one validation rule.
pub(crate) struct RuleCheck {
    name: &'static str,
    failures: Vec<ValidationFailure>,
}

impl RuleCheck {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            failures: Vec::new(),
        }
    }

    /// Records `message` unless `ok`.
    pub(crate) fn ensure(&mut self, ok: bool, message: impl FnOnce() -> String) -> &mut Self {
        if !ok {
            self.failures.push(ValidationFailure::new(self.name, message()));
        }
        self
    }

    /// Records `message` unless `address` is a well-formed bech32 address.
    pub(crate) fn address(&mut self, address: &str, message: &str) -> &mut Self {
        self.ensure(is_valid_address(address), || format!("{}: '{}'", message, address))
    }

    pub(crate) fn finish(&mut self) -> Result<(), InstructionError> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(InstructionError::Validation(std::mem::take(&mut self.failures)))
        }
    }
}
