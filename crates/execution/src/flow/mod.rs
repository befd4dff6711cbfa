// Path: crates/execution/src/flow/mod.rs
//! The flow orchestrator.
//!
//! A flow runs its steps strictly in order. Step arguments and flags may
//! reference outputs of earlier steps; references are resolved just before the
//! step runs, against a registry that lives only for one invocation.

mod registry;

pub use registry::{FlowValue, StepField, StepRecord, StepRef, StepRegistry};

use crate::command::Command;
use crate::context::Providers;
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use gauntlet_types::app::CommandResult;
use gauntlet_types::error::{FlowError, InstructionError};
use gauntlet_types::flags::Flags;
use std::collections::BTreeSet;
use std::sync::Arc;

/// An inline, side-effecting step with no structured result.
pub type ExecFn =
    for<'a> fn(&'a Providers, &'a StepRegistry) -> BoxFuture<'a, Result<(), InstructionError>>;

/// What a step does.
pub enum StepAction {
    /// Runs a compiled command.
    Command {
        /// The command.
        command: Arc<dyn Command>,
        /// Positional arguments.
        args: Vec<FlowValue>,
        /// Flags, overlaid on the flow's own flags.
        flags: Vec<(String, FlowValue)>,
    },
    /// Runs an inline function.
    Exec(ExecFn),
}

/// One node of a flow.
pub struct FlowStep {
    /// The back-reference target; only steps with an id are recorded.
    pub id: Option<u32>,
    /// A human-readable name.
    pub name: String,
    /// The action.
    pub action: StepAction,
}

impl FlowStep {
    /// A step running `command`. Without arguments of its own it receives the
    /// flow's arguments.
    pub fn command(name: impl Into<String>, command: Arc<dyn Command>) -> Self {
        Self {
            id: None,
            name: name.into(),
            action: StepAction::Command {
                command,
                args: Vec::new(),
                flags: Vec::new(),
            },
        }
    }

    /// A step running `exec`.
    pub fn exec(name: impl Into<String>, exec: ExecFn) -> Self {
        Self {
            id: None,
            name: name.into(),
            action: StepAction::Exec(exec),
        }
    }

    /// Sets the step id.
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    /// Appends a positional argument. Ignored by exec steps.
    pub fn with_arg(mut self, value: FlowValue) -> Self {
        if let StepAction::Command { args, .. } = &mut self.action {
            args.push(value);
        }
        self
    }

    /// Sets a flag. Ignored by exec steps.
    pub fn with_flag(mut self, key: &str, value: FlowValue) -> Self {
        if let StepAction::Command { flags, .. } = &mut self.action {
            flags.push((key.to_string(), value));
        }
        self
    }
}

/// A named, ordered sequence of steps, itself runnable as a command.
pub struct Flow {
    id: String,
    steps: Vec<FlowStep>,
    examples: Vec<String>,
}

impl Flow {
    /// A flow named `id`.
    pub fn new(id: impl Into<String>, steps: Vec<FlowStep>) -> Self {
        Self {
            id: id.into(),
            steps,
            examples: Vec::new(),
        }
    }

    /// Adds example invocations.
    pub fn with_examples(mut self, examples: &[&str]) -> Self {
        self.examples
            .extend(examples.iter().map(|e| e.to_string()));
        self
    }

    /// The steps, in order.
    pub fn steps(&self) -> &[FlowStep] {
        &self.steps
    }

    fn check_ids(&self) -> Result<(), FlowError> {
        let mut seen = BTreeSet::new();
        for id in self.steps.iter().filter_map(|s| s.id) {
            if !seen.insert(id) {
                return Err(FlowError::DuplicateStepId(id));
            }
        }
        Ok(())
    }

    async fn run_step(
        &self,
        step: &FlowStep,
        providers: &Providers,
        flags: &Flags,
        flow_args: &[String],
        registry: &mut StepRegistry,
        result: &mut CommandResult,
    ) -> Result<(), InstructionError> {
        match &step.action {
            StepAction::Exec(exec) => exec(providers, registry).await,
            StepAction::Command {
                command,
                args,
                flags: step_flags,
            } => {
                let args = if args.is_empty() {
                    flow_args.to_vec()
                } else {
                    args.iter()
                        .map(|a| registry.resolve_string(a))
                        .collect::<Result<Vec<_>, _>>()?
                };
                let mut merged = flags.clone();
                for (key, value) in step_flags {
                    merged.insert(key.clone(), registry.resolve_value(value)?);
                }

                let output = command.execute(providers, &merged, &args).await?;
                if let Some(id) = step.id {
                    let record = output
                        .first()
                        .map(|entry| StepRecord {
                            contract: entry.contract.clone(),
                            data: entry.data.clone(),
                        })
                        .unwrap_or_default();
                    registry.record(id, record)?;
                }
                result.responses.extend(output.responses);
                Ok(())
            }
        }
    }
}

#[async_trait]
impl Command for Flow {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn examples(&self) -> Vec<String> {
        self.examples.clone()
    }

    async fn execute(
        &self,
        providers: &Providers,
        flags: &Flags,
        args: &[String],
    ) -> Result<CommandResult, InstructionError> {
        self.check_ids()?;
        let mut registry = StepRegistry::default();
        let mut result = CommandResult::default();
        let total = self.steps.len();

        for (index, step) in self.steps.iter().enumerate() {
            println!("\n▶️  Step {}/{}: {}", index + 1, total, step.name);
            tracing::info!(target: "flow", flow = %self.id, step = %step.name, index, "running step");
            if let Err(e) = self
                .run_step(step, providers, flags, args, &mut registry, &mut result)
                .await
            {
                tracing::error!(target: "flow", flow = %self.id, step = %step.name, error = %e, "step failed, aborting flow");
                return Err(e);
            }
        }

        println!("\n✅ Flow {} completed ({} steps)", self.id, total);
        Ok(result)
    }
}

#[cfg(test)]
mod tests;
