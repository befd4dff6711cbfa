// Path: crates/execution/src/flow/registry.rs

use gauntlet_types::error::FlowError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Which output of a step a reference reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepField {
    /// The contract address the step created or targeted.
    Contract,
    /// A named entry of the step's auxiliary data.
    Data(String),
}

impl StepField {
    fn name(&self) -> &str {
        match self {
            StepField::Contract => "contract",
            StepField::Data(key) => key,
        }
    }
}

/// A reference to an output of an earlier step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRef {
    /// The id of the producing step.
    pub step_id: u32,
    /// The output read.
    pub field: StepField,
}

/// A step argument or flag: a literal or a reference resolved when the step runs.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowValue {
    /// A fixed value.
    Literal(Value),
    /// An output of an earlier step.
    Ref(StepRef),
}

impl FlowValue {
    /// A fixed value.
    pub fn literal(value: impl Into<Value>) -> Self {
        FlowValue::Literal(value.into())
    }

    /// The contract address of step `step_id`.
    pub fn contract_of(step_id: u32) -> Self {
        FlowValue::Ref(StepRef {
            step_id,
            field: StepField::Contract,
        })
    }

    /// The `key` data entry of step `step_id`.
    pub fn data_of(step_id: u32, key: &str) -> Self {
        FlowValue::Ref(StepRef {
            step_id,
            field: StepField::Data(key.to_string()),
        })
    }
}

/// What a step produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepRecord {
    /// The contract address, if any.
    pub contract: Option<String>,
    /// The auxiliary data returned by post-processing.
    pub data: Map<String, Value>,
}

/// The outputs of the steps run so far in one flow invocation.
///
/// Each id is written once; later steps only read.
#[derive(Debug, Default)]
pub struct StepRegistry {
    records: BTreeMap<u32, StepRecord>,
}

impl StepRegistry {
    /// Records the outputs of step `step_id`.
    pub fn record(&mut self, step_id: u32, record: StepRecord) -> Result<(), FlowError> {
        if self.records.contains_key(&step_id) {
            return Err(FlowError::DuplicateStepId(step_id));
        }
        self.records.insert(step_id, record);
        Ok(())
    }

    /// The outputs of step `step_id`, if it has run.
    pub fn get(&self, step_id: u32) -> Option<&StepRecord> {
        self.records.get(&step_id)
    }

    /// Resolves a reference.
    pub fn resolve(&self, reference: &StepRef) -> Result<Value, FlowError> {
        let record = self
            .get(reference.step_id)
            .ok_or(FlowError::StepNotExecuted {
                step_id: reference.step_id,
            })?;
        let value = match &reference.field {
            StepField::Contract => record.contract.clone().map(Value::String),
            StepField::Data(key) => record.data.get(key).cloned(),
        };
        value.ok_or_else(|| FlowError::FieldNotProduced {
            step_id: reference.step_id,
            field: reference.field.name().to_string(),
        })
    }

    /// Resolves a value; literals pass through.
    pub fn resolve_value(&self, value: &FlowValue) -> Result<Value, FlowError> {
        match value {
            FlowValue::Literal(v) => Ok(v.clone()),
            FlowValue::Ref(r) => self.resolve(r),
        }
    }

    /// Resolves a reference to a string, as positional arguments are passed.
    pub fn resolve_string(&self, value: &FlowValue) -> Result<String, FlowError> {
        Ok(match self.resolve_value(value)? {
            Value::String(s) => s,
            other => other.to_string(),
        })
    }
}
