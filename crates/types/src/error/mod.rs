// Path: crates/types/src/error/mod.rs
//! Core error types for the Gauntlet CLI.
//!
//! Every stage of the instruction pipeline fails with one [`InstructionError`];
//! the narrower enums below are the errors raised by the collaborators the
//! pipeline drives, and convert into it with `?`.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// A single failed validation rule, reported independently of the others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// The name of the rule (`validateInput` or the named extra validation).
    pub name: String,
    /// A descriptive message, including the offending value.
    pub message: String,
}

impl ValidationFailure {
    /// Creates a failure for the rule `name`.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.name, self.message)
    }
}

fn join_failures(failures: &[ValidationFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The error surfaced by a compiled command. Any variant aborts the command.
#[derive(Debug, Error)]
pub enum InstructionError {
    /// Malformed or missing CLI input, or a missing environment secret.
    #[error("Input construction failed: {0}")]
    InputConstruction(String),
    /// One or more validation rules failed; each failure is listed.
    #[error("Validation failed: {}", join_failures(.0))]
    Validation(Vec<ValidationFailure>),
    /// The contract call was rejected or could not be broadcast.
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    /// A read-only query against the chain failed.
    #[error(transparent)]
    Query(#[from] QueryError),
    /// An expected event or attribute was absent after a successful submission.
    #[error(transparent)]
    EventExtraction(#[from] EventExtractionError),
    /// The offchain config could not be encoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// The operator declined a confirmation prompt.
    #[error("Operation cancelled by operator: {0}")]
    ConfirmationDenied(String),
    /// A flow step could not be run.
    #[error(transparent)]
    Flow(#[from] FlowError),
    /// Contract artifacts or code ids could not be resolved.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    /// The command is not supported in the requested mode (e.g. wrapped in a multisig).
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl InstructionError {
    /// Shorthand for a single failed validation rule.
    pub fn validation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![ValidationFailure::new(name, message)])
    }

    /// Shorthand for an input construction failure.
    pub fn input(message: impl Into<String>) -> Self {
        Self::InputConstruction(message.into())
    }
}

impl ErrorCode for InstructionError {
    fn code(&self) -> &'static str {
        match self {
            Self::InputConstruction(_) => "INSTRUCTION_INPUT_CONSTRUCTION_FAILED",
            Self::Validation(_) => "INSTRUCTION_VALIDATION_FAILED",
            Self::Submission(e) => e.code(),
            Self::Query(e) => e.code(),
            Self::EventExtraction(e) => e.code(),
            Self::Codec(e) => e.code(),
            Self::ConfirmationDenied(_) => "INSTRUCTION_CONFIRMATION_DENIED",
            Self::Flow(e) => e.code(),
            Self::Artifact(e) => e.code(),
            Self::Unsupported(_) => "INSTRUCTION_UNSUPPORTED",
        }
    }
}

impl From<serde_json::Error> for InstructionError {
    fn from(e: serde_json::Error) -> Self {
        InstructionError::InputConstruction(format!("JSON error: {}", e))
    }
}

/// Errors raised by the submission collaborator.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The transport to the signer or node failed.
    #[error("Transport error: {0}")]
    Transport(String),
    /// The chain or contract rejected the transaction.
    #[error("Transaction rejected: {0}")]
    Rejected(String),
    /// The transaction was broadcast but no confirmation was observed.
    #[error("Transaction {0} was not confirmed")]
    Unconfirmed(String),
    /// Retries were exhausted; carries the last error message.
    #[error("Giving up after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// How many attempts were made.
        attempts: u32,
        /// The message of the final failure.
        last_error: String,
    },
}

impl ErrorCode for SubmissionError {
    fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "SUBMISSION_TRANSPORT_ERROR",
            Self::Rejected(_) => "SUBMISSION_REJECTED",
            Self::Unconfirmed(_) => "SUBMISSION_UNCONFIRMED",
            Self::RetriesExhausted { .. } => "SUBMISSION_RETRIES_EXHAUSTED",
        }
    }
}

/// Errors raised by the query collaborator.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The transport to the node failed.
    #[error("Query transport error: {0}")]
    Transport(String),
    /// The contract returned an error for the query.
    #[error("Contract query failed: {0}")]
    Contract(String),
    /// The node returned a body that could not be decoded.
    #[error("Malformed query response: {0}")]
    Malformed(String),
}

impl ErrorCode for QueryError {
    fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "QUERY_TRANSPORT_ERROR",
            Self::Contract(_) => "QUERY_CONTRACT_ERROR",
            Self::Malformed(_) => "QUERY_MALFORMED_RESPONSE",
        }
    }
}

/// An expected event or attribute was not emitted by the transaction.
///
/// This signals a protocol mismatch between the CLI and the deployed contract version.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventExtractionError {
    /// No event of the expected type was emitted.
    #[error("No '{event_type}' event found in transaction {tx_hash}")]
    EventNotFound {
        /// The event type that was searched for.
        event_type: String,
        /// The transaction that was inspected.
        tx_hash: String,
    },
    /// The event exists but does not carry the attribute.
    #[error("Event '{event_type}' in transaction {tx_hash} has no '{key}' attribute")]
    AttributeNotFound {
        /// The event type that was inspected.
        event_type: String,
        /// The missing attribute key.
        key: String,
        /// The transaction that was inspected.
        tx_hash: String,
    },
    /// The submission produced no transaction to inspect.
    #[error("Command returned no transaction response")]
    NoResponse,
}

impl ErrorCode for EventExtractionError {
    fn code(&self) -> &'static str {
        match self {
            Self::EventNotFound { .. } => "EVENT_NOT_FOUND",
            Self::AttributeNotFound { .. } => "EVENT_ATTRIBUTE_NOT_FOUND",
            Self::NoResponse => "EVENT_NO_RESPONSE",
        }
    }
}

/// Errors from the offchain config codec and its secret derivation.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A public key was not valid hex after its prefix was stripped.
    #[error("Invalid public key '{key}': {reason}")]
    InvalidPublicKey {
        /// The key as supplied.
        key: String,
        /// Why it was rejected.
        reason: String,
    },
    /// A config value does not fit its wire type.
    #[error("Offchain config encode failed: {0}")]
    Encode(String),
    /// The binary blob could not be decoded.
    #[error("Offchain config decode failed: {0}")]
    Decode(String),
    /// Secret derivation or encryption failed.
    #[error("Secret derivation failed: {0}")]
    Secret(String),
}

impl ErrorCode for CodecError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidPublicKey { .. } => "CODEC_INVALID_PUBLIC_KEY",
            Self::Encode(_) => "CODEC_ENCODE_FAILED",
            Self::Decode(_) => "CODEC_DECODE_FAILED",
            Self::Secret(_) => "CODEC_SECRET_FAILED",
        }
    }
}

/// Errors raised while running a flow.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    /// A reference names a step that has not run (or has no id).
    #[error("Step {step_id} has not produced a result yet")]
    StepNotExecuted {
        /// The referenced step id.
        step_id: u32,
    },
    /// The referenced step ran but never produced the field.
    #[error("Step {step_id} did not produce '{field}'")]
    FieldNotProduced {
        /// The referenced step id.
        step_id: u32,
        /// The missing field.
        field: String,
    },
    /// Two steps in one flow share an id.
    #[error("Step id {0} is already recorded in this flow")]
    DuplicateStepId(u32),
}

impl ErrorCode for FlowError {
    fn code(&self) -> &'static str {
        match self {
            Self::StepNotExecuted { .. } => "FLOW_STEP_NOT_EXECUTED",
            Self::FieldNotProduced { .. } => "FLOW_FIELD_NOT_PRODUCED",
            Self::DuplicateStepId(_) => "FLOW_DUPLICATE_STEP_ID",
        }
    }
}

/// Errors related to contract artifacts and code ids.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The contract id is not in the registry.
    #[error("Contract {0} not found!")]
    UnknownContract(String),
    /// Two different versions of the same contract were requested.
    #[error("Loading multiple versions ({loaded} and {requested}) of the same contract is unsupported.")]
    VersionConflict {
        /// The version already loaded.
        loaded: String,
        /// The version requested now.
        requested: String,
    },
    /// No code id is known for the contract on this network.
    #[error("No code id for contract {0}; upload it first")]
    MissingCodeId(String),
    /// Reading or downloading an artifact failed.
    #[error("Artifact I/O error: {0}")]
    Io(String),
}

impl ErrorCode for ArtifactError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownContract(_) => "ARTIFACT_UNKNOWN_CONTRACT",
            Self::VersionConflict { .. } => "ARTIFACT_VERSION_CONFLICT",
            Self::MissingCodeId(_) => "ARTIFACT_MISSING_CODE_ID",
            Self::Io(_) => "ARTIFACT_IO_ERROR",
        }
    }
}

impl From<std::io::Error> for ArtifactError {
    fn from(e: std::io::Error) -> Self {
        ArtifactError::Io(e.to_string())
    }
}

/// Errors from loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read {path}: {reason}")]
    Read {
        /// The path that was read.
        path: String,
        /// The I/O error message.
        reason: String,
    },
    /// The file could not be parsed.
    #[error("Failed to parse {path}: {reason}")]
    Parse {
        /// The path that was parsed.
        path: String,
        /// The parser error message.
        reason: String,
    },
    /// A value is present but invalid.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "CONFIG_READ_FAILED",
            Self::Parse { .. } => "CONFIG_PARSE_FAILED",
            Self::Invalid(_) => "CONFIG_INVALID",
        }
    }
}

impl From<ConfigError> for InstructionError {
    fn from(e: ConfigError) -> Self {
        InstructionError::InputConstruction(e.to_string())
    }
}
