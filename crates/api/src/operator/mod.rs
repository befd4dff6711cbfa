// Path: crates/api/src/operator/mod.rs
//! Operator-facing collaborators: interactive confirmation and the secret source.

use async_trait::async_trait;
use gauntlet_types::error::InstructionError;

/// The environment variable holding the offchain config secret.
pub const SECRET_ENV: &str = "SECRET";

/// Suspends until the operator approves or denies a prompt.
#[async_trait]
pub trait Confirmer: Send + Sync {
    /// Returns `Ok(true)` on approval and `Ok(false)` on denial.
    async fn confirm(&self, prompt: &str) -> Result<bool, InstructionError>;
}

/// Asks for confirmation and turns a denial into [`InstructionError::ConfirmationDenied`].
pub async fn confirm_or_abort(
    confirmer: &dyn Confirmer,
    prompt: &str,
) -> Result<(), InstructionError> {
    if confirmer.confirm(prompt).await? {
        Ok(())
    } else {
        tracing::warn!(target: "operator", prompt, "operator denied confirmation");
        Err(InstructionError::ConfirmationDenied(prompt.to_string()))
    }
}

/// Supplies the secret used to encode offchain configs.
pub trait SecretSource: Send + Sync {
    /// Returns the secret, or `None` when it is not configured.
    fn secret(&self) -> Option<String>;

    /// Returns the secret or fails input construction.
    fn require_secret(&self) -> Result<String, InstructionError> {
        self.secret()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| InstructionError::input(format!("{} is not set in env!", SECRET_ENV)))
    }
}

/// Reads the secret from an environment variable (`SECRET` by default).
#[derive(Debug, Clone)]
pub struct EnvSecretSource {
    var: String,
}

impl EnvSecretSource {
    /// A source reading `var`.
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvSecretSource {
    fn default() -> Self {
        Self::new(SECRET_ENV)
    }
}

impl SecretSource for EnvSecretSource {
    fn secret(&self) -> Option<String> {
        std::env::var(&self.var).ok()
    }
}
