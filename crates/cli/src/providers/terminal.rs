// Path: crates/cli/src/providers/terminal.rs

use async_trait::async_trait;
use gauntlet_api::operator::Confirmer;
use gauntlet_types::error::InstructionError;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// Asks the operator on the terminal. `auto_approve` answers yes to everything.
///
/// One reader is kept for the whole run so answers piped in ahead of time are
/// consumed one prompt at a time.
pub struct TerminalConfirmer {
    auto_approve: bool,
    answers: Mutex<Lines<BufReader<Stdin>>>,
}

impl TerminalConfirmer {
    /// A confirmer that prompts unless `auto_approve` is set.
    pub fn new(auto_approve: bool) -> Self {
        Self {
            auto_approve,
            answers: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

/// Only an explicit yes approves.
pub(crate) fn is_approval(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[async_trait]
impl Confirmer for TerminalConfirmer {
    async fn confirm(&self, prompt: &str) -> Result<bool, InstructionError> {
        if self.auto_approve {
            println!("❔ {} (auto-approved)", prompt);
            return Ok(true);
        }
        print!("❔ {} (y/N) ", prompt);
        std::io::stdout()
            .flush()
            .map_err(|e| InstructionError::input(format!("writing prompt: {}", e)))?;

        let answer = self
            .answers
            .lock()
            .await
            .next_line()
            .await
            .map_err(|e| InstructionError::input(format!("reading answer: {}", e)))?;
        match answer {
            Some(line) => Ok(is_approval(&line)),
            None => {
                tracing::warn!(target: "operator", prompt, "stdin closed, treating as denial");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_yes_approves() {
        for yes in ["y", "Y", "yes", " YES\n"] {
            assert!(is_approval(yes), "{yes:?}");
        }
        for no in ["", "\n", "n", "no", "yep", "sure"] {
            assert!(!is_approval(no), "{no:?}");
        }
    }

    #[tokio::test]
    async fn auto_approve_skips_the_prompt() {
        assert!(TerminalConfirmer::new(true).confirm("Continue?").await.unwrap());
    }
}
