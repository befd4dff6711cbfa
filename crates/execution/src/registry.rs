// Path: crates/execution/src/registry.rs
//! Lookup of commands by id, including decorated ids.

use crate::command::Command;
use crate::decorators::{BatchCommand, MultisigCommand, BATCH_PREFIX, MULTISIG_PREFIX};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Every command the CLI can run, keyed by id.
///
/// `multisig:<id>`, `batch:<id>` and `multisig:batch:<id>` resolve to the
/// decorated form of `<id>`.
#[derive(Default, Clone)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `command` under its own id, replacing any previous one.
    pub fn register(&mut self, command: Arc<dyn Command>) -> &mut Self {
        let id = command.id();
        if self.commands.insert(id.clone(), command).is_some() {
            tracing::warn!(target: "execution", command = %id, "command registered twice");
        }
        self
    }

    /// Registers every command in `commands`.
    pub fn extend(&mut self, commands: impl IntoIterator<Item = Arc<dyn Command>>) -> &mut Self {
        for command in commands {
            self.register(command);
        }
        self
    }

    /// Resolves `id`, applying decorator prefixes.
    pub fn get(&self, id: &str) -> Option<Arc<dyn Command>> {
        match id.strip_prefix(MULTISIG_PREFIX) {
            Some(rest) => self.batchable(rest).map(MultisigCommand::wrap),
            None => self.batchable(id),
        }
    }

    fn batchable(&self, id: &str) -> Option<Arc<dyn Command>> {
        match id.strip_prefix(BATCH_PREFIX) {
            Some(rest) => self.commands.get(rest).cloned().map(BatchCommand::wrap),
            None => self.commands.get(id).cloned(),
        }
    }

    /// The ids of the undecorated commands, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// The undecorated commands, sorted by id.
    pub fn commands(&self) -> impl Iterator<Item = &Arc<dyn Command>> {
        self.commands.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Providers;
    use async_trait::async_trait;
    use gauntlet_types::app::CommandResult;
    use gauntlet_types::error::InstructionError;
    use gauntlet_types::flags::Flags;

    struct Named(&'static str);

    #[async_trait]
    impl Command for Named {
        fn id(&self) -> String {
            self.0.to_string()
        }

        async fn execute(
            &self,
            _: &Providers,
            _: &Flags,
            _: &[String],
        ) -> Result<CommandResult, InstructionError> {
            Ok(CommandResult::default())
        }
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry.extend([
            Arc::new(Named("ocr2:set_billing")) as Arc<dyn Command>,
            Arc::new(Named("flags:deploy")) as Arc<dyn Command>,
        ]);
        registry
    }

    #[test]
    fn resolves_plain_and_decorated_ids() {
        let registry = registry();
        assert_eq!(
            registry.ids().collect::<Vec<_>>(),
            vec!["flags:deploy", "ocr2:set_billing"]
        );
        for id in [
            "ocr2:set_billing",
            "multisig:ocr2:set_billing",
            "batch:ocr2:set_billing",
            "multisig:batch:ocr2:set_billing",
        ] {
            assert_eq!(registry.get(id).map(|c| c.id()).as_deref(), Some(id));
        }
    }

    #[test]
    fn rejects_unknown_and_misordered_prefixes() {
        let registry = registry();
        assert!(registry.get("ocr2:unknown").is_none());
        assert!(registry.get("batch:multisig:ocr2:set_billing").is_none());
        assert!(registry.get("multisig:multisig:ocr2:set_billing").is_none());
    }
}
