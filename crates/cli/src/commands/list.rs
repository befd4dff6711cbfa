// Path: crates/cli/src/commands/list.rs

use anyhow::Result;
use gauntlet_execution::CommandRegistry;

/// Prints every command id with its examples.
pub fn run(registry: &CommandRegistry) -> Result<()> {
    println!("Available commands:");
    for command in registry.commands() {
        println!("  {}", command.id());
        for example in command.examples() {
            println!("      {}", example);
        }
    }
    println!();
    println!("Any execute command can be prefixed with `batch:` and/or `multisig:`.");
    Ok(())
}
