// Path: crates/cli/src/commands/mod.rs

pub mod exec;
pub mod list;

use std::path::PathBuf;

/// Options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    /// The network profile name.
    pub network: String,
    /// The directory holding network profiles.
    pub networks_dir: PathBuf,
    /// Approve every prompt.
    pub yes: bool,
}
