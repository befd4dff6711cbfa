// Path: crates/cli/src/main.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Gauntlet
//!
//! Deploys and configures OCR2 feeds on CosmWasm chains.

use anyhow::Result;
use clap::{Parser, Subcommand};
use gauntlet_cli::commands::{exec, list, GlobalArgs};
use gauntlet_telemetry::{init_tracing, LogFormat};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "gauntlet",
    version,
    about = "Deploys and configures OCR2 feeds on CosmWasm chains.",
    long_about = "Runs contract commands such as `ocr2:deploy` or `ocr2:initialize:flow`. Flags after the command id are passed to the command as --key=value pairs."
)]
struct Cli {
    /// The network profile, read from `<networks-dir>/<network>.toml`.
    #[clap(long, global = true, default_value = "local")]
    network: String,

    /// The directory holding network profiles.
    #[clap(long, global = true, default_value = "networks")]
    networks_dir: PathBuf,

    /// Approve every confirmation prompt.
    #[clap(short, long, global = true)]
    yes: bool,

    /// Log output format: `pretty` or `json`.
    #[clap(long, global = true, default_value = "pretty")]
    log_format: LogFormat,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every command and its examples.
    List,

    /// Run a command, e.g. `gauntlet ocr2:deploy --rdd=./rdd.json <ADDRESS>`.
    #[clap(external_subcommand)]
    Exec(Vec<String>),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format)?;

    let global = GlobalArgs {
        network: cli.network,
        networks_dir: cli.networks_dir,
        yes: cli.yes,
    };

    match cli.command {
        Commands::List => {
            let config = gauntlet_cli::setup::load_network(&global.networks_dir, &global.network)?;
            list::run(&gauntlet_cli::setup::registry(&config))
        }
        Commands::Exec(raw) => exec::run(&global, raw).await,
    }
}
