// Path: crates/cli/src/commands/exec.rs

use super::GlobalArgs;
use crate::report::{report_path_from_env, write_report};
use crate::setup;
use anyhow::{anyhow, bail, Result};
use gauntlet_telemetry::Timer;
use gauntlet_types::error::ErrorCode as _;
use gauntlet_types::flags::{parse_raw_args, Flags, FlagsExt};

/// Runs `raw[0]` with the remaining tokens as its flags and arguments.
pub async fn run(global: &GlobalArgs, raw: Vec<String>) -> Result<()> {
    let Some((id, rest)) = raw.split_first() else {
        bail!("no command given; run `gauntlet list` to see them");
    };
    let (flags, args) = parse_raw_args(rest);
    let global = overlay(global, &flags);

    let config = setup::load_network(&global.networks_dir, &global.network)?;
    let registry = setup::registry(&config);
    let Some(command) = registry.get(id) else {
        bail!("Command {} not found. Run `gauntlet list` to see the available commands", id);
    };
    if flags.is_set("help") {
        for example in command.examples() {
            println!("{}", example);
        }
        return Ok(());
    }

    let providers = setup::providers(&config, global.yes).await?;
    println!("🚀 Running {} on {}", id, config.name);
    let _timer = Timer::new(id.clone());

    match command.execute(&providers, &flags, &args).await {
        Ok(result) => {
            write_report(&report_path_from_env(), &result)?;
            println!("✅ {} finished", id);
            Ok(())
        }
        Err(e) => {
            tracing::error!(target: "gauntlet", command = %id, code = e.code(), error = %e, "command failed");
            Err(anyhow!("{} failed [{}]: {}", id, e.code(), e))
        }
    }
}

/// Lets `--network` and `--yes` also be given after the command id.
fn overlay(global: &GlobalArgs, flags: &Flags) -> GlobalArgs {
    GlobalArgs {
        network: flags
            .string_of(&["network"])
            .unwrap_or_else(|| global.network.clone()),
        networks_dir: global.networks_dir.clone(),
        yes: global.yes || flags.is_set("yes") || flags.is_set("y"),
    }
}
