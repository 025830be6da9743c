use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use starcatch_replay::{Runner, Scenario, Variant};

#[derive(Parser)]
#[command(name = "starcatch-replay")]
#[command(about = "Replay a scripted Star Catch session headlessly")]
struct Cli {
    /// Scenario file (TOML)
    scenario: PathBuf,

    /// Override the scenario's variant
    #[arg(long, value_parser = parse_variant)]
    variant: Option<Variant>,

    /// Override the scenario's RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the scenario's [expect] block
    #[arg(long)]
    no_check: bool,
}

fn parse_variant(s: &str) -> Result<Variant, String> {
    match s {
        "classic" => Ok(Variant::Classic),
        "touch" => Ok(Variant::Touch),
        "configured" => Ok(Variant::Configured),
        other => Err(format!(
            "unknown variant '{other}', expected classic, touch, or configured"
        )),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut scenario = Scenario::load(&cli.scenario)
        .with_context(|| format!("Failed to load scenario {}", cli.scenario.display()))?;
    if let Some(variant) = cli.variant {
        scenario.variant = variant;
    }
    if let Some(seed) = cli.seed {
        scenario.seed = seed;
    }

    tracing::info!(
        variant = ?scenario.variant,
        seed = scenario.seed,
        steps = scenario.steps.len(),
        "Replaying scenario"
    );
    let outcome = Runner::run(&scenario).context("Scenario aborted")?;
    println!(
        "{}",
        serde_json::to_string_pretty(&outcome).context("Failed to encode outcome")?
    );

    if !cli.no_check
        && let Some(expect) = &scenario.expect
    {
        outcome.check(expect).context("Scenario expectations not met")?;
    }
    Ok(())
}
