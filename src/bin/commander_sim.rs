//! Commander Simulator
//! Plays the strategic commander through a sandbox match and reports what it did

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use forge_commander::commander::Commander;
use forge_commander::core::config::{load_profile, AttackStrategy, CommanderConfig};
use forge_commander::core::error::Result;
use forge_commander::sandbox::{default_services, SandboxWorld};
use forge_commander::world::command::CommandCategory;
use tracing_subscriber::EnvFilter;

/// Commander simulator - run the decision engine against a toy match
#[derive(Parser, Debug)]
#[command(name = "commander_sim")]
#[command(about = "Run the strategic commander through a sandbox match")]
struct Args {
    /// Commander profile (TOML); built-in defaults when omitted
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 20_000)]
    ticks: u64,

    /// Override the profile's seed (also seeds the sandbox)
    #[arg(long)]
    seed: Option<u64>,

    /// Override the attack strategy: wave_commit, opportunistic or both
    #[arg(long)]
    strategy: Option<AttackStrategy>,

    /// Print every command as a JSON line, then the final summary as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn load_config(args: &Args) -> Result<CommanderConfig> {
    let mut config = match &args.profile {
        Some(path) => load_profile(path)?,
        None => CommanderConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(strategy) = args.strategy {
        config.attack.strategy = strategy;
    }
    Ok(config)
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    let mut world = SandboxWorld::new(config.seed);
    let mut commander = Commander::new(config, default_services(world.expansion_sites()))?;

    tracing::info!(
        profile = %commander.config().name,
        seed = commander.config().seed,
        ticks = args.ticks,
        "Starting sandbox match"
    );

    let mut issued: BTreeMap<CommandCategory, usize> = BTreeMap::new();
    for _ in 0..args.ticks {
        let commands = world.advance(&mut commander);
        for command in commands.iter() {
            *issued.entry(command.category()).or_insert(0) += 1;
            if args.json {
                let line = serde_json::json!({
                    "tick": commander.current_tick(),
                    "command": command,
                });
                println!("{}", line);
            }
        }
    }

    let summary = world.summary();
    if args.json {
        println!("{}", serde_json::to_string(&summary)?);
        return Ok(());
    }

    println!("=== Commander run: {} ticks ===", summary.tick);
    println!(
        "Minerals {} | Vespene {} | Supply {}/{}",
        summary.minerals, summary.vespene, summary.supply_used, summary.supply_cap
    );
    println!("Losses: own {} | enemy {}", summary.own_losses, summary.enemy_losses);
    println!("\nCommands issued:");
    for (category, count) in &issued {
        println!("  {:<12} {}", format!("{:?}", category), count);
    }
    println!("\nOwn forces:");
    for (kind, count) in &summary.own_units {
        println!("  {:<20} {}", format!("{:?}", kind), count);
    }
    println!(
        "\nSightings remembered: {} | open wave: {} units",
        commander.context().sightings.len(),
        commander.context().wave.len()
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("forge_commander=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::warn!(error = %e, "Commander run failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
