//! CLI frontend for the Skirmish combat engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "skirmish",
    about = "Skirmish: turn-based d20 combat from the terminal",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll a single die with optional bonuses
    Roll {
        /// Number of sides (e.g. 20)
        sides: u32,

        /// Ability modifier to add
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        modifier: i32,

        /// Proficiency bonus to add
        #[arg(short, long, default_value = "0")]
        proficiency: i32,

        /// RNG seed for a reproducible roll
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// List the weapons and spells participants can attack with
    Armaments {
        /// Only show spells
        #[arg(long, conflicts_with = "weapons")]
        spells: bool,

        /// Only show weapons
        #[arg(long)]
        weapons: bool,
    },

    /// Fight out an encounter automatically and report the result
    Simulate {
        /// Encounter file (JSON)
        encounter: PathBuf,

        /// RNG seed (overrides the encounter's config)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Stop after this many rounds
        #[arg(short, long, default_value = "20")]
        rounds: u32,

        /// Print the full combat log
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Roll {
            sides,
            modifier,
            proficiency,
            seed,
        } => commands::roll::run(sides, modifier, proficiency, seed),
        Commands::Armaments { spells, weapons } => commands::armaments::run(spells, weapons),
        Commands::Simulate {
            encounter,
            seed,
            rounds,
            verbose,
        } => commands::simulate::run(&encounter, seed, rounds, verbose),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
