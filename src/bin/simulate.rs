//! Shiny rate simulator CLI.
//!
//! Rolls encounters against the bundled catalogs without sleeping and
//! reports how the observed rates compare with the configured ones.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                          # 1,000,000 encounters at 1/2000
//!   cargo run --bin simulate -- -n 100000 -d 512      # Boosted odds
//!   cargo run --bin simulate -- --seed 42 --json      # Reproducible, save JSON

use clap::Parser;
use shinyhunt::catalog::load_sources;
use shinyhunt::config::Config;
use shinyhunt::constants::DEFAULT_SHINY_RATE;
use shinyhunt::simulator::{run_simulation, SimConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "simulate", about = "Monte Carlo check of encounter and shiny rates")]
struct Args {
    /// Number of encounters to roll
    #[arg(short = 'n', long, default_value_t = 1_000_000)]
    encounters: u64,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// 1-in-N shiny rate
    #[arg(short, long, default_value_t = DEFAULT_SHINY_RATE)]
    denominator: u32,

    /// Directory holding assets/data/*.txt
    #[arg(long)]
    assets_dir: Option<PathBuf>,

    /// Save the report as JSON next to the working directory
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shinyhunt=warn")),
        )
        .init();

    let assets_root = args
        .assets_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")));
    let mut config = Config::default();
    for path in config.catalog_files.values_mut() {
        *path = assets_root.join(&*path);
    }

    let load = load_sources(&config);
    let sim_config = SimConfig {
        encounters: args.encounters,
        seed: args.seed,
        shiny_rate: args.denominator,
    };

    println!("Shiny Hunt Simulator");
    println!();
    println!("Configuration:");
    println!("  Encounters:     {}", sim_config.encounters);
    println!("  Shiny rate:     1/{}", sim_config.shiny_rate);
    println!("  Catalogs:       {}", load.loaded_sources.join(", "));
    println!("  Creatures:      {}", load.catalog.len());
    if let Some(seed) = sim_config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();

    let report = match run_simulation(load.catalog, &config.rarity_weights, &sim_config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Simulation not started: {}", e);
            std::process::exit(1);
        }
    };

    println!("{}", report.to_text());

    if args.json {
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        match std::fs::write(&filename, report.to_json()) {
            Ok(()) => println!("JSON report saved to: {}", filename),
            Err(e) => eprintln!("Failed to write JSON report: {}", e),
        }
    }
}
