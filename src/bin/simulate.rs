//! Balance simulator CLI.
//!
//! Runs Monte Carlo batches of full sessions to analyze game balance.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                     # 1000 runs, default game
//!   cargo run --bin simulate -- -n 100 --seed 42 # reproducible batch
//!   cargo run --bin simulate -- --config my.json # custom authored game

use boomtown::build_info::{BUILD_COMMIT, BUILD_DATE};
use boomtown::simulator::{run_simulation, SimConfig};
use boomtown::GameConfig;
use std::env;
use std::path::Path;
use std::process;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = match parse_args(&args) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}");
            process::exit(1);
        }
    };

    println!("boomtown balance simulator ({BUILD_COMMIT}, {BUILD_DATE})");
    println!();
    println!("Configuration:");
    println!("  Runs:       {}", config.num_runs);
    println!("  Max Ticks:  {}", config.max_ticks_per_run);
    println!("  Lots:       {}", config.game.lots.len());
    if let Some(seed) = config.seed {
        println!("  Seed:       {seed}");
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = run_simulation(&config);
    println!("{}", report.to_text());

    if args.iter().any(|a| a == "--json") {
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        match std::fs::write(&filename, report.to_json()) {
            Ok(()) => println!("JSON report saved to: {filename}"),
            Err(err) => {
                eprintln!("Failed to write JSON report: {err}");
                process::exit(1);
            }
        }
    }
}

fn parse_args(args: &[String]) -> Result<SimConfig, String> {
    let mut config = SimConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                config.num_runs = parse_value(args, &mut i, "--runs")?;
            }
            "--seed" => {
                config.seed = Some(parse_value(args, &mut i, "--seed")?);
            }
            "--max-ticks" => {
                config.max_ticks_per_run = parse_value(args, &mut i, "--max-ticks")?;
            }
            "--config" => {
                let path: String = parse_value(args, &mut i, "--config")?;
                config.game = GameConfig::load(Path::new(&path))
                    .map_err(|err| format!("Failed to load config '{path}': {err}"))?;
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "--json" => {
                // Handled after the run.
            }
            "-h" | "--help" => {
                return Err(usage());
            }
            other => {
                return Err(format!("Unknown option '{other}'\n\n{}", usage()));
            }
        }
        i += 1;
    }

    Ok(config)
}

fn parse_value<T: std::str::FromStr>(
    args: &[String],
    i: &mut usize,
    flag: &str,
) -> Result<T, String> {
    let value = args
        .get(*i + 1)
        .ok_or_else(|| format!("{flag} requires a value"))?;
    *i += 1;
    value
        .parse()
        .map_err(|_| format!("Invalid value '{value}' for {flag}"))
}

fn usage() -> String {
    "Usage: simulate [OPTIONS]\n\
     \n\
     Options:\n\
     \x20 -n, --runs <N>       Number of sessions to run (default 1000)\n\
     \x20     --seed <SEED>    Seed for reproducible batches\n\
     \x20     --max-ticks <N>  Tick budget per run (default 20000)\n\
     \x20     --config <PATH>  Authored game config JSON\n\
     \x20     --json           Also write a JSON report file\n\
     \x20 -v, --verbose        Per-run output\n\
     \x20 -h, --help           This help"
        .to_string()
}
