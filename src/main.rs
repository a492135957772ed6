use std::path::PathBuf;
use clap::Parser;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use coup_engine::{Config, Driver, RandomOracle};

/// Plays seeded games between automated players and reports who won.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of automated players
    #[arg(long, default_value_t = 4)]
    ai: usize,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long, default_value_t = 1)]
    games: usize,

    /// JSON file overriding the default engine settings
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("could not read {}: {err}", path.display());
                std::process::exit(2);
            }
        },
        None => Config::default(),
    };

    let mut wins = vec![0usize; args.ai];
    let mut unfinished = 0;

    for game_idx in 0..args.games {
        let seed = args.seed.wrapping_add(game_idx as u64);
        let oracle = RandomOracle::new(Pcg64::seed_from_u64(seed ^ 0x5eed));
        let mut driver = Driver::new(oracle, Pcg64::seed_from_u64(seed), config.clone());

        let coup = match driver.initialize(&[], args.ai) {
            Ok(coup) => coup,
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(2);
            }
        };

        if game_idx + 1 == args.games {
            for line in coup.log().iter() {
                println!("{line}");
            }
        }

        match coup.winner() {
            Some(winner) => wins[winner] += 1,
            None => unfinished += 1,
        }
    }

    println!();
    for (seat, count) in wins.iter().enumerate() {
        println!("Bot {}: {count} wins", seat + 1);
    }
    if unfinished > 0 {
        println!("{unfinished} games hit the automated step limit");
    }
}
