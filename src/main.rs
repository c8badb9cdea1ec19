//! # Delve Entry Point
//!
//! Generates a single level and prints it as an ASCII map or a JSON summary.

use clap::Parser;
use delve::{DelveResult, GenerationConfig, Level, LevelGenerator};
use log::{error, info};
use std::path::PathBuf;

/// Command line arguments for the Delve level generator.
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "Generate a rooms-and-mazes dungeon level")]
#[command(version)]
struct Args {
    /// Grid width in tiles (odd)
    #[arg(long)]
    width: Option<u32>,

    /// Grid height in tiles (odd)
    #[arg(long)]
    height: Option<u32>,

    /// Random seed for dungeon generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON generation config; command line values override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the level summary as JSON instead of the map
    #[arg(long)]
    json: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    if let Err(err) = run(&args) {
        error!("{}", err);
        std::process::exit(1);
    }
}

/// Initializes `env_logger`; `RUST_LOG` takes precedence over `--log-level`.
fn initialize_logging(log_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_target(false)
        .init();
}

fn run(args: &Args) -> DelveResult<()> {
    let config = build_config(args)?;
    info!(
        "Delve v{}: generating {}x{} level with seed {}",
        delve::VERSION,
        config.width,
        config.height,
        config.seed
    );

    let level = LevelGenerator::new().try_generate(&config)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&level.summary())?);
    } else {
        print_level(&level);
    }
    Ok(())
}

fn build_config(args: &Args) -> DelveResult<GenerationConfig> {
    let mut config = match &args.config {
        Some(path) => GenerationConfig::from_file(path)?,
        None => GenerationConfig::new(rand::random()),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    config.validate()?;
    Ok(config)
}

fn print_level(level: &Level) {
    print!("{}", level.grid);

    let show = |pos: Option<delve::Position>| pos.map_or_else(|| "none".to_string(), |p| p.to_string());
    println!("seed:  {}", level.seed);
    println!("rooms: {}", level.rooms.len());
    println!("start: {}", show(level.start));
    println!("exit:  {}", show(level.exit));
    println!("key:   {}", show(level.key));
}
