//! NEUROGRID - CLI Entry Point
//!
//! Grid-world neuro-evolution sandbox.

use clap::{Parser, Subcommand};
use neurogrid::checkpoint::{Checkpoint, CheckpointManager};
use neurogrid::{benchmark, Config, World};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "neurogrid")]
#[command(version)]
#[command(about = "Grid-world neuro-evolution sandbox")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a new simulation
    Run {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Number of generations to simulate
        #[arg(short, long, default_value = "100")]
        generations: u32,

        /// Output directory for checkpoints and history
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Quiet mode (minimal output)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Resume simulation from checkpoint
    Resume {
        /// Checkpoint file to resume from (.bin or .json)
        #[arg(short, long)]
        checkpoint: PathBuf,

        /// Number of additional generations
        #[arg(short, long, default_value = "100")]
        generations: u32,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of ticks
        #[arg(short, long, default_value = "1000")]
        steps: u64,

        /// Population size
        #[arg(short, long, default_value = "1000")]
        population: usize,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },

    /// Analyze a checkpoint file
    Analyze {
        /// Checkpoint file
        checkpoint: PathBuf,

        /// Number of species to list
        #[arg(short, long, default_value = "5")]
        top: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            generations,
            output,
            seed,
            quiet,
        } => run_simulation(config, generations, output, seed, quiet),

        Commands::Resume {
            checkpoint,
            generations,
            output,
        } => resume_simulation(checkpoint, generations, output),

        Commands::Benchmark { steps, population } => {
            init_logging("info");
            run_benchmark(steps, population)
        }

        Commands::Init { output } => {
            init_logging("info");
            generate_config(output)
        }

        Commands::Analyze { checkpoint, top } => {
            init_logging("info");
            analyze_checkpoint(checkpoint, top)
        }
    }
}

/// `RUST_LOG` wins over the configured level
fn init_logging(default_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn run_simulation(
    config_path: PathBuf,
    generations: u32,
    output: PathBuf,
    seed: Option<u64>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (config, from_file) = if config_path.exists() {
        (Config::from_file(&config_path)?, true)
    } else {
        (Config::default(), false)
    };
    init_logging(&config.logging.log_level);

    if from_file {
        println!("Loaded config from: {:?}", config_path);
    } else {
        println!("Using default configuration");
    }

    std::fs::create_dir_all(&output)?;

    let mut world = match seed.or(config.world.seed) {
        Some(s) => {
            println!("Using seed: {}", s);
            World::new_with_seed(config.clone(), s)?
        }
        None => World::new(config.clone())?,
    };

    println!("Starting simulation");
    println!("  Population: {}", world.creatures().len());
    println!("  Grid size: {}x{}", config.world.size, config.world.size);
    println!("  Selection: {}", world.selection_name());
    println!("  Generations: {}", generations);
    println!();

    let mut checkpoint_mgr = CheckpointManager::new(&output, config.logging.checkpoint_interval, 10)?;

    run_generations(&mut world, generations, &mut checkpoint_mgr, quiet);
    finish(&world, &output)
}

fn resume_simulation(
    checkpoint_path: PathBuf,
    generations: u32,
    output: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let checkpoint = Checkpoint::load_any(&checkpoint_path)?;
    init_logging(&checkpoint.config.logging.log_level);
    println!("Loaded checkpoint: {:?}", checkpoint_path);

    let mut world = World::from_checkpoint(checkpoint)?;
    world.resume();

    println!("Resumed at generation {}, step {}", world.generation(), world.current_step());
    println!("Population: {}", world.creatures().len());
    println!("Running {} additional generations", generations);
    println!();

    std::fs::create_dir_all(&output)?;
    let mut checkpoint_mgr =
        CheckpointManager::new(&output, world.config().logging.checkpoint_interval, 10)?;

    run_generations(&mut world, generations, &mut checkpoint_mgr, false);
    finish(&world, &output)
}

fn run_generations(world: &mut World, generations: u32, checkpoint_mgr: &mut CheckpointManager, quiet: bool) {
    let start = Instant::now();
    let stats_interval = world.config().logging.stats_interval.max(1);

    for _ in 0..generations {
        world.run_generations(1);
        let finished = world.generation() - 1;

        if !quiet && u64::from(finished) % stats_interval == 0 {
            println!("{}", world.stats().summary(finished));
        }

        if checkpoint_mgr.should_save(world.generation()) {
            match checkpoint_mgr.save(&world.create_checkpoint()) {
                Ok(path) => {
                    if !quiet {
                        println!("  Checkpoint saved: {}", path.display());
                    }
                }
                Err(e) => eprintln!("  Checkpoint error: {}", e),
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("=== Simulation Complete ===");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Generations: {}", world.generation());
    println!(
        "Speed: {:.2} generations/s",
        generations as f64 / elapsed.as_secs_f64()
    );
    println!(
        "Survivors: min {}, max {}, recent rate {:.1}%",
        world.history().min_survivor_count(),
        world.history().max_survivor_count(),
        world.history().recent_survival_rate(10) * 100.0
    );
}

fn finish(world: &World, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let final_path = output.join("checkpoint_final.bin");
    world.create_checkpoint().save(&final_path)?;
    println!("Final checkpoint: {:?}", final_path);

    let history_path = output.join("history.json");
    world.history().save_json(&history_path)?;
    std::fs::write(output.join("history.csv"), world.history().to_csv())?;
    println!("Generation history: {:?}", history_path);

    Ok(())
}

fn run_benchmark(steps: u64, population: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== NEUROGRID Benchmark ===");
    println!("Steps: {}", steps);
    println!("Population: {}", population);
    println!();

    let result = benchmark(steps, population)?;
    println!("{}", result);

    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    Config::default().save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}

fn analyze_checkpoint(checkpoint_path: PathBuf, top: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Checkpoint Analysis ===");
    println!("File: {:?}", checkpoint_path);
    println!();

    let checkpoint = Checkpoint::load_any(&checkpoint_path)?;

    println!("Generation: {} (step {})", checkpoint.current_generation, checkpoint.current_step);
    println!("Creatures: {}", checkpoint.creature_count());
    println!("Species: {}", checkpoint.species.len());
    println!(
        "Sensors: {}",
        checkpoint.config.sensors.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
    );
    println!(
        "Actions: {}",
        checkpoint.config.actions.iter().map(|a| a.as_str()).collect::<Vec<_>>().join(", ")
    );
    println!();

    let total = checkpoint.creature_count().max(1);
    for (rank, species) in checkpoint.species.iter().take(top).enumerate() {
        println!(
            "#{} {} creatures ({:.1}%), {} alive, {} genes: {}",
            rank + 1,
            species.len(),
            100.0 * species.len() as f32 / total as f32,
            species.living(),
            species.genome.len(),
            species.genome.to_hex_string()
        );
    }

    if let Some(last) = checkpoint.history.last() {
        println!();
        println!(
            "Last generation: {} survivors of {} ({:.1}%)",
            last.survivor_count,
            last.population,
            last.survival_rate() * 100.0
        );
    }

    println!();
    println!(
        "Checkpoint size: {:.2} MB",
        checkpoint.size_bytes() as f64 / 1_000_000.0
    );

    Ok(())
}
