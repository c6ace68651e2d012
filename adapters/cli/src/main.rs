#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that walks an explorer through the endless maze.

mod viewport;

use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use endless_maze_core::MazeConfig;
use endless_maze_system_explorer::{Explorer, StepOutcome};
use endless_maze_world::{self as world, query, World};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::viewport::Viewport;

/// Walks a right-hand explorer through an endless maze and prints the result.
#[derive(Debug, Parser)]
#[command(name = "endless-maze", version)]
struct Args {
    /// TOML file providing the maze configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the carving seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Overrides the westernmost column.
    #[arg(long, allow_negative_numbers = true)]
    left_column: Option<i32>,
    /// Overrides the northernmost row.
    #[arg(long, allow_negative_numbers = true)]
    top_row: Option<i32>,
    /// Overrides the southernmost row.
    #[arg(long, allow_negative_numbers = true)]
    bottom_row: Option<i32>,
    /// Overrides the number of columns generated ahead of the explorer.
    #[arg(long)]
    lookahead: Option<u32>,
    /// Number of explorer steps to simulate.
    #[arg(long, default_value_t = 200)]
    steps: u32,
    /// Width of the printed viewport in squares.
    #[arg(long, default_value_t = 40)]
    width: u32,
    /// Print an intermediate frame every N steps; 0 prints only the last frame.
    #[arg(long, default_value_t = 0)]
    frame_every: u32,
    /// Log filter directive, for example `debug` or `endless_maze_world=trace`.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Entry point for the Endless Maze command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    let config = load_config(&args)?;
    let mut world = World::new(&config).context("failed to build the maze world")?;
    let mut explorer = Explorer::new(query::start(&world));
    let mut viewport = Viewport::new(args.width);

    for step in 1..=args.steps {
        let mut commands = Vec::new();
        let outcome = explorer.step(query::maze_view(&world), &mut commands);
        if !matches!(outcome, StepOutcome::Moved(_)) {
            bail!(
                "explorer stopped at {} after {} steps: {outcome:?}",
                explorer.position(),
                explorer.steps()
            );
        }

        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut world, command, &mut events)
                .with_context(|| format!("maze generation failed on step {step}"))?;
        }
        viewport.observe(&events);

        if args.frame_every > 0 && step % args.frame_every == 0 {
            print_frame(&mut viewport, &world, &explorer);
        }
    }

    print_frame(&mut viewport, &world, &explorer);
    info!(
        steps = explorer.steps(),
        furthest_column = explorer.furthest_column(),
        last_column = ?query::last_column(&world),
        "walk finished"
    );
    Ok(())
}

fn init_logging(filter: &str) -> Result<()> {
    let filter =
        EnvFilter::try_new(filter).with_context(|| format!("invalid log filter '{filter}'"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn load_config(args: &Args) -> Result<MazeConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            parse_config(&contents)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        }
        None => MazeConfig::default(),
    };
    apply_overrides(&mut config, args);
    config
        .validate()
        .context("maze configuration is inconsistent")?;
    Ok(config)
}

fn parse_config(contents: &str) -> Result<MazeConfig> {
    toml::from_str(contents).context("failed to parse maze configuration toml contents")
}

fn apply_overrides(config: &mut MazeConfig, args: &Args) {
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(left_column) = args.left_column {
        config.left_column = left_column;
    }
    if let Some(top_row) = args.top_row {
        config.top_row = top_row;
    }
    if let Some(bottom_row) = args.bottom_row {
        config.bottom_row = bottom_row;
    }
    if let Some(lookahead) = args.lookahead {
        config.lookahead = lookahead;
    }
}

fn print_frame(viewport: &mut Viewport, world: &World, explorer: &Explorer) {
    viewport.sync(query::maze_view(world), explorer.position());
    println!("{}", viewport.draw(query::maze_view(world), explorer.position()));
    println!(
        "step {} at {} (furthest column {})",
        explorer.steps(),
        explorer.position(),
        explorer.furthest_column()
    );
}
