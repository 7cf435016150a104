mod apple;
mod config;
mod game;
mod grid;
mod snake;
mod surface;
mod term;

use std::fs::File;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use simplelog::WriteLogger;

pub type TermInt = u16;
pub type Coords = (u16, u16);

fn main() -> Result<()> {
    let config = config::Args::parse().into_config();

    // The terminal belongs to the game, so the log goes to a file
    let log_file = File::create(&config.log_file)
        .with_context(|| format!("failed to create log file {}", config.log_file.display()))?;
    WriteLogger::init(config.log_level, simplelog::Config::default(), log_file)
        .context("failed to initialize logger")?;

    info!(
        "starting snake: {}x{} grid, cell size {}, {} ms frames",
        config.grid.width, config.grid.height, config.cell_size, config.frame.as_millis()
    );

    let mut game = game::SnakeGame::new(config)?;

    // Whatever happens in between, the terminal is handed back
    let result = game.initialize().and_then(|_| game.play());
    game.restore();

    let (_, score) = result?;
    println!("{}", game::points_line(score));
    Ok(())
}
