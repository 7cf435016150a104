use std::{path::PathBuf, str::FromStr, time::Duration};

use clap::Parser;
use log::LevelFilter;

use crate::TermInt;
use crate::grid::Grid;

const DEFAULT_CELL_SIZE: u16 = 2;
const DEFAULT_FRAME_MS: u64 = 100;
const MAX_GRID_SIDE: u32 = 255;

/// Grid snake in the terminal. Arrow keys or WASD to steer, Esc, q or CTRL+C to quit.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Grid dimensions in cells, as WIDTHxHEIGHT.
    #[arg(short = 's', long = "size", value_name = "WIDTHxHEIGHT", default_value = "20x20")]
    size: GridSizeArg,
    /// Edge length of one cell in pixels. A terminal character holds 1x2 pixels.
    #[arg(
        long = "cell-size",
        value_name = "PIXELS",
        default_value_t = DEFAULT_CELL_SIZE,
        value_parser = clap::value_parser!(u16).range(1..=8)
    )]
    cell_size: u16,
    /// Target duration of one frame.
    #[arg(
        long = "frame-ms",
        value_name = "MILLISECONDS",
        default_value_t = DEFAULT_FRAME_MS,
        value_parser = clap::value_parser!(u64).range(1..=10_000)
    )]
    frame_ms: u64,
    /// Fixed seed for apple placement. Derived from the clock when omitted.
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
    /// File the log is written to; the terminal itself is taken by the game.
    #[arg(long = "log-file", value_name = "PATH", default_value = "snake.log")]
    log_file: PathBuf,
    /// Maximum level written to the log file.
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct GridSizeArg {
    columns: TermInt,
    rows: TermInt,
}

impl FromStr for GridSizeArg {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (columns, rows) = value
            .split_once(['x', 'X'])
            .ok_or_else(|| "expected format WIDTHxHEIGHT".to_string())?;

        let columns = parse_side(columns, "width")?;
        let rows = parse_side(rows, "height")?;

        // The snake starts out heading right and would wrap onto itself
        if columns < 2 {
            return Err("width must be at least 2".to_string());
        }

        Ok(Self { columns: columns as TermInt, rows: rows as TermInt })
    }
}

fn parse_side(value: &str, name: &str) -> Result<u32, String> {
    let side = value
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid {}: {}", name, error))?;

    if side == 0 || side > MAX_GRID_SIDE {
        return Err(format!("{} must be between 1 and {}", name, MAX_GRID_SIDE));
    }

    Ok(side)
}

#[derive(Clone, Debug)]
pub struct Config {
    pub grid: Grid,
    pub cell_size: usize,
    pub frame: Duration,
    pub seed: Option<u64>,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
}

impl Args {
    pub fn into_config(self) -> Config {
        Config {
            grid: Grid::new(self.size.columns, self.size.rows),
            cell_size: self.cell_size as usize,
            frame: Duration::from_millis(self.frame_ms),
            seed: self.seed,
            log_file: self.log_file,
            log_level: self.log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, clap::Error> {
        let argv = std::iter::once("snake").chain(args.iter().copied());
        Args::try_parse_from(argv).map(Args::into_config)
    }

    #[test]
    fn defaults_are_the_reference_game() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.grid, Grid::new(20, 20));
        assert_eq!(config.cell_size, 2);
        assert_eq!(config.frame, Duration::from_millis(100));
        assert_eq!(config.seed, None);
        assert_eq!(config.log_file, PathBuf::from("snake.log"));
        assert_eq!(config.log_level, LevelFilter::Info);
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "--size", "32X12", "--cell-size", "1", "--frame-ms", "250",
            "--seed", "42", "--log-file", "/tmp/s.log", "--log-level", "debug",
        ]).unwrap();
        assert_eq!(config.grid, Grid::new(32, 12));
        assert_eq!(config.cell_size, 1);
        assert_eq!(config.frame, Duration::from_millis(250));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.log_file, PathBuf::from("/tmp/s.log"));
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn bad_sizes_are_rejected() {
        assert!(parse(&["--size", "20"]).is_err());
        assert!(parse(&["--size", "0x20"]).is_err());
        assert!(parse(&["--size", "1x1"]).is_err());
        assert!(parse(&["--size", "1x20"]).is_err());
        assert!(parse(&["--size", "256x2"]).is_err());
        assert!(parse(&["--size", "ax2"]).is_err());
        assert!(parse(&["--size", "2x1"]).is_ok());
        assert_eq!(parse(&["--size", "20x1"]).unwrap().grid, Grid::new(20, 1));
    }

    #[test]
    fn out_of_range_numbers_are_rejected() {
        assert!(parse(&["--cell-size", "0"]).is_err());
        assert!(parse(&["--cell-size", "9"]).is_err());
        assert!(parse(&["--frame-ms", "0"]).is_err());
        assert!(parse(&["--log-level", "loud"]).is_err());
    }
}
