use std::{fmt, error::Error, time::{SystemTime, UNIX_EPOCH}};

use crate::Coords;
use crate::grid::Grid;
use crate::snake::Snake;

use rand::Rng;

/// Every cell of the grid is taken by the snake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardFull;

impl fmt::Display for BoardFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no free cell left for an apple")
    }
}

impl Error for BoardFull {}

/// Picks a uniformly random cell not occupied by the snake, by rejection sampling.
pub fn place_apple<R: Rng>(grid: &Grid, snake: &Snake, rng: &mut R) -> Result<Coords, BoardFull> {
    if snake.len() >= grid.capacity() {
        return Err(BoardFull);
    }

    loop {
        let cell: Coords = (rng.gen_range(0..grid.width), rng.gen_range(0..grid.height));
        if !snake.contains(cell) {
            return Ok(cell);
        }
    }
}

/// Cosmetic, non-reproducible seed: wall clock seconds modulo its nanoseconds.
pub fn clock_seed() -> u64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    let secs = now.as_secs();

    match now.subsec_nanos() as u64 {
        0 => secs,
        nanos => secs % nanos,
    }
}
