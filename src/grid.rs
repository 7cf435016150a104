use crate::{Coords, TermInt};
use crate::snake::Direction;

/// Toroidal playing field measured in cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    pub width: TermInt,
    pub height: TermInt,
}

/// Pixel rectangle on the drawing surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl Grid {
    pub fn new(width: TermInt, height: TermInt) -> Self {
        Grid { width, height }
    }

    pub fn capacity(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, cell: Coords) -> bool {
        cell.0 < self.width && cell.1 < self.height
    }

    /// The cell one step away from `cell`, re-entering from the opposite edge.
    pub fn advance(&self, cell: Coords, direction: Direction) -> Coords {
        let (dx, dy) = direction.delta();
        let x = wrap(cell.0 as i32 + dx, self.width as i32);
        let y = wrap(cell.1 as i32 + dy, self.height as i32);
        (x as TermInt, y as TermInt)
    }
}

/// `value mod bound`, always in `[0, bound)`. `bound` must be positive.
pub fn wrap(value: i32, bound: i32) -> i32 {
    debug_assert!(bound > 0);
    value.rem_euclid(bound)
}

pub fn cell_to_rect(cell: Coords, cell_size: usize) -> Rect {
    Rect {
        x: cell.0 as usize * cell_size,
        y: cell.1 as usize * cell_size,
        w: cell_size,
        h: cell_size,
    }
}
