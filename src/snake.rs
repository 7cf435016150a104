use std::collections::VecDeque;

use crate::Coords;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Unit step in grid coordinates; y grows downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Left | Right)
    }

    /// A turn is only possible onto the other axis. Reversing would run
    /// the head straight into the second segment.
    pub fn accepts_turn(self, new_direction: Direction) -> bool {
        self.is_horizontal() != new_direction.is_horizontal()
    }
}

/// Snake body, tail first. The back of the deque is the head.
pub struct Snake {
    body: VecDeque<Coords>,
}

impl Snake {
    pub fn new(pos: Coords) -> Self {
        Snake { body: VecDeque::from(vec![pos]) }
    }

    pub fn body(&self) -> impl Iterator<Item = &Coords> {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn head(&self) -> Coords {
        // Never empty: pop_tail keeps the last segment
        self.body[self.body.len() - 1]
    }

    pub fn push_head(&mut self, cell: Coords) {
        self.body.push_back(cell);
    }

    /// Removes the oldest segment. Refuses to empty the snake.
    pub fn pop_tail(&mut self) -> Option<Coords> {
        if self.body.len() <= 1 {
            return None;
        }
        self.body.pop_front()
    }

    pub fn contains(&self, cell: Coords) -> bool {
        self.body.contains(&cell)
    }
}

#[cfg(test)]
impl Snake {
    pub fn from_cells(cells: &[Coords]) -> Self {
        assert!(!cells.is_empty());
        Snake { body: cells.iter().copied().collect() }
    }

    pub fn cells(&self) -> Vec<Coords> {
        self.body.iter().copied().collect()
    }
}
