use std::{thread::sleep, time::Instant};

use crate::{Coords, TermInt};
use crate::apple::{clock_seed, place_apple};
use crate::config::Config;
use crate::grid::{cell_to_rect, Grid};
use crate::snake::{Direction, Snake};
use crate::surface::{Color, Surface};
use crate::term::TermManager;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};

const START_CELL: Coords = (0, 0);
const START_DIRECTION: Direction = Direction::Right;

const BACKGROUND_COLOR: Color = Color::BLACK;
const SNAKE_COLOR: Color = Color::GREEN;
const APPLE_COLOR: Color = Color::RED;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Turn(Direction),
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Collided,
    Quit,
    /// The snake covers the whole grid.
    BoardFull,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    Ended(Outcome),
}

/// What a single frame did to the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tick {
    Moved,
    Ate,
    Ended(Outcome),
}

pub struct GameState {
    grid: Grid,
    snake: Snake,
    direction: Direction,
    apple: Coords,
    score: u64,
    status: Status,
    rng: StdRng,
}

impl GameState {
    pub fn new(grid: Grid, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let snake = Snake::new(START_CELL);

        let (apple, status) = match place_apple(&grid, &snake, &mut rng) {
            Ok(apple) => (apple, Status::Running),
            Err(_) => (START_CELL, Status::Ended(Outcome::BoardFull)),
        };
        debug!("apple placed at {:?}", apple);

        GameState { grid, snake, direction: START_DIRECTION, apple, score: 0, status, rng }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Advances the game by one frame. `events` are this frame's inputs in
    /// arrival order: the first valid turn wins and a quit anywhere ends the
    /// game before anything else changes.
    pub fn step(&mut self, events: &[InputEvent]) -> Tick {
        if let Status::Ended(outcome) = self.status {
            return Tick::Ended(outcome);
        }

        if events.contains(&InputEvent::Quit) {
            return self.end(Outcome::Quit);
        }

        let turn = events.iter().find_map(|event| match *event {
            InputEvent::Turn(dir) if self.direction.accepts_turn(dir) => Some(dir),
            _ => None,
        });
        if let Some(dir) = turn {
            debug!("turning {:?}", dir);
            self.direction = dir;
        }

        let new_head = self.grid.advance(self.snake.head(), self.direction);
        debug_assert!(self.grid.contains(new_head));

        // The tail still counts, it has not moved away yet
        if self.snake.contains(new_head) {
            return self.end(Outcome::Collided);
        }

        self.snake.push_head(new_head);

        if new_head != self.apple {
            self.snake.pop_tail();
            return Tick::Moved;
        }

        self.score += 1;
        info!("Points: {}", self.score);

        match place_apple(&self.grid, &self.snake, &mut self.rng) {
            Ok(apple) => {
                debug!("apple placed at {:?}", apple);
                self.apple = apple;
                Tick::Ate
            },
            Err(err) => {
                info!("{}", err);
                self.end(Outcome::BoardFull)
            }
        }
    }

    /// Draws the frame. The apple is left out on the frame it was eaten.
    pub fn render(&self, surface: &mut Surface, cell_size: usize, show_apple: bool) {
        surface.fill(BACKGROUND_COLOR);

        if show_apple {
            surface.draw_rect(cell_to_rect(self.apple, cell_size), APPLE_COLOR);
        }

        for pos in self.snake.body() {
            surface.draw_rect(cell_to_rect(*pos, cell_size), SNAKE_COLOR);
        }
    }

    fn end(&mut self, outcome: Outcome) -> Tick {
        self.status = Status::Ended(outcome);
        Tick::Ended(outcome)
    }
}

pub struct SnakeGame {
    config: Config,
    term: TermManager,
    surface: Surface,
}

impl SnakeGame {
    pub fn new(config: Config) -> Result<Self> {
        let surface = Surface::new(
            config.grid.width as usize * config.cell_size,
            config.grid.height as usize * config.cell_size,
        );
        let term = TermManager::new()?;
        Ok(SnakeGame { config, term, surface })
    }

    pub fn initialize(&mut self) -> Result<()> {
        let board_cols = self.surface.width() as TermInt;
        let board_rows = ((self.surface.height() + 1) / 2) as TermInt;

        self.term.layout((board_cols, board_rows))?;
        self.term.setup()?;
        self.term.draw_borders()
    }

    /// Runs frames until the game ends and returns how it ended with the final score.
    pub fn play(&mut self) -> Result<(Outcome, u64)> {
        let seed = self.config.seed.unwrap_or_else(clock_seed);
        info!("apple seed {}", seed);

        let mut state = GameState::new(self.config.grid, seed);
        self.term.print_status(&points_line(0))?;

        let outcome = loop {
            let frame_start = Instant::now();

            let events: Vec<InputEvent> = self.term.read_key_events_queue()?
                .iter()
                .filter_map(key_to_input)
                .collect();

            let tick = state.step(&events);

            if matches!(tick, Tick::Ate | Tick::Ended(Outcome::BoardFull)) {
                self.term.print_status(&points_line(state.score()))?;
            }

            if let Some(show_apple) = frame_to_draw(tick) {
                state.render(&mut self.surface, self.config.cell_size, show_apple);
                self.term.present(&self.surface)?;
            }

            if let Tick::Ended(outcome) = tick {
                break outcome;
            }

            // Slow frames are not caught up on
            sleep(self.config.frame.saturating_sub(frame_start.elapsed()));
        };

        info!("game ended: {:?}, {}", outcome, points_line(state.score()));
        self.game_over(outcome, state.score())?;
        Ok((outcome, state.score()))
    }

    pub fn restore(&mut self) {
        self.term.restore();
    }

    fn game_over(&mut self, outcome: Outcome, score: u64) -> Result<()> {
        let title = match outcome {
            Outcome::Quit => return Ok(()),
            Outcome::Collided => "Game over!",
            Outcome::BoardFull => "You won!",
        };

        self.term.show_message(&[
            title,
            &*points_line(score),
            "",
            "Press any key to quit."
        ])?;
        self.term.read_key_blocking()?;
        Ok(())
    }
}

/// Whether `tick` leaves a frame to draw and, if so, whether the apple is in it.
/// The full board of a win is drawn; a collision or quit draws nothing.
fn frame_to_draw(tick: Tick) -> Option<bool> {
    match tick {
        Tick::Moved => Some(true),
        Tick::Ate | Tick::Ended(Outcome::BoardFull) => Some(false),
        Tick::Ended(_) => None,
    }
}

pub fn points_line(score: u64) -> String {
    format!("Points: {}", score)
}

fn key_to_input(ev: &KeyEvent) -> Option<InputEvent> {
    if is_ctrl_c(ev) {
        return Some(InputEvent::Quit);
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Some(InputEvent::Turn(Direction::Up)),
        KeyCode::Char('a') | KeyCode::Left => Some(InputEvent::Turn(Direction::Left)),
        KeyCode::Char('s') | KeyCode::Down => Some(InputEvent::Turn(Direction::Down)),
        KeyCode::Char('d') | KeyCode::Right => Some(InputEvent::Turn(Direction::Right)),
        KeyCode::Char('q') | KeyCode::Esc => Some(InputEvent::Quit),
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}
