use crate::{TermInt, Coords};
use crate::surface::{Color, Surface};
use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{bail, Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, KeyEventKind, read, poll};
use log::error;

// Upper half filled: foreground paints the top pixel, background the bottom one
const HALF_BLOCK: char = '▀';

pub struct TermManager<W: Write = Stdout> {
    width: TermInt,
    height: TermInt,
    stdout: W,
    board_origin: Coords,
    board_size: Coords,
    // Pixel pair last shown in each board character, None when unknown
    screen: Vec<Option<(Color, Color)>>,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let size = terminal::size().context("Error reading terminal size")?;
        Ok(TermManager::with_writer(size, stdout()))
    }
}

impl<W: Write> TermManager<W> {
    pub fn with_writer(size: Coords, stdout: W) -> Self {
        TermManager { width: size.0, height: size.1, stdout, board_origin: (0, 0), board_size: (0, 0), screen: vec![] }
    }

    pub fn layout(&mut self, board_size: Coords) -> Result<()> {
        self.board_origin = board_layout((self.width, self.height), board_size)?;
        self.board_size = board_size;
        self.screen = vec![None; board_size.0 as usize * board_size.1 as usize];
        Ok(())
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("Error entering alt screen")?;
        terminal::enable_raw_mode().context("Error setting raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
            .context("Error setting cursor visibility")?;
        self.clear()
    }

    /// Undoes `setup`. Every step is attempted even if an earlier one fails.
    pub fn restore(&mut self) {
        if let Err(err) = terminal::disable_raw_mode() {
            error!("failed to disable raw mode: {}", err);
        }
        if let Err(err) = execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking) {
            error!("failed to restore the cursor: {}", err);
        }
        if let Err(err) = execute!(self.stdout, LeaveAlternateScreen) {
            error!("failed to leave alternate screen: {}", err);
        }
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read().context("Error reading input")? {
                if ev.kind == KeyEventKind::Press {
                    return Ok(ev);
                }
            }
        }
    }

    /// Drains every pending key press without blocking.
    pub fn read_key_events_queue(&self) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::ZERO).context("Error polling input")? {
            if let Event::Key(ev) = read().context("Error reading input")? {
                if ev.kind == KeyEventKind::Press {
                    events.push(ev);
                }
            }
        }

        Ok(events)
    }

    pub fn draw_borders(&mut self) -> Result<()> {
        let (x0, y0) = (self.board_origin.0 - 1, self.board_origin.1 - 1);
        let end_x = x0 + self.board_size.0 + 1;
        let end_y = y0 + self.board_size.1 + 1;

        for x in x0..=end_x {
            let ch = if x == x0 || x == end_x {'+'} else {'-'};
            self.print_at((x, y0), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in y0 + 1..end_y {
            self.print_at((x0, y), '|')?;
            self.print_at((end_x, y), '|')?;
        }

        self.flush()
    }

    pub fn print_status(&mut self, text: &str) -> Result<()> {
        let pos = (self.board_origin.0 - 1, self.board_origin.1 + self.board_size.1 + 1);
        let line = format!("{text: <width$}", text = text, width = self.board_size.0 as usize + 2);
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::ResetColor, style::Print(line))?;
        self.flush()
    }

    /// Blits the surface onto the board, two pixel rows per terminal row.
    /// Only characters that changed since the last call are written.
    pub fn present(&mut self, surface: &Surface) -> Result<()> {
        let cols = (self.board_size.0 as usize).min(surface.width());
        let rows = (self.board_size.1 as usize).min((surface.height() + 1) / 2);

        for row in 0..rows {
            for col in 0..cols {
                let top = surface.pixel(col, row * 2);
                let bottom = if row * 2 + 1 < surface.height() {
                    surface.pixel(col, row * 2 + 1)
                } else {
                    Color::BLACK
                };

                let cached = &mut self.screen[row * self.board_size.0 as usize + col];
                if *cached == Some((top, bottom)) {
                    continue;
                }
                *cached = Some((top, bottom));

                let pos = (self.board_origin.0 + col as TermInt, self.board_origin.1 + row as TermInt);
                queue!(
                    self.stdout,
                    cursor::MoveTo(pos.0, pos.1),
                    style::SetForegroundColor(term_color(top)),
                    style::SetBackgroundColor(term_color(bottom)),
                    style::Print(HALF_BLOCK)
                )?;
            }
        }

        queue!(self.stdout, style::ResetColor)?;
        self.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.board_origin.0 + self.board_size.0 / 2, self.board_origin.1 + self.board_size.1 / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        queue!(self.stdout, style::ResetColor)?;

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at((top_left.0 + x_diff, *y), ' ')?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at((top_left.0 + x_diff as TermInt, y), ch)?;
            }
        }

        // The box covers part of the board
        self.screen.iter_mut().for_each(|c| *c = None);
        self.flush()
    }

    pub fn print_at(&mut self, pos: Coords, ch: char) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("Error clearing")?;
        self.screen.iter_mut().for_each(|c| *c = None);
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Error flushing")
    }
}

/// Top-left character of a bordered board of `board` characters, with a
/// status line below it, centered in a terminal of `term` characters.
fn board_layout(term: Coords, board: Coords) -> Result<Coords> {
    let (needed_w, needed_h) = (board.0 as u32 + 2, board.1 as u32 + 3);

    if needed_w > term.0 as u32 || needed_h > term.1 as u32 {
        bail!(
            "terminal is {}x{} but the board needs {}x{}, use a smaller --size or --cell-size",
            term.0, term.1, needed_w, needed_h
        );
    }

    let left = (term.0 - needed_w as TermInt) / 2;
    let top = (term.1 - needed_h as TermInt) / 2;
    Ok((left + 1, top + 1))
}

fn term_color(color: Color) -> style::Color {
    let (r, g, b) = color.components();
    style::Color::Rgb { r, g, b }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Rect;

    fn blocks_written(term: &mut TermManager<Vec<u8>>) -> usize {
        let count = String::from_utf8_lossy(&term.stdout).matches(HALF_BLOCK).count();
        term.stdout.clear();
        count
    }

    #[test]
    fn board_is_centered_below_its_border() {
        // 8x3 board needs 10x6 with border and status line
        assert_eq!(board_layout((20, 10), (8, 3)).unwrap(), (6, 3));
        assert_eq!(board_layout((21, 11), (8, 3)).unwrap(), (6, 3));
    }

    #[test]
    fn exact_fit_is_accepted() {
        assert_eq!(board_layout((10, 6), (8, 3)).unwrap(), (1, 1));
    }

    #[test]
    fn too_small_terminal_is_an_error() {
        assert!(board_layout((9, 6), (8, 3)).is_err());
        assert!(board_layout((10, 5), (8, 3)).is_err());
        assert!(board_layout((0, 0), (1, 1)).is_err());

        let mut term = TermManager::with_writer((10, 5), Vec::new());
        let err = term.layout((8, 3)).unwrap_err();
        assert!(err.to_string().contains("terminal is 10x5"), "{}", err);
    }

    #[test]
    fn only_changed_characters_are_redrawn() {
        let mut term = TermManager::with_writer((80, 24), Vec::new());
        term.layout((4, 2)).unwrap();
        let mut surface = Surface::new(4, 4);
        surface.fill(Color::GREEN);

        term.present(&surface).unwrap();
        assert_eq!(blocks_written(&mut term), 8);

        term.present(&surface).unwrap();
        assert_eq!(blocks_written(&mut term), 0);

        surface.draw_rect(Rect { x: 3, y: 3, w: 1, h: 1 }, Color::RED);
        term.present(&surface).unwrap();
        assert_eq!(blocks_written(&mut term), 1);
        assert_eq!(term.screen[4 + 3], Some((Color::GREEN, Color::RED)));
    }

    #[test]
    fn message_box_forces_a_full_redraw() {
        let mut term = TermManager::with_writer((80, 24), Vec::new());
        term.layout((4, 2)).unwrap();
        let mut surface = Surface::new(4, 4);
        surface.fill(Color::GREEN);

        term.present(&surface).unwrap();
        term.show_message(&["Game over!"]).unwrap();
        assert!(term.screen.iter().all(|c| c.is_none()));
        blocks_written(&mut term);

        term.present(&surface).unwrap();
        assert_eq!(blocks_written(&mut term), 8);
    }

    #[test]
    fn odd_height_is_padded_with_black() {
        let mut term = TermManager::with_writer((80, 24), Vec::new());
        term.layout((2, 2)).unwrap();
        let mut surface = Surface::new(2, 3);
        surface.fill(Color::GREEN);

        term.present(&surface).unwrap();
        assert_eq!(blocks_written(&mut term), 4);
        assert_eq!(term.screen[0], Some((Color::GREEN, Color::GREEN)));
        assert_eq!(term.screen[2], Some((Color::GREEN, Color::BLACK)));
        assert_eq!(term.screen[3], Some((Color::GREEN, Color::BLACK)));
    }
}
