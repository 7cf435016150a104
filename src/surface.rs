use std::cmp::min;

use crate::grid::Rect;

/// Packed `0x00RRGGBB` color.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color(u32);

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 0xff, 0);
    pub const RED: Color = Color::rgb(0xff, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color((r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub fn components(self) -> (u8, u8, u8) {
        ((self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8)
    }
}

/// Off-screen pixel buffer the frame is drawn into before being presented.
pub struct Surface {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Surface {
    pub fn new(width: usize, height: usize) -> Self {
        Surface { width, height, pixels: vec![Color::BLACK; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.width + x]
    }

    /// Fills `rect`, clipped to the surface bounds.
    pub fn draw_rect(&mut self, rect: Rect, color: Color) {
        let end_x = min(rect.x + rect.w, self.width);
        let end_y = min(rect.y + rect.h, self.height);

        for y in rect.y..end_y {
            let row = y * self.width;
            for x in rect.x..end_x {
                self.pixels[row + x] = color;
            }
        }
    }

    pub fn fill(&mut self, color: Color) {
        self.draw_rect(Rect { x: 0, y: 0, w: self.width, h: self.height }, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_pack_and_unpack() {
        assert_eq!(Color::rgb(0x12, 0x34, 0x56), Color(0x123456));
        assert_eq!(Color::RED.components(), (0xff, 0, 0));
        assert_eq!(Color::GREEN.components(), (0, 0xff, 0));
        assert_eq!(Color::BLACK.components(), (0, 0, 0));
    }

    #[test]
    fn rect_is_clipped_to_the_surface() {
        let mut surface = Surface::new(4, 3);
        surface.draw_rect(Rect { x: 2, y: 1, w: 10, h: 10 }, Color::RED);

        for y in 0..3 {
            for x in 0..4 {
                let expected = if x >= 2 && y >= 1 { Color::RED } else { Color::BLACK };
                assert_eq!(surface.pixel(x, y), expected, "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn rect_outside_the_surface_draws_nothing() {
        let mut surface = Surface::new(2, 2);
        surface.draw_rect(Rect { x: 5, y: 5, w: 2, h: 2 }, Color::GREEN);
        assert!(surface.pixels.iter().all(|&p| p == Color::BLACK));
    }

    #[test]
    fn fill_covers_everything() {
        let mut surface = Surface::new(3, 5);
        surface.draw_rect(Rect { x: 0, y: 0, w: 1, h: 1 }, Color::RED);
        surface.fill(Color::GREEN);
        assert!(surface.pixels.iter().all(|&p| p == Color::GREEN));
    }
}
