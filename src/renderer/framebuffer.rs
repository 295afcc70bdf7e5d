//! Indexed-color software frame buffer
//!
//! Shapes are rasterized into palette indices; text is recorded as labels and
//! rasterized by the presenter, which owns the font.

use crate::consts::{GLYPH_WIDTH, VIDEO_HEIGHT, VIDEO_WIDTH};

/// A text draw request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLabel {
    pub x: i32,
    pub y: i32,
    pub text: String,
    pub color: u8,
}

#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: i32,
    height: i32,
    pixels: Vec<u8>,
    labels: Vec<TextLabel>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::with_size(VIDEO_WIDTH, VIDEO_HEIGHT)
    }

    pub fn with_size(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            pixels: vec![0; (width * height) as usize],
            labels: Vec::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    /// Fill with a color and drop all text
    pub fn clear(&mut self, color: u8) {
        self.pixels.fill(color);
        self.labels.clear();
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some((y * self.width + x) as usize)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<u8> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Plot one pixel; off-screen writes are ignored
    pub fn put_pixel(&mut self, x: i32, y: i32, color: u8) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Solid rectangle, clipped to the screen
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u8) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width);
        let y1 = (y + h).min(self.height);
        for py in y0..y1 {
            let row = (py * self.width) as usize;
            for px in x0..x1 {
                self.pixels[row + px as usize] = color;
            }
        }
    }

    /// Checkerboard rectangle (alternating `on`/`off` pixels)
    pub fn dotted_rect(&mut self, x: i32, y: i32, w: i32, h: i32, on: u8, off: u8) {
        for py in y..y + h {
            for px in x..x + w {
                let color = if (px + py) % 2 == 0 { on } else { off };
                self.put_pixel(px, py, color);
            }
        }
    }

    pub fn text(&mut self, x: i32, y: i32, text: &str, color: u8) {
        self.labels.push(TextLabel {
            x,
            y,
            text: text.to_string(),
            color,
        });
    }

    /// Text horizontally centered on the screen
    pub fn text_centered(&mut self, y: i32, text: &str, color: u8) {
        let len = text.chars().count() as i32;
        let x = (self.width - len * GLYPH_WIDTH) / 2;
        self.text(x, y, text, color);
    }

    /// Text right-aligned against the screen edge
    pub fn text_right(&mut self, y: i32, text: &str, color: u8) {
        let len = text.chars().count() as i32;
        self.text(self.width - len * GLYPH_WIDTH, y, text, color);
    }

    /// Whether any label contains `needle`
    pub fn has_text(&self, needle: &str) -> bool {
        self.labels.iter().any(|l| l.text.contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_is_clipped() {
        let mut fb = FrameBuffer::with_size(8, 8);
        fb.fill_rect(-2, -2, 4, 4, 7);
        assert_eq!(fb.pixel(0, 0), Some(7));
        assert_eq!(fb.pixel(1, 1), Some(7));
        assert_eq!(fb.pixel(2, 2), Some(0));

        fb.fill_rect(6, 6, 10, 10, 3);
        assert_eq!(fb.pixel(7, 7), Some(3));
        assert_eq!(fb.pixel(8, 8), None);
    }

    #[test]
    fn test_clear_drops_labels() {
        let mut fb = FrameBuffer::new();
        fb.text_centered(10, "CONTINUE", 15);
        assert!(fb.has_text("CONTINUE"));
        assert_eq!(fb.labels()[0].x, (320 - 8 * 8) / 2);

        fb.clear(0);
        assert!(fb.labels().is_empty());
    }

    #[test]
    fn test_dotted_rect_alternates() {
        let mut fb = FrameBuffer::with_size(4, 4);
        fb.dotted_rect(0, 0, 2, 2, 15, 1);
        assert_eq!(fb.pixel(0, 0), Some(15));
        assert_eq!(fb.pixel(1, 0), Some(1));
        assert_eq!(fb.pixel(1, 1), Some(15));
    }
}
