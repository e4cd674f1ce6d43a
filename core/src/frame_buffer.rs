use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::error::Chip8Error;
use crate::host::Renderer;

/// # Frame buffer
/// The Chip-8 display is composed of 64x32 black/white pixels.
///
/// Pixels are stored row-major and indexed as [y][x]. Every coordinate that
/// comes in is wrapped around the edges of the display, so there is no such
/// thing as an off-screen pixel.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            pixels: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        }
    }

    pub fn width(&self) -> usize {
        DISPLAY_WIDTH
    }

    pub fn height(&self) -> usize {
        DISPLAY_HEIGHT
    }

    /// Turns every pixel off
    pub fn clear(&mut self) {
        self.pixels = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y % DISPLAY_HEIGHT][x % DISPLAY_WIDTH]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        self.pixels[y % DISPLAY_HEIGHT][x % DISPLAY_WIDTH] = on;
    }

    /// Rows of the display from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[bool; DISPLAY_WIDTH]> + '_ {
        self.pixels.iter()
    }

    /// draw_sprite(x, y, rows)
    ///
    /// XORs an 8 pixel wide sprite onto the display with its top left corner
    /// at `x`, `y`. Bit 7 of each row is the leftmost pixel. Pixels that fall
    /// off an edge wrap around to the opposite one.
    ///
    /// Returns true if any pixel that was on got turned off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, rows: &[u8]) -> bool {
        let mut collision = false;

        for (row, byte) in rows.iter().enumerate() {
            let py = (y + row) % DISPLAY_HEIGHT;
            for bit in 0..8 {
                let px = (x + bit) % DISPLAY_WIDTH;
                let sprite_pixel = (byte >> (7 - bit)) & 1 == 1;
                let screen_pixel = self.pixels[py][px];
                collision |= sprite_pixel && screen_pixel;
                self.pixels[py][px] = screen_pixel ^ sprite_pixel;
            }
        }

        collision
    }

    /// Pushes every pixel to `renderer` and flushes it.
    ///
    /// Only the area both the renderer and the frame buffer cover is drawn.
    pub fn present<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<(), Chip8Error> {
        let width = renderer.width().min(DISPLAY_WIDTH);
        let height = renderer.height().min(DISPLAY_HEIGHT);
        for (y, row) in self.pixels.iter().take(height).enumerate() {
            for (x, &on) in row.iter().take(width).enumerate() {
                renderer.draw_pixel(x, y, on);
            }
        }
        renderer.update()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.pixels.iter() {
            let line: String = row.iter().map(|&on| if on { '#' } else { '.' }).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingRenderer {
        pixels: Vec<(usize, usize, bool)>,
        updates: usize,
    }

    impl Renderer for RecordingRenderer {
        fn width(&self) -> usize {
            64
        }

        fn height(&self) -> usize {
            32
        }

        fn draw_pixel(&mut self, x: usize, y: usize, on: bool) {
            self.pixels.push((x, y, on));
        }

        fn update(&mut self) -> Result<(), Chip8Error> {
            self.updates += 1;
            Ok(())
        }
    }

    #[test]
    fn test_clear() {
        let mut frame = FrameBuffer::new();
        frame.set_pixel(3, 4, true);
        frame.draw_sprite(10, 10, &[0xFF, 0xFF]);
        frame.clear();
        for y in 0..DISPLAY_HEIGHT {
            for x in 0..DISPLAY_WIDTH {
                assert!(!frame.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn test_pixel_coordinates_wrap() {
        let mut frame = FrameBuffer::new();
        frame.set_pixel(64 + 3, 32 + 1, true);
        assert!(frame.get_pixel(3, 1));
        assert!(frame.get_pixel(3 + 128, 1 + 64));
    }

    #[test]
    fn test_draw_msb_is_leftmost() {
        let mut frame = FrameBuffer::new();
        frame.draw_sprite(0, 0, &[0x80]);
        assert!(frame.get_pixel(0, 0));
        assert!(!frame.get_pixel(7, 0));
    }

    #[test]
    fn test_draw_xors() {
        let mut frame = FrameBuffer::new();
        // 0 1 0 1 -> Set
        frame.set_pixel(1, 0, true);
        frame.set_pixel(3, 0, true);
        // 1 1 0 0 -> Draw xor
        frame.draw_sprite(0, 0, &[0xC0]);
        let row: Vec<bool> = (0..4).map(|x| frame.get_pixel(x, 0)).collect();
        assert_eq!(row, vec![true, false, false, true]);
    }

    #[test]
    fn test_draw_twice_cancels_and_collides() {
        let mut frame = FrameBuffer::new();
        let sprite = [0xF0, 0x90, 0x90, 0x90, 0xF0];
        assert!(!frame.draw_sprite(12, 7, &sprite));
        assert!(frame.draw_sprite(12, 7, &sprite));
        assert_eq!(frame, FrameBuffer::new());
    }

    #[test]
    fn test_collision_accumulates_across_rows() {
        let mut frame = FrameBuffer::new();
        frame.set_pixel(0, 0, true);
        // only the first row collides; the last row doesn't
        assert!(frame.draw_sprite(0, 0, &[0x80, 0x00, 0x01]));
    }

    #[test]
    fn test_no_collision_when_lighting_pixels() {
        let mut frame = FrameBuffer::new();
        frame.set_pixel(1, 0, true);
        assert!(!frame.draw_sprite(0, 0, &[0x80]));
    }

    #[test]
    fn test_draw_wraps_bottom_right_corner() {
        let mut frame = FrameBuffer::new();
        frame.draw_sprite(DISPLAY_WIDTH - 1, DISPLAY_HEIGHT - 1, &[0xC0, 0xC0]);
        assert!(frame.get_pixel(63, 31));
        assert!(frame.get_pixel(0, 31));
        assert!(frame.get_pixel(63, 0));
        assert!(frame.get_pixel(0, 0));
        assert!(!frame.get_pixel(1, 0));
    }

    #[test]
    fn test_draw_empty_sprite() {
        let mut frame = FrameBuffer::new();
        assert!(!frame.draw_sprite(0, 0, &[]));
        assert_eq!(frame, FrameBuffer::new());
    }

    #[test]
    fn test_present_pushes_every_pixel_then_updates() {
        let mut frame = FrameBuffer::new();
        frame.set_pixel(2, 1, true);
        let mut renderer = RecordingRenderer {
            pixels: Vec::new(),
            updates: 0,
        };
        frame.present(&mut renderer).unwrap();
        assert_eq!(renderer.pixels.len(), DISPLAY_WIDTH * DISPLAY_HEIGHT);
        assert_eq!(renderer.updates, 1);
        let lit: Vec<_> = renderer.pixels.iter().filter(|p| p.2).collect();
        assert_eq!(lit, vec![&(2, 1, true)]);
    }
}
