use crate::error::Chip8Error;

/// # Renderer
/// Something that can put Chip-8 pixels in front of a user.
///
/// Pixels pushed through `draw_pixel` are not expected to be visible until
/// `update` is called, which lets a renderer draw into a back buffer and flip.
pub trait Renderer {
    /// Horizontal size of the surface measured in Chip-8 pixels
    fn width(&self) -> usize;

    /// Vertical size of the surface measured in Chip-8 pixels
    fn height(&self) -> usize;

    /// Turn the pixel at `x`, `y` on or off; (0, 0) is the top left
    fn draw_pixel(&mut self, x: usize, y: usize, on: bool);

    /// Make everything drawn since the last update visible
    fn update(&mut self) -> Result<(), Chip8Error>;
}
