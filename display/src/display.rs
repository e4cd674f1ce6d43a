use log::debug;
use sdl2::pixels::PixelFormatEnum;

use emu8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use emu8_core::{Chip8Error, Renderer};

const BYTES_PER_PIXEL: usize = 3;

fn render_error<E: ToString>(err: E) -> Chip8Error {
    Chip8Error::Render(err.to_string())
}

/// # Frame
/// An RGB24 image of the Chip-8 display, laid out the way an SDL2 streaming
/// texture wants it: rows concatenated top to bottom, 3 bytes per pixel.
///
/// Lit pixels are white and dark pixels are black.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    rgb: Vec<u8>,
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        Frame {
            width,
            height,
            rgb: vec![0; width * height * BYTES_PER_PIXEL],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixels outside the frame are ignored
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let start = (y * self.width + x) * BYTES_PER_PIXEL;
        let intensity = if on { 0xFF } else { 0x00 };
        self.rgb[start..start + BYTES_PER_PIXEL].copy_from_slice(&[intensity; BYTES_PER_PIXEL]);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.rgb
    }

    /// Bytes in a single row of the image
    pub fn pitch(&self) -> usize {
        self.width * BYTES_PER_PIXEL
    }
}

/// # Display
/// An SDL2 window that shows the Chip-8 display scaled up by an integer factor.
///
/// Pixels are collected into a `Frame` and only reach the window when
/// `update` streams the frame into a texture and presents the canvas.
pub struct Display {
    canvas: sdl2::render::WindowCanvas,
    frame: Frame,
}

impl Display {
    /// Creates a new display bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw
    /// * `scale` the size multiplier for each pixel
    pub fn new(sdl: &sdl2::Sdl, scale: u32) -> Result<Self, Chip8Error> {
        let scale = scale.max(1);
        let video_subsystem = sdl.video().map_err(render_error)?;
        let window = video_subsystem
            .window(
                "Chip-8",
                DISPLAY_WIDTH as u32 * scale,
                DISPLAY_HEIGHT as u32 * scale,
            )
            .position_centered()
            .build()
            .map_err(render_error)?;
        let canvas = window.into_canvas().build().map_err(render_error)?;
        debug!("opened a {}x scaled window", scale);

        Ok(Display {
            canvas,
            frame: Frame::new(DISPLAY_WIDTH, DISPLAY_HEIGHT),
        })
    }
}

impl Renderer for Display {
    fn width(&self) -> usize {
        self.frame.width()
    }

    fn height(&self) -> usize {
        self.frame.height()
    }

    fn draw_pixel(&mut self, x: usize, y: usize, on: bool) {
        self.frame.set(x, y, on);
    }

    /// Streams the frame into an RGB24 texture and presents it
    fn update(&mut self) -> Result<(), Chip8Error> {
        let texture_creator = self.canvas.texture_creator();
        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                self.frame.width() as u32,
                self.frame.height() as u32,
            )
            .map_err(render_error)?;

        texture
            .update(None, self.frame.as_bytes(), self.frame.pitch())
            .map_err(render_error)?;

        self.canvas.copy(&texture, None, None).map_err(render_error)?;
        self.canvas.present();
        Ok(())
    }
}
