//! Grayscale rendering of the grid onto an abstract canvas.
//!
//! No windowing backend ships with the engine; callers plug one in by
//! implementing [`Canvas`]. Cell `(x, y)` is drawn as a square of
//! [`CELL_PIXELS`] pixels whose top-left corner is
//! `(x * CELL_PIXELS, y * CELL_PIXELS)`.

use toroid_core::{Coord, GridDims};

use crate::matrix::Matrix;

/// Side of one drawn cell, in pixels.
pub const CELL_PIXELS: u32 = 30;

/// Input reported by a canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// The user closed the window.
    Close,
    /// A click at pixel `(px, py)`.
    Click {
        /// Horizontal pixel.
        px: u32,
        /// Vertical pixel.
        py: u32,
    },
}

impl Event {
    /// Grid cell under a click, if this is one.
    pub fn cell(self) -> Option<Coord> {
        match self {
            Self::Close => None,
            Self::Click { px, py } => Some(Coord::new(
                i64::from(px / CELL_PIXELS),
                i64::from(py / CELL_PIXELS),
            )),
        }
    }
}

/// A drawing surface with a blocking event source.
pub trait Canvas: Send {
    /// Open a window of `width x height` pixels.
    fn open(&mut self, width: u32, height: u32, title: &str);
    /// Fill the whole surface with black.
    fn clear(&mut self);
    /// Fill a rectangle with a gray level, 0 black to 255 white.
    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, gray: u8);
    /// Present everything drawn since the last flush.
    fn flush(&mut self);
    /// Block until the next input event.
    fn wait_event(&mut self) -> Event;
    /// Close the window.
    fn close(&mut self);
}

/// Gray level for a cell value: `round(255 * sqrt(v))` clamped to
/// `[0, 255]`. Negative and NaN values are black.
///
/// ```
/// use toroid_engine::gray_level;
///
/// assert_eq!(gray_level(0.0), 0);
/// assert_eq!(gray_level(0.25), 128);
/// assert_eq!(gray_level(1.0), 255);
/// assert_eq!(gray_level(4.0), 255);
/// ```
pub fn gray_level(value: f64) -> u8 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    (255.0 * value.sqrt()).round().clamp(0.0, 255.0) as u8
}

/// A canvas bound to a grid, opened on first draw.
pub struct Viewer {
    canvas: Box<dyn Canvas>,
    open: bool,
}

impl Viewer {
    /// Window title.
    pub const TITLE: &'static str = "toroid";

    /// Wrap a canvas.
    pub fn new(canvas: Box<dyn Canvas>) -> Self {
        Self {
            canvas,
            open: false,
        }
    }

    /// Window size in pixels for `dims`.
    pub fn window_size(dims: GridDims) -> (u32, u32) {
        (
            dims.x().saturating_mul(CELL_PIXELS),
            dims.y().saturating_mul(CELL_PIXELS),
        )
    }

    /// Draw every cell of `matrix` and present it.
    pub fn draw(&mut self, matrix: &Matrix) {
        if !self.open {
            let (w, h) = Self::window_size(matrix.dims());
            self.canvas.open(w, h, Self::TITLE);
            self.open = true;
        }
        self.canvas.clear();
        for (coord, cell) in matrix.iter() {
            self.canvas.fill_rect(
                coord.x as u32 * CELL_PIXELS,
                coord.y as u32 * CELL_PIXELS,
                CELL_PIXELS,
                CELL_PIXELS,
                gray_level(cell.value),
            );
        }
        self.canvas.flush();
    }

    /// Block until the next event.
    pub fn wait_event(&mut self) -> Event {
        self.canvas.wait_event()
    }

    /// Block until the window is closed, ignoring clicks.
    pub fn wait_close(&mut self) {
        while self.wait_event() != Event::Close {}
    }

    /// Close the window if it was opened.
    pub fn close(&mut self) {
        if self.open {
            self.canvas.close();
            self.open = false;
        }
    }
}

impl std::fmt::Debug for Viewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewer").field("open", &self.open).finish()
    }
}
