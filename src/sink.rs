//! Frame sinks: where finished pixel buffers go.
//!
//! The panel driver is not thread-safe, so a sink is owned by the single
//! render thread and handed one buffer at a time.

use crate::Color;
use image::RgbImage;

/// An endpoint that displays panel-sized RGB buffers.
pub trait FrameSink {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Show `frame`, which must be exactly `width × height`.
    fn present(&mut self, frame: &RgbImage);

    /// Fill the whole panel with one colour.
    fn fill(&mut self, color: Color);
}

// ── Hardware sink ────────────────────────────────────────────────────

#[cfg(feature = "hardware")]
pub use hardware::LedMatrixSink;

#[cfg(feature = "hardware")]
mod hardware {
    use super::FrameSink;
    use crate::Color;
    use image::RgbImage;
    use rpi_led_matrix::{LedCanvas, LedMatrix};

    /// Double-buffered sink over `rpi-led-matrix`.
    ///
    /// Every frame is drawn into the offscreen canvas and swapped in on vsync;
    /// `swap` hands back the previous canvas for the next frame.
    pub struct LedMatrixSink {
        matrix: LedMatrix,
        canvas: Option<LedCanvas>,
        width: u32,
        height: u32,
    }

    impl LedMatrixSink {
        pub fn new(matrix: LedMatrix) -> Self {
            let canvas = matrix.offscreen_canvas();
            let (width, height) = canvas.canvas_size();
            Self {
                matrix,
                canvas: Some(canvas),
                width: width.max(0) as u32,
                height: height.max(0) as u32,
            }
        }

        fn swap_with(&mut self, draw: impl FnOnce(&mut LedCanvas)) {
            if let Some(mut canvas) = self.canvas.take() {
                draw(&mut canvas);
                self.canvas = Some(self.matrix.swap(canvas));
            }
        }
    }

    impl FrameSink for LedMatrixSink {
        fn width(&self) -> u32 {
            self.width
        }

        fn height(&self) -> u32 {
            self.height
        }

        fn present(&mut self, frame: &RgbImage) {
            self.swap_with(|canvas| {
                canvas.clear();
                for (x, y, pixel) in frame.enumerate_pixels() {
                    let c = Color::new(pixel[0], pixel[1], pixel[2]);
                    canvas.set(x as i32, y as i32, &c.into());
                }
            });
        }

        fn fill(&mut self, color: Color) {
            self.swap_with(|canvas| canvas.fill(&color.into()));
        }
    }
}

// ── Test sink ────────────────────────────────────────────────────────
