//! Centred single-line text on a black frame.

use crate::render::blank_frame;
use crate::{Color, Error, Result};
use ab_glyph::{Font, FontVec, PxScale};
use image::RgbImage;
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::Path;

/// Anything that can draw a line of text onto a fresh frame.
pub trait TextRenderer {
    fn render(&self, text: &str, size: f32, width: u32, height: u32) -> RgbImage;
}

/// A TrueType font loaded once and rasterised at any size.
pub struct TextFont {
    font: FontVec,
}

impl TextFont {
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let font = FontVec::try_from_vec(bytes)
            .map_err(|e| Error::font(format!("{}: {e}", path.display())))?;
        Ok(Self { font })
    }

    /// Scale for `size` pixels per em, the way a TrueType point size reads at 72 dpi.
    pub fn scale(&self, size: f32) -> PxScale {
        match self.font.units_per_em() {
            Some(upem) => PxScale::from(size * self.font.height_unscaled() / upem),
            None => PxScale::from(size),
        }
    }

    /// Bounding box of `text` at `size`.
    pub fn measure(&self, text: &str, size: f32) -> (u32, u32) {
        text_size(self.scale(size), &self.font, text)
    }
}

impl TextRenderer for TextFont {
    /// White `text` centred on a black `width × height` frame.
    fn render(&self, text: &str, size: f32, width: u32, height: u32) -> RgbImage {
        let (x, y) = centered_origin((width, height), self.measure(text, size));
        let scale = self.scale(size);
        let mut frame = blank_frame(width, height);
        draw_text_mut(&mut frame, Color::WHITE.into(), x, y, scale, &self.font, text);
        frame
    }
}

/// Top-left corner that centres a `text`-sized box in `target`.
///
/// Odd leftovers round towards the top-left; oversized text gets a negative
/// origin and is clipped on both sides.
pub fn centered_origin(target: (u32, u32), text: (u32, u32)) -> (i32, i32) {
    let x = (target.0 as i32 - text.0 as i32).div_euclid(2);
    let y = (target.1 as i32 - text.1 as i32).div_euclid(2);
    (x, y)
}
