//! Turning decoded images into panel-sized frames.
//!
//! Images are shrunk to fit (never enlarged), converted to RGB and pinned to
//! the top-left corner of a black buffer the size of the panel.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use std::time::Duration;

/// Largest size with the source's aspect ratio that fits in `max_w × max_h`.
///
/// Sources that already fit are returned unchanged.
pub fn fit_dimensions(src_w: u32, src_h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if src_w <= max_w && src_h <= max_h {
        return (src_w, src_h);
    }
    let ratio = (max_w as f64 / src_w as f64).min(max_h as f64 / src_h as f64);
    let w = ((src_w as f64 * ratio).round() as u32).clamp(1, max_w.max(1));
    let h = ((src_h as f64 * ratio).round() as u32).clamp(1, max_h.max(1));
    (w, h)
}

/// Shrink `image` to fit the target with Lanczos3 and drop any alpha.
pub fn scale_to_fit(image: &DynamicImage, target_w: u32, target_h: u32) -> RgbImage {
    let (w, h) = fit_dimensions(image.width(), image.height(), target_w, target_h);
    if (w, h) == (image.width(), image.height()) {
        image.to_rgb8()
    } else {
        image.resize_exact(w, h, FilterType::Lanczos3).to_rgb8()
    }
}

/// A black panel-sized buffer.
pub fn blank_frame(width: u32, height: u32) -> RgbImage {
    RgbImage::new(width, height)
}

/// Place `image` at the origin of a black `width × height` buffer.
pub fn compose(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    let mut frame = blank_frame(width, height);
    imageops::replace(&mut frame, image, 0, 0);
    frame
}

/// Scale and compose in one go: the frame a sink actually receives.
pub fn still_frame(image: &DynamicImage, width: u32, height: u32) -> RgbImage {
    compose(&scale_to_fit(image, width, height), width, height)
}

// ── Frame pacing ─────────────────────────────────────────────────────

/// How an animation frame's authored delay becomes a hold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FramePacing {
    /// Whole seconds, `delay_ms / 1000`. Sub-second delays hold for zero.
    #[default]
    TruncatedSeconds,
    /// The authored delay to the millisecond.
    Exact,
}

impl FramePacing {
    pub fn frame_hold(self, delay_ms: u32) -> Duration {
        match self {
            FramePacing::TruncatedSeconds => Duration::from_secs(u64::from(delay_ms / 1000)),
            FramePacing::Exact => Duration::from_millis(u64::from(delay_ms)),
        }
    }
}
