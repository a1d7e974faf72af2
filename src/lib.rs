//! Christmas countdown and GIF player for an RGB LED matrix.
//!
//! This module holds the pieces shared by the binary and the renderer:
//! - Hardware option record and matrix initialization
//! - Signal handling for clean shutdown
//! - The colour type and the colour pulse ramp
//!
//! The renderer, countdown, media and controller modules build on top.

pub mod controller;
pub mod countdown;
pub mod error;
pub mod media;
pub mod render;
pub mod sink;
pub mod text;

pub use error::{Error, Result};

#[cfg(feature = "hardware")]
use rpi_led_matrix::{LedMatrix, LedMatrixOptions, LedRuntimeOptions};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// ── Matrix options ─────────────────────────────────────────────────

/// Hardware parameters handed to the panel driver at startup.
///
/// Only `rows` and `cols` are read by the rest of the crate (they size every
/// pixel buffer). The remaining fields pass through to the driver as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatrixOptions {
    pub rows: u32,
    pub cols: u32,
    pub chain_length: u32,
    pub parallel: u32,
    pub pwm_bits: u8,
    pub brightness: u8,
    pub pwm_lsb_nanoseconds: u32,
    pub led_rgb_sequence: String,
    pub pixel_mapper_config: String,
    pub panel_type: String,
    pub row_addr_type: u32,
    pub multiplexing: u32,
    pub hardware_mapping: String,
}

impl MatrixOptions {
    /// Defaults with a different panel size.
    pub fn with_size(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            ..Self::default()
        }
    }
}

impl Default for MatrixOptions {
    fn default() -> Self {
        Self {
            rows: 64,
            cols: 64,
            chain_length: 1,
            parallel: 1,
            pwm_bits: 11,
            brightness: 100,
            pwm_lsb_nanoseconds: 130,
            led_rgb_sequence: "RGB".to_string(),
            pixel_mapper_config: String::new(),
            panel_type: String::new(),
            row_addr_type: 0,
            multiplexing: 0,
            hardware_mapping: "regular".to_string(),
        }
    }
}

// ── Color ──────────────────────────────────────────────────────────

/// Our own color type, decoupled from the hardware crate.
///
/// At the hardware boundary we convert via `Into<LedColor>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<Color> for image::Rgb<u8> {
    fn from(c: Color) -> Self {
        image::Rgb([c.r, c.g, c.b])
    }
}

/// Convert our Color to the hardware crate's LedColor at the boundary.
#[cfg(feature = "hardware")]
impl From<Color> for rpi_led_matrix::LedColor {
    fn from(c: Color) -> Self {
        rpi_led_matrix::LedColor {
            red: c.r,
            green: c.g,
            blue: c.b,
        }
    }
}

// ── Colour pulse ───────────────────────────────────────────────────

/// Length of one full pulse cycle: three 255-wide ramps.
pub const PULSE_PERIOD: u32 = 3 * 255;

/// Map a pulse counter to a colour.
///
/// Blue fades into red, red into green, green back into blue. The counter is
/// reduced modulo [`PULSE_PERIOD`], so `pulse_color(0) == pulse_color(765)`.
/// Band 0 ends at 255 inclusive and band 1 starts over at 256, which repeats
/// the same colour at each seam (255/256 and 511/512).
pub fn pulse_color(counter: u32) -> Color {
    let n = counter % PULSE_PERIOD;
    // n < 765, so every `c` below is at most 255
    if n <= 255 {
        let c = n as u8;
        Color::new(c, 0, 255 - c)
    } else if n <= 511 {
        let c = (n - 256) as u8;
        Color::new(255 - c, c, 0)
    } else {
        let c = (n - 512) as u8;
        Color::new(0, 255 - c, c)
    }
}

// ── Matrix initialization ──────────────────────────────────────────

/// Create a matrix from the option record.
///
/// Fails when not running as root or when GPIO is unavailable. There is no
/// retry: the caller treats this as fatal.
#[cfg(feature = "hardware")]
pub fn create_matrix(opts: &MatrixOptions) -> Result<LedMatrix> {
    let mut options = LedMatrixOptions::new();
    options.set_hardware_mapping(&opts.hardware_mapping);
    options.set_rows(opts.rows);
    options.set_cols(opts.cols);
    options.set_chain_length(opts.chain_length);
    options.set_parallel(opts.parallel);
    options.set_pwm_bits(opts.pwm_bits).map_err(Error::hardware)?;
    options.set_brightness(opts.brightness).map_err(Error::hardware)?;
    options.set_pwm_lsb_nanoseconds(opts.pwm_lsb_nanoseconds);
    options.set_led_rgb_sequence(&opts.led_rgb_sequence);
    options.set_pixel_mapper_config(&opts.pixel_mapper_config);
    options.set_panel_type(&opts.panel_type);
    options.set_row_addr_type(opts.row_addr_type);
    options.set_multiplexing(opts.multiplexing);

    let rt_options = LedRuntimeOptions::new();

    LedMatrix::new(Some(options), Some(rt_options)).map_err(Error::hardware)
}

// ── Shutdown flag ──────────────────────────────────────────────────

/// Set up a Ctrl+C / SIGTERM handler that sets the returned flag to false.
///
/// # Rust concept: Arc and AtomicBool
/// The handler runs on its own thread, so the flag is shared through an
/// `Arc` and flipped atomically. No mutex is needed for a single bool.
pub fn setup_signal_handler() -> Result<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .map_err(|e| Error::Signal(e.to_string()))?;

    Ok(running)
}

/// Check if the main loop should keep running.
pub fn is_running(running: &AtomicBool) -> bool {
    running.load(Ordering::SeqCst)
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    // ── MatrixOptions tests ────────────────────────────────────────

    #[test]
    fn matrix_options_default_matches_panel() {
        let opts = MatrixOptions::default();
        assert_eq!((opts.rows, opts.cols), (64, 64));
        assert_eq!(opts.chain_length, 1);
        assert_eq!(opts.parallel, 1);
        assert_eq!(opts.pwm_bits, 11);
        assert_eq!(opts.brightness, 100);
        assert_eq!(opts.pwm_lsb_nanoseconds, 130);
        assert_eq!(opts.led_rgb_sequence, "RGB");
        assert!(opts.pixel_mapper_config.is_empty());
        assert!(opts.panel_type.is_empty());
        assert_eq!((opts.row_addr_type, opts.multiplexing), (0, 0));
    }

    #[rstest]
    #[case(64, 64)]
    #[case(32, 32)]
    #[case(32, 64)]
    fn with_size_only_changes_dimensions(#[case] rows: u32, #[case] cols: u32) {
        let opts = MatrixOptions::with_size(rows, cols);
        assert_eq!((opts.rows, opts.cols), (rows, cols));
        assert_eq!(
            MatrixOptions { rows: 64, cols: 64, ..opts },
            MatrixOptions::default()
        );
    }

    // ── Pulse tests ────────────────────────────────────────────────

    #[rstest]
    #[case(0, Color::new(0, 0, 255))]
    #[case(100, Color::new(100, 0, 155))]
    #[case(255, Color::new(255, 0, 0))]
    #[case(256, Color::new(255, 0, 0))]
    #[case(300, Color::new(211, 44, 0))]
    #[case(511, Color::new(0, 255, 0))]
    #[case(512, Color::new(0, 255, 0))]
    #[case(764, Color::new(0, 3, 252))]
    fn pulse_ramps(#[case] counter: u32, #[case] expected: Color) {
        assert_eq!(pulse_color(counter), expected);
    }

    #[test]
    fn pulse_wraps_seamlessly() {
        assert_eq!(pulse_color(0), pulse_color(PULSE_PERIOD));
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(1000)]
    fn pulse_is_periodic(#[case] k: u32) {
        for counter in (0..PULSE_PERIOD).step_by(7) {
            assert_eq!(pulse_color(counter), pulse_color(counter + PULSE_PERIOD * k));
        }
    }

    #[test]
    fn pulse_channels_sum_to_full_intensity() {
        for counter in 0..PULSE_PERIOD {
            let c = pulse_color(counter);
            assert_eq!(c.r as u32 + c.g as u32 + c.b as u32, 255, "counter {counter}");
        }
    }

    #[test]
    fn pulse_has_exactly_one_dark_channel_away_from_seams() {
        let two_dark = [0, 255, 256, 511, 512];
        for counter in 0..PULSE_PERIOD {
            let c = pulse_color(counter);
            let zeros = [c.r, c.g, c.b].iter().filter(|&&v| v == 0).count();
            if two_dark.contains(&counter) {
                assert_eq!(zeros, 2, "counter {counter}");
            } else {
                assert_eq!(zeros, 1, "counter {counter}");
            }
        }
    }

    // ── Color / flag tests ─────────────────────────────────────────

    #[test]
    fn color_converts_to_rgb_pixel() {
        let px: image::Rgb<u8> = Color::new(1, 2, 3).into();
        assert_eq!(px, image::Rgb([1, 2, 3]));
    }

    #[test]
    fn is_running_reads_flag() {
        let flag = AtomicBool::new(true);
        assert!(is_running(&flag));
        flag.store(false, Ordering::SeqCst);
        assert!(!is_running(&flag));
    }
}
