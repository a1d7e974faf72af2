//! The playback loop and everything it owns.
//!
//! `DisplayController` is built once at startup and holds the sink, the font,
//! the GIF catalog, the RNG and the cancellation flag. Nothing is global.
//!
//! ## Cycle
//! `BLANK → COUNTDOWN → RANDOM_GIF → BLANK → …` until the running flag clears.
//!
//! ## Interrupt pattern
//! Every present and every hold checks the flag first. Holds sleep in short
//! slices so a Ctrl+C is noticed within one slice. A cleared flag surfaces as
//! [`Error::Interrupted`], which unwinds through `?` to the loop. The loop
//! shows one blank frame and returns `Ok(())`.

use crate::countdown::{Hold, countdown_lines};
use crate::media::{AnimationFrame, GifCatalog, LoadedImage, load_image};
use crate::render::{FramePacing, blank_frame, compose, scale_to_fit, still_frame};
use crate::sink::FrameSink;
use crate::text::TextRenderer;
use crate::{Error, PULSE_PERIOD, Result, is_running, pulse_color};
use chrono::{Local, NaiveDateTime};
use image::{DynamicImage, RgbImage};
use rand::rngs::StdRng;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::thread;
use std::time::{Duration, Instant};

// ── Timings ──────────────────────────────────────────────────────────

/// How long each kind of frame stays up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    /// Still images.
    pub still: Duration,
    /// Each of "DAYS", "UNTIL", "XMAS".
    pub word: Duration,
    /// The day count.
    pub countdown: Duration,
    /// One step of the colour pulse.
    pub pulse_tick: Duration,
    pub pacing: FramePacing,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            still: Duration::from_secs(3),
            word: Duration::from_millis(800),
            countdown: Duration::from_secs(120),
            pulse_tick: Duration::from_millis(5),
            pacing: FramePacing::default(),
        }
    }
}

// ── Pacer ────────────────────────────────────────────────────────────

const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Blocking sleeps that give up as soon as the running flag clears.
pub struct Pacer {
    running: Arc<AtomicBool>,
}

impl Pacer {
    pub fn new(running: Arc<AtomicBool>) -> Self {
        Self { running }
    }

    pub fn check(&self) -> Result<()> {
        if is_running(&self.running) {
            Ok(())
        } else {
            Err(Error::Interrupted)
        }
    }

    /// Sleep for `duration`, or less if interrupted.
    pub fn hold(&self, duration: Duration) -> Result<()> {
        self.check()?;
        let deadline = Instant::now() + duration;
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            thread::sleep((deadline - now).min(SLEEP_SLICE));
            self.check()?;
        }
    }
}

// ── Controller ───────────────────────────────────────────────────────

pub struct DisplayController<S: FrameSink, T: TextRenderer> {
    sink: S,
    text: T,
    catalog: GifCatalog,
    rng: StdRng,
    timings: Timings,
    pacer: Pacer,
}

impl<S: FrameSink, T: TextRenderer> DisplayController<S, T> {
    pub fn new(
        sink: S,
        text: T,
        catalog: GifCatalog,
        rng: StdRng,
        timings: Timings,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            sink,
            text,
            catalog,
            rng,
            timings,
            pacer: Pacer::new(running),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn size(&self) -> (u32, u32) {
        (self.sink.width(), self.sink.height())
    }

    fn present(&mut self, frame: &RgbImage) -> Result<()> {
        self.pacer.check()?;
        self.sink.present(frame);
        Ok(())
    }

    pub fn show_blank(&mut self) -> Result<()> {
        let (w, h) = self.size();
        self.present(&blank_frame(w, h))
    }

    /// Present a still once, then hold it.
    pub fn show_still(&mut self, image: &DynamicImage) -> Result<()> {
        tracing::debug!("Displaying still");
        let (w, h) = self.size();
        self.present(&still_frame(image, w, h))?;
        self.pacer.hold(self.timings.still)
    }

    /// Play every frame once in source order, each for its own delay.
    pub fn play_animation(&mut self, frames: Vec<AnimationFrame>) -> Result<()> {
        tracing::debug!("Displaying GIF ({} frames)", frames.len());
        let (w, h) = self.size();
        for frame in frames {
            let scaled = scale_to_fit(&DynamicImage::ImageRgba8(frame.image), w, h);
            self.present(&compose(&scaled, w, h))?;
            self.pacer.hold(self.timings.pacing.frame_hold(frame.delay_ms))?;
        }
        Ok(())
    }

    pub fn show_text(&mut self, text: &str, size: f32) -> Result<()> {
        let (w, h) = self.size();
        let frame = self.text.render(text, size, w, h);
        self.present(&frame)
    }

    /// "DAYS", "UNTIL", "XMAS", then the number of days left as of `now`.
    pub fn show_countdown(&mut self, now: NaiveDateTime) -> Result<()> {
        for line in countdown_lines(now)? {
            self.show_text(&line.text, line.size)?;
            let hold = match line.hold {
                Hold::Word => self.timings.word,
                Hold::Number => self.timings.countdown,
            };
            self.pacer.hold(hold)?;
        }
        Ok(())
    }

    /// Blank the panel, then show a file as a still or an animation.
    pub fn show_image(&mut self, path: &Path) -> Result<()> {
        self.show_blank()?;
        tracing::info!("Displaying image: {}", path.display());
        match load_image(path)? {
            LoadedImage::Still(image) => self.show_still(&image),
            LoadedImage::Animated(frames) => self.play_animation(frames),
        }
    }

    pub fn show_random_gif(&mut self) -> Result<()> {
        let path = self.catalog.pick(&mut self.rng)?;
        self.show_image(&path)
    }

    /// One pass of the cycle.
    pub fn cycle_once(&mut self) -> Result<()> {
        self.show_blank()?;
        self.show_countdown(Local::now().naive_local())?;
        self.show_random_gif()
    }

    /// Cycle until interrupted.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!(
            "Starting playback: {} GIFs in {}",
            self.catalog.names().len(),
            self.catalog.dir().display()
        );
        let result = loop {
            if let Err(e) = self.cycle_once() {
                break e;
            }
        };
        self.finish(result)
    }

    /// Colour pulse until interrupted.
    pub fn run_pulse(&mut self) -> Result<()> {
        tracing::info!("Pulsing colours");
        let mut counter: u32 = 0;
        let result = loop {
            if let Err(e) = self.pulse_step(&mut counter) {
                break e;
            }
        };
        self.finish(result)
    }

    fn pulse_step(&mut self, counter: &mut u32) -> Result<()> {
        self.pacer.hold(self.timings.pulse_tick)?;
        *counter = (*counter + 1) % PULSE_PERIOD;
        self.pacer.check()?;
        self.sink.fill(pulse_color(*counter));
        Ok(())
    }

    /// Turn an interrupt into a clean stop on a blank panel.
    fn finish(&mut self, error: Error) -> Result<()> {
        if !error.is_interrupted() {
            return Err(error);
        }
        let (w, h) = self.size();
        self.sink.present(&blank_frame(w, h));
        tracing::info!("Interrupted, display cleared");
        Ok(())
    }
}
