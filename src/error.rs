use chrono::NaiveDateTime;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop the display.
///
/// `Interrupted` is not a fault: it is raised by holds and presents once the
/// running flag clears, and the playback loop turns it into a clean exit.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("font error: {0}")]
    Font(String),

    #[error("hardware error: {0}")]
    Hardware(String),

    #[error("no .gif files found in {}", .0.display())]
    EmptyCatalog(PathBuf),

    #[error("no Christmas after {0} fits in the calendar")]
    CalendarOverflow(NaiveDateTime),

    #[error("signal handler error: {0}")]
    Signal(String),

    #[error("interrupted")]
    Interrupted,
}

impl Error {
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    pub fn hardware(msg: impl Into<String>) -> Self {
        Self::Hardware(msg.into())
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
}
