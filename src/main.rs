//! Christmas countdown matrix player
//!
//! Cycles a 64×64 RGB LED panel through a "DAYS UNTIL XMAS" countdown and a
//! random GIF from the image directory, or runs the colour pulse on its own.
//! Ctrl+C blanks the panel and exits 0.
//!
//! ## Usage
//! ```sh
//! sudo ./target/release/xmas-matrix --images-dir images --font fonts/Roboto-Medium.ttf
//! sudo ./target/release/xmas-matrix pulse
//! ```

#[cfg(not(feature = "hardware"))]
fn main() {
    eprintln!("This binary requires the 'hardware' feature (rpi-led-matrix).");
    eprintln!("Build with: cargo build --release");
    eprintln!("Tests can run without it: cargo test --no-default-features");
    std::process::exit(1);
}

#[cfg(feature = "hardware")]
fn main() -> std::process::ExitCode {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_ansi(false) // Disable ANSI color codes for systemd/journald
        .compact()
        .init();

    match hardware_main() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "hardware")]
fn hardware_main() -> xmas_matrix::Result<()> {
    use clap::{Parser, ValueEnum};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::path::PathBuf;
    use std::time::Duration;
    use xmas_matrix::controller::{DisplayController, Timings};
    use xmas_matrix::media::GifCatalog;
    use xmas_matrix::render::FramePacing;
    use xmas_matrix::sink::LedMatrixSink;
    use xmas_matrix::text::TextFont;
    use xmas_matrix::{MatrixOptions, create_matrix, setup_signal_handler};

    #[derive(Clone, Copy, ValueEnum)]
    enum Mode {
        /// Countdown, then a random GIF, forever
        Cycle,
        /// Colour pulse only
        Pulse,
    }

    /// Christmas countdown and GIF player for an RGB LED matrix
    #[derive(Parser)]
    #[command(name = "xmas-matrix")]
    #[command(version)]
    struct Args {
        /// What to show
        #[arg(value_enum, default_value = "cycle")]
        mode: Mode,

        /// Directory scanned for .gif files
        #[arg(long, default_value = "images")]
        images_dir: PathBuf,

        /// TrueType font for the countdown
        #[arg(long, default_value = "fonts/Roboto-Medium.ttf")]
        font: PathBuf,

        /// Number of rows on the LED panel
        #[arg(long, default_value = "64")]
        rows: u32,

        /// Number of columns on the LED panel
        #[arg(long, default_value = "64")]
        cols: u32,

        /// How long the day count stays up, in seconds
        #[arg(long, default_value = "120")]
        countdown_secs: u64,

        /// How long a still image stays up, in seconds
        #[arg(long, default_value = "3")]
        still_secs: u64,

        /// Hold GIF frames for their exact delay instead of whole seconds
        #[arg(long)]
        exact_frame_timing: bool,

        /// Seed for GIF selection (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
    }

    let args = Args::parse();
    let options = MatrixOptions::with_size(args.rows, args.cols);

    tracing::info!("xmas-matrix v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Panel: {}x{}", options.cols, options.rows);
    tracing::info!("Images dir: {}", args.images_dir.display());
    tracing::info!("Font: {}", args.font.display());

    let catalog = GifCatalog::scan(&args.images_dir)?;
    tracing::info!("Found {} GIFs", catalog.names().len());
    let font = TextFont::open(&args.font)?;

    let timings = Timings {
        still: Duration::from_secs(args.still_secs),
        countdown: Duration::from_secs(args.countdown_secs),
        pacing: if args.exact_frame_timing {
            FramePacing::Exact
        } else {
            FramePacing::TruncatedSeconds
        },
        ..Timings::default()
    };

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let running = setup_signal_handler()?;
    let sink = LedMatrixSink::new(create_matrix(&options)?);
    let mut controller = DisplayController::new(sink, font, catalog, rng, timings, running);

    match args.mode {
        Mode::Cycle => controller.run()?,
        Mode::Pulse => controller.run_pulse()?,
    }

    tracing::info!("Shutting down cleanly.");
    Ok(())
}
