//! Media on disk: the GIF catalog and image loading.
//!
//! ## Catalog
//! The image directory is scanned once at startup for `.gif` files. One is
//! picked uniformly at random per playback cycle.
//!
//! ## Loading
//! GIFs always decode as animations, even single-frame ones, so every GIF is
//! played at its authored pace. Anything else is a still.

use crate::{Error, Result};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, Frame, ImageFormat, ImageReader, RgbaImage};
use rand::Rng;
use rand::seq::IndexedRandom;
use std::fs;
use std::path::{Path, PathBuf};

// ── Catalog ──────────────────────────────────────────────────────────

/// The playable GIFs found in one directory.
#[derive(Clone, Debug)]
pub struct GifCatalog {
    dir: PathBuf,
    names: Vec<String>,
}

impl GifCatalog {
    /// Scan `dir` for regular files whose name ends in `.gif`.
    ///
    /// The suffix match is case-sensitive. An unreadable directory or one
    /// with no GIFs is an error.
    pub fn scan(dir: &Path) -> Result<Self> {
        let mut names = Vec::new();

        for entry in fs::read_dir(dir)?.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.ends_with(".gif") {
                    names.push(name.to_string());
                }
            }
        }

        if names.is_empty() {
            return Err(Error::EmptyCatalog(dir.to_path_buf()));
        }

        names.sort();
        Ok(Self {
            dir: dir.to_path_buf(),
            names,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File names, sorted.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Full path of a uniformly random entry.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<PathBuf> {
        self.names
            .choose(rng)
            .map(|name| self.dir.join(name))
            .ok_or_else(|| Error::EmptyCatalog(self.dir.clone()))
    }
}

// ── Loading ──────────────────────────────────────────────────────────

/// One decoded animation frame at the source's full canvas size.
#[derive(Clone, Debug)]
pub struct AnimationFrame {
    pub image: RgbaImage,
    pub delay_ms: u32,
}

impl From<Frame> for AnimationFrame {
    fn from(frame: Frame) -> Self {
        let (numer, denom) = frame.delay().numer_denom_ms();
        Self {
            delay_ms: numer / denom.max(1),
            image: frame.into_buffer(),
        }
    }
}

/// A decoded image, still or animated, decided once at load time.
///
/// Rust concept: ENUMS WITH DATA
/// Each variant carries what its renderer needs, and `match` forces the
/// caller to handle both.
pub enum LoadedImage {
    Still(DynamicImage),
    Animated(Vec<AnimationFrame>),
}

/// Open and fully decode an image file.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;

    match reader.format() {
        Some(ImageFormat::Gif) => {
            let decoder = GifDecoder::new(reader.into_inner())?;
            let frames = decoder.into_frames().collect_frames()?;
            Ok(LoadedImage::Animated(
                frames.into_iter().map(AnimationFrame::from).collect(),
            ))
        }
        _ => Ok(LoadedImage::Still(reader.decode()?)),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::codecs::gif::GifEncoder;
    use image::{Delay, Rgb, RgbImage, Rgba};
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;
    use std::fs::File;
    use tempfile::TempDir;

    fn create_file(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"fake").unwrap();
    }

    /// Write a GIF whose frames are solid `colors`, each with `delay_ms`.
    pub(crate) fn write_gif(path: &Path, size: u32, colors: &[[u8; 3]], delay_ms: u32) {
        let file = File::create(path).unwrap();
        let mut encoder = GifEncoder::new(file);
        let frames = colors.iter().map(|&[r, g, b]| {
            Frame::from_parts(
                RgbaImage::from_pixel(size, size, Rgba([r, g, b, 255])),
                0,
                0,
                Delay::from_numer_denom_ms(delay_ms, 1),
            )
        });
        encoder.encode_frames(frames).unwrap();
    }

    // ── Catalog tests ────────────────────────────────────────────────

    #[test]
    fn scan_finds_only_gif_files() {
        let tmp = TempDir::new().unwrap();
        create_file(tmp.path(), "b.gif");
        create_file(tmp.path(), "a.gif");
        create_file(tmp.path(), "photo.png");
        create_file(tmp.path(), "upper.GIF");
        create_file(tmp.path(), "gif");
        std::fs::create_dir(tmp.path().join("folder.gif")).unwrap();

        let catalog = GifCatalog::scan(tmp.path()).unwrap();
        assert_eq!(catalog.names(), ["a.gif", "b.gif"]);
    }

    #[test]
    fn scan_rejects_directory_without_gifs() {
        let tmp = TempDir::new().unwrap();
        create_file(tmp.path(), "readme.txt");

        let err = GifCatalog::scan(tmp.path()).unwrap_err();
        assert!(matches!(err, Error::EmptyCatalog(dir) if dir == tmp.path()));
    }

    #[test]
    fn scan_propagates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let err = GifCatalog::scan(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn pick_is_uniform_enough_and_stays_in_catalog() {
        let tmp = TempDir::new().unwrap();
        create_file(tmp.path(), "a.gif");
        create_file(tmp.path(), "b.gif");
        let catalog = GifCatalog::scan(tmp.path()).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            let path = catalog.pick(&mut rng).unwrap();
            assert_eq!(path.parent(), Some(tmp.path()));
            let name = path.file_name().unwrap().to_str().unwrap().to_string();
            assert!(catalog.names().contains(&name), "picked {name}");
            seen.insert(name);
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn pick_is_reproducible_with_same_seed() {
        let tmp = TempDir::new().unwrap();
        for name in ["a.gif", "b.gif", "c.gif", "d.gif"] {
            create_file(tmp.path(), name);
        }
        let catalog = GifCatalog::scan(tmp.path()).unwrap();

        let mut first = ChaCha8Rng::seed_from_u64(7);
        let mut second = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            assert_eq!(
                catalog.pick(&mut first).unwrap(),
                catalog.pick(&mut second).unwrap()
            );
        }
    }

    // ── Loading tests ────────────────────────────────────────────────

    #[test]
    fn gif_loads_as_animation_in_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("anim.gif");
        write_gif(&path, 8, &[[255, 0, 0], [0, 255, 0], [0, 0, 255]], 100);

        let LoadedImage::Animated(frames) = load_image(&path).unwrap() else {
            panic!("gif loaded as a still");
        };
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].image.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(frames[1].image.get_pixel(0, 0), &Rgba([0, 255, 0, 255]));
        assert_eq!(frames[2].image.get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
        assert!(frames.iter().all(|f| f.delay_ms == 100));
    }

    #[test]
    fn single_frame_gif_is_still_an_animation() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("one.gif");
        write_gif(&path, 4, &[[9, 9, 9]], 2500);

        let LoadedImage::Animated(frames) = load_image(&path).unwrap() else {
            panic!("gif loaded as a still");
        };
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].delay_ms, 2500);
    }

    #[test]
    fn gif_is_recognised_by_content_not_name() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("anim.bin");
        write_gif(&path, 8, &[[1, 2, 3], [4, 5, 6]], 40);

        let LoadedImage::Animated(frames) = load_image(&path).unwrap() else {
            panic!("gif loaded as a still");
        };
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].image.get_pixel(7, 7), &Rgba([4, 5, 6, 255]));
    }

    #[test]
    fn png_loads_as_still() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("still.png");
        RgbImage::from_pixel(10, 5, Rgb([1, 2, 3])).save(&path).unwrap();

        let LoadedImage::Still(img) = load_image(&path).unwrap() else {
            panic!("png loaded as an animation");
        };
        assert_eq!(img.width(), 10);
        assert_eq!(img.height(), 5);
    }

    #[test]
    fn missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(load_image(&tmp.path().join("gone.gif")).is_err());
    }
}
