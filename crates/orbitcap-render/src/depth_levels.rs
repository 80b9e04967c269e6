//! Contrast normalization for depth captures.
//!
//! A depth pass comes out of the renderer with a narrow intensity band. The
//! written file is reduced to one luminance channel and stretched so its
//! darkest sample becomes 0 and its brightest 255.

use std::path::Path;

use image::{DynamicImage, GrayImage};

use crate::screenshot::{format_for, ScreenshotError};

/// Luma weights applied to R, G and B.
pub const LUMA_WEIGHTS: [f64; 3] = [0.2989, 0.5870, 0.1140];

/// Range found in an image before rescaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelStats {
    /// Smallest luminance sample.
    pub min: f64,
    /// Largest luminance sample.
    pub max: f64,
}

impl LevelStats {
    /// True when every sample has the same value.
    #[must_use]
    pub fn is_uniform(&self) -> bool {
        self.max <= self.min
    }
}

/// Reduces an image to one luminance sample per pixel, row-major.
///
/// Color images use [`LUMA_WEIGHTS`] on their first three channels;
/// grayscale images are taken as-is.
#[must_use]
pub fn luminance(img: &DynamicImage) -> Vec<f64> {
    if img.color().has_color() {
        img.to_rgb8()
            .pixels()
            .map(|p| {
                f64::from(p[0]) * LUMA_WEIGHTS[0]
                    + f64::from(p[1]) * LUMA_WEIGHTS[1]
                    + f64::from(p[2]) * LUMA_WEIGHTS[2]
            })
            .collect()
    } else {
        img.to_luma8().pixels().map(|p| f64::from(p[0])).collect()
    }
}

/// Stretches `samples` to 0..=255.
///
/// Each sample maps to `(v - min) / (max - min) * 255`, truncated. When all
/// samples are equal there is no range to stretch and every output is
/// `uniform_fill`.
#[must_use]
pub fn stretch_levels(samples: &[f64], uniform_fill: u8) -> (Vec<u8>, LevelStats) {
    let (min, max) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let stats = if samples.is_empty() {
        LevelStats { min: 0.0, max: 0.0 }
    } else {
        LevelStats { min, max }
    };

    if stats.is_uniform() {
        return (vec![uniform_fill; samples.len()], stats);
    }

    let range = stats.max - stats.min;
    let levels = samples
        .iter()
        .map(|&v| ((v - stats.min) / range * 255.0) as u8)
        .collect();
    (levels, stats)
}

/// Normalizes the depth image at `path` in place.
///
/// The file is overwritten as a single-channel 8-bit image in the format
/// implied by its extension.
pub fn auto_level_file(path: &Path, uniform_fill: u8) -> Result<LevelStats, ScreenshotError> {
    let format = format_for(path)?;
    let img = image::open(path)?;
    let (width, height) = (img.width(), img.height());

    let samples = luminance(&img);
    let (levels, stats) = stretch_levels(&samples, uniform_fill);
    if stats.is_uniform() {
        log::warn!(
            "depth image {} has no depth range (value {}), filled with {uniform_fill}",
            path.display(),
            stats.min
        );
    }

    let gray = GrayImage::from_raw(width, height, levels).ok_or(ScreenshotError::InvalidImageData)?;
    gray.save_with_format(path, format)?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use image::{Rgb, RgbImage};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("orbitcap_{}_{name}", std::process::id()))
    }

    #[test]
    fn test_stretch_hits_full_range() {
        let samples = [40.0, 50.0, 60.0, 80.0];
        let (levels, stats) = stretch_levels(&samples, 0);
        assert_eq!(stats, LevelStats { min: 40.0, max: 80.0 });
        assert_eq!(levels, vec![0, 63, 127, 255]);
    }

    #[test]
    fn test_uniform_input_uses_fill() {
        let (levels, stats) = stretch_levels(&[7.0; 5], 0);
        assert!(stats.is_uniform());
        assert_eq!(levels, vec![0; 5]);

        let (levels, _) = stretch_levels(&[7.0; 3], 128);
        assert_eq!(levels, vec![128; 3]);
    }

    #[test]
    fn test_empty_input() {
        let (levels, stats) = stretch_levels(&[], 0);
        assert!(levels.is_empty());
        assert!(stats.min.is_finite() && stats.max.is_finite());
    }

    #[test]
    fn test_luminance_weights() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([100, 0, 0]));
        img.put_pixel(1, 0, Rgb([10, 20, 30]));
        let lum = luminance(&DynamicImage::ImageRgb8(img));
        assert!((lum[0] - 29.89).abs() < 1e-9);
        assert!((lum[1] - (2.989 + 11.74 + 3.42)).abs() < 1e-9);
    }

    #[test]
    fn test_auto_level_file_rgb() {
        let path = temp_path("depth_rgb.png");
        let mut img = RgbImage::new(3, 2);
        for (x, y, px) in img.enumerate_pixels_mut() {
            let v = 30 + (x + 3 * y) as u8 * 10;
            *px = Rgb([v, v, v]);
        }
        img.save(&path).expect("write");

        let stats = auto_level_file(&path, 0).expect("auto level");
        let out = image::open(&path).expect("read");
        let _ = std::fs::remove_file(&path);

        assert!(!stats.is_uniform());
        assert_eq!(out.color(), image::ColorType::L8);
        let gray = out.to_luma8();
        let min = gray.pixels().map(|p| p[0]).min();
        let max = gray.pixels().map(|p| p[0]).max();
        assert_eq!(min, Some(0));
        assert_eq!(max, Some(255));
    }

    #[test]
    fn test_auto_level_file_uniform_black() {
        let path = temp_path("depth_uniform.png");
        RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]))
            .save(&path)
            .expect("write");

        let stats = auto_level_file(&path, 0).expect("auto level");
        let out = image::open(&path).expect("read").to_luma8();
        let _ = std::fs::remove_file(&path);

        assert!(stats.is_uniform());
        assert_eq!(out.dimensions(), (4, 4));
        assert!(out.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_auto_level_file_gray_input() {
        let path = temp_path("depth_gray.png");
        let gray = GrayImage::from_raw(2, 2, vec![10, 20, 30, 110]).expect("gray");
        gray.save(&path).expect("write");

        let _ = auto_level_file(&path, 0).expect("auto level");
        let out = image::open(&path).expect("read").to_luma8();
        let _ = std::fs::remove_file(&path);
        assert_eq!(out.into_raw(), vec![0, 25, 51, 255]);
    }

    proptest! {
        #[test]
        fn prop_stretch_spans_0_to_255(samples in prop::collection::vec(0.0f64..255.0, 2..64)) {
            let (levels, stats) = stretch_levels(&samples, 0);
            prop_assume!(!stats.is_uniform());
            prop_assert_eq!(levels.iter().copied().min(), Some(0));
            prop_assert_eq!(levels.iter().copied().max(), Some(255));
            prop_assert_eq!(levels.len(), samples.len());
        }
    }
}
