// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — alpha flattening, sharpness/contrast/brightness
// enhancement and bounded downscaling, using the `image` crate.
//
// The enhancement operators blend the image with a "degenerate" version of
// itself: a smoothed copy for sharpness, a flat mean-gray image for contrast
// and black for brightness. A factor of 1.0 returns the image unchanged.

use std::path::Path;

use image::imageops::FilterType;
use image::{ColorType, DynamicImage, Rgb, RgbImage};
use tracing::{debug, info, instrument};
use wandler_core::error::WandlerError;

/// Sharpness boost applied before placing an image into a PDF.
pub const SHARPNESS_FACTOR: f32 = 1.1;
/// Contrast boost applied before placing an image into a PDF.
pub const CONTRAST_FACTOR: f32 = 1.05;
/// Brightness boost applied before placing an image into a PDF.
pub const BRIGHTNESS_FACTOR: f32 = 1.02;
/// Default bound on either side of an image placed into a PDF.
pub const MAX_DIMENSION: u32 = 2000;

/// 3x3 smoothing kernel used as the sharpness baseline.
const SMOOTH_KERNEL: [f32; 9] = [1.0, 1.0, 1.0, 1.0, 5.0, 1.0, 1.0, 1.0, 1.0];

/// Image processing pipeline operating on a single in-memory image.
///
/// Each method consumes `self` and returns the transformed processor, so
/// steps chain:
///
/// ```ignore
/// let image = ImageProcessor::open("scan.png")?
///     .flatten_to_rgb()
///     .sharpen(1.1)
///     .thumbnail(2000)
///     .into_dynamic();
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WandlerError> {
        let img = image::open(path.as_ref()).map_err(|err| {
            WandlerError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Pipeline -------------------------------------------------------------

    /// The full preparation applied to every image bound for a PDF: flatten
    /// to RGB, optionally enhance, then shrink to fit `max_dimension`.
    #[instrument(skip(self))]
    pub fn prepare_for_pdf(self, enhance: bool, max_dimension: u32) -> Self {
        let flattened = self.flatten_to_rgb();
        let enhanced = if enhance {
            flattened
                .sharpen(SHARPNESS_FACTOR)
                .adjust_contrast(CONTRAST_FACTOR)
                .adjust_brightness(BRIGHTNESS_FACTOR)
        } else {
            flattened
        };
        enhanced.thumbnail(max_dimension)
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Composite any transparency onto white and convert to 8-bit RGB.
    /// Grayscale and palette images are expanded to RGB.
    pub fn flatten_to_rgb(self) -> Self {
        if !self.image.color().has_alpha() {
            return Self {
                image: DynamicImage::ImageRgb8(self.image.to_rgb8()),
            };
        }

        let rgba = self.image.to_rgba8();
        let flattened = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            let image::Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
            let alpha = a as u32;
            let over_white = |channel: u8| -> u8 {
                ((channel as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8
            };
            Rgb([over_white(r), over_white(g), over_white(b)])
        });
        debug!("Alpha flattened onto white");
        Self {
            image: DynamicImage::ImageRgb8(flattened),
        }
    }

    /// Sharpen by `factor` against a smoothed copy. Images smaller than the
    /// 3x3 kernel are returned unchanged.
    #[instrument(skip(self))]
    pub fn sharpen(self, factor: f32) -> Self {
        let rgb = self.image.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width < 3 || height < 3 {
            return Self {
                image: DynamicImage::ImageRgb8(rgb),
            };
        }

        let mut smoothed = image::imageops::filter3x3(&rgb, &SMOOTH_KERNEL);
        // The smoothing baseline leaves the outermost pixels untouched.
        for x in 0..width {
            smoothed.put_pixel(x, 0, *rgb.get_pixel(x, 0));
            smoothed.put_pixel(x, height - 1, *rgb.get_pixel(x, height - 1));
        }
        for y in 0..height {
            smoothed.put_pixel(0, y, *rgb.get_pixel(0, y));
            smoothed.put_pixel(width - 1, y, *rgb.get_pixel(width - 1, y));
        }

        let sharpened = RgbImage::from_fn(width, height, |x, y| {
            let Rgb(original) = *rgb.get_pixel(x, y);
            let Rgb(baseline) = *smoothed.get_pixel(x, y);
            Rgb([
                blend(baseline[0] as f32, original[0], factor),
                blend(baseline[1] as f32, original[1], factor),
                blend(baseline[2] as f32, original[2], factor),
            ])
        });
        Self {
            image: DynamicImage::ImageRgb8(sharpened),
        }
    }

    /// Scale contrast by `factor` around the image's mean luminance.
    #[instrument(skip(self))]
    pub fn adjust_contrast(self, factor: f32) -> Self {
        let mut rgb = self.image.to_rgb8();
        let mean = mean_luma(&rgb) as f32;
        for pixel in rgb.pixels_mut() {
            for channel in pixel.0.iter_mut() {
                *channel = blend(mean, *channel, factor);
            }
        }
        Self {
            image: DynamicImage::ImageRgb8(rgb),
        }
    }

    /// Scale every channel by `factor`.
    #[instrument(skip(self))]
    pub fn adjust_brightness(self, factor: f32) -> Self {
        let mut rgb = self.image.to_rgb8();
        for pixel in rgb.pixels_mut() {
            for channel in pixel.0.iter_mut() {
                *channel = blend(0.0, *channel, factor);
            }
        }
        Self {
            image: DynamicImage::ImageRgb8(rgb),
        }
    }

    /// Shrink (never enlarge) so both sides fit within `max_dimension`,
    /// preserving aspect ratio. Uses Lanczos3 filtering.
    #[instrument(skip(self))]
    pub fn thumbnail(self, max_dimension: u32) -> Self {
        if self.image.width() <= max_dimension && self.image.height() <= max_dimension {
            return self;
        }
        info!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            max_dimension,
            "Resizing image"
        );
        let resized = self
            .image
            .resize(max_dimension, max_dimension, FilterType::Lanczos3);
        debug!(new_w = resized.width(), new_h = resized.height(), "Resize complete");
        Self { image: resized }
    }
}

/// Short color mode label ("RGB", "RGBA", "L", ...) for a pixel layout.
pub fn color_mode(color: ColorType) -> &'static str {
    match color {
        ColorType::L8 => "L",
        ColorType::La8 => "LA",
        ColorType::Rgb8 => "RGB",
        ColorType::Rgba8 => "RGBA",
        ColorType::L16 => "I;16",
        ColorType::La16 => "LA;16",
        ColorType::Rgb16 => "RGB;16",
        ColorType::Rgba16 => "RGBA;16",
        ColorType::Rgb32F => "RGB;F",
        ColorType::Rgba32F => "RGBA;F",
        _ => "unknown",
    }
}

/// `baseline + factor * (value - baseline)`, rounded and clamped to a byte.
fn blend(baseline: f32, value: u8, factor: f32) -> u8 {
    (baseline + factor * (value as f32 - baseline))
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Mean ITU-R 601 luma of the image, rounded to the nearest integer.
fn mean_luma(rgb: &RgbImage) -> u32 {
    let pixel_count = rgb.width() as u64 * rgb.height() as u64;
    if pixel_count == 0 {
        return 0;
    }
    let total: u64 = rgb
        .pixels()
        .map(|Rgb([r, g, b])| (*r as u64 * 299 + *g as u64 * 587 + *b as u64 * 114) / 1000)
        .sum();
    ((total as f64 / pixel_count as f64) + 0.5) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgba, RgbaImage};

    #[test]
    fn transparent_pixels_become_white() {
        let mut rgba = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 0]));
        rgba.put_pixel(0, 0, Rgba([10, 20, 30, 255]));
        let flattened = ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(rgba))
            .flatten_to_rgb()
            .into_dynamic()
            .to_rgb8();
        assert_eq!(*flattened.get_pixel(0, 0), Rgb([10, 20, 30]));
        assert_eq!(*flattened.get_pixel(3, 3), Rgb([255, 255, 255]));
    }

    #[test]
    fn grayscale_expands_to_rgb() {
        let gray = GrayImage::from_pixel(2, 2, Luma([77]));
        let image = ImageProcessor::from_dynamic(DynamicImage::ImageLuma8(gray))
            .flatten_to_rgb()
            .into_dynamic();
        assert_eq!(color_mode(image.color()), "RGB");
        assert_eq!(*image.to_rgb8().get_pixel(1, 1), Rgb([77, 77, 77]));
    }

    #[test]
    fn thumbnail_only_shrinks() {
        let big = DynamicImage::ImageRgb8(RgbImage::new(4000, 1000));
        let small = ImageProcessor::from_dynamic(big).thumbnail(2000);
        assert_eq!((small.width(), small.height()), (2000, 500));

        let tiny = DynamicImage::ImageRgb8(RgbImage::new(10, 20));
        let same = ImageProcessor::from_dynamic(tiny).thumbnail(2000);
        assert_eq!((same.width(), same.height()), (10, 20));
    }

    #[test]
    fn brightness_scales_channels() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([100, 250, 0])));
        let out = ImageProcessor::from_dynamic(image)
            .adjust_brightness(1.02)
            .into_dynamic()
            .to_rgb8();
        assert_eq!(*out.get_pixel(0, 0), Rgb([102, 255, 0]));
    }

    #[test]
    fn contrast_pushes_away_from_mean() {
        let mut rgb = RgbImage::from_pixel(2, 1, Rgb([100, 100, 100]));
        rgb.put_pixel(1, 0, Rgb([200, 200, 200]));
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(rgb))
            .adjust_contrast(1.5)
            .into_dynamic()
            .to_rgb8();
        // Mean luma is 150.
        assert_eq!(*out.get_pixel(0, 0), Rgb([75, 75, 75]));
        assert_eq!(*out.get_pixel(1, 0), Rgb([225, 225, 225]));
    }

    #[test]
    fn sharpening_a_flat_image_changes_nothing() {
        let flat = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([90, 120, 150])));
        let out = ImageProcessor::from_dynamic(flat.clone())
            .sharpen(SHARPNESS_FACTOR)
            .into_dynamic();
        assert_eq!(out.to_rgb8(), flat.to_rgb8());

        let tiny = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([1, 2, 3])));
        assert_eq!(ImageProcessor::from_dynamic(tiny).sharpen(2.0).width(), 2);
    }

    #[test]
    fn pdf_preparation_bounds_size_and_removes_alpha() {
        let rgba = RgbaImage::from_pixel(2400, 1200, Rgba([0, 0, 0, 128]));
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(rgba))
            .prepare_for_pdf(true, MAX_DIMENSION)
            .into_dynamic();
        assert_eq!((out.width(), out.height()), (2000, 1000));
        assert!(!out.color().has_alpha());
    }
}
