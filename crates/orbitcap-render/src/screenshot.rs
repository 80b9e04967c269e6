//! Writing captured frames to image files.

use std::path::Path;

use image::{ImageFormat, RgbImage};

use crate::framebuffer::{Framebuffer, RowOrigin};

/// Picks the output format from the file extension.
pub(crate) fn format_for(path: &Path) -> Result<ImageFormat, ScreenshotError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "png" => Ok(ImageFormat::Png),
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        _ => Err(ScreenshotError::UnsupportedFormat(extension)),
    }
}

/// Saves a top-down RGB frame to an image file.
///
/// # Arguments
/// * `path` - Output filename (supports .png, .jpg, .jpeg)
/// * `frame` - Frame with [`RowOrigin::TopDown`] row order
///
/// # Errors
/// Returns an error if the frame is still bottom-up, the extension is not
/// supported, or the file cannot be written.
pub fn save_image(path: &Path, frame: &Framebuffer) -> Result<(), ScreenshotError> {
    if frame.origin() != RowOrigin::TopDown {
        return Err(ScreenshotError::BottomUpRows);
    }
    let format = format_for(path)?;

    let img = RgbImage::from_raw(frame.width(), frame.height(), frame.pixels().to_vec())
        .ok_or(ScreenshotError::InvalidImageData)?;
    img.save_with_format(path, format)?;

    Ok(())
}

/// Error type for screenshot operations.
#[derive(Debug, thiserror::Error)]
pub enum ScreenshotError {
    #[error("Failed to save image: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid image data")]
    InvalidImageData,

    #[error("Frame rows are bottom-up; flip before encoding")]
    BottomUpRows,
}
