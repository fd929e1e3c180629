//! Pure Rust image processing backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Format sniffing | `ImageReader::with_guessed_format` (magic bytes, not file names) |
//! | Identify | `ImageReader::into_dimensions` (header only, no full decode) |
//! | Decode (JPEG, PNG, TIFF, WebP, GIF) | `image` crate (pure Rust decoders) |
//! | Cover resize | `image::DynamicImage::resize_to_fill` with `Lanczos3` |
//! | Force alpha + raw samples | `DynamicImage::to_rgba8` + `into_raw` |

use super::backend::{BackendError, Dimensions, ImageBackend, RgbaBuffer};
use super::params::SampleParams;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, Limits};
use std::io::Cursor;

/// Largest accepted edge, in pixels.
const MAX_IMAGE_DIMENSION: u32 = 16384;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn reader(data: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, BackendError> {
    let mut reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_IMAGE_DIMENSION);
    limits.max_image_height = Some(MAX_IMAGE_DIMENSION);
    reader.limits(limits);
    Ok(reader)
}

/// Decode the full upload.
fn load_image(data: &[u8]) -> Result<DynamicImage, BackendError> {
    reader(data)?
        .decode()
        .map_err(|e| BackendError::InvalidImage(format!("Failed to decode image: {e}")))
}

impl ImageBackend for RustBackend {
    fn identify(&self, data: &[u8]) -> Result<Dimensions, BackendError> {
        let (width, height) = reader(data)?.into_dimensions().map_err(|e| {
            BackendError::InvalidImage(format!("Failed to read dimensions: {e}"))
        })?;
        if width == 0 || height == 0 {
            return Err(BackendError::InvalidImage(format!(
                "Image reports empty dimensions {width}x{height}"
            )));
        }
        Ok(Dimensions { width, height })
    }

    fn sample(&self, data: &[u8], params: &SampleParams) -> Result<RgbaBuffer, BackendError> {
        if !params.is_valid() {
            return Err(BackendError::ProcessingFailed(format!(
                "Cannot sample to {}x{}",
                params.width, params.height
            )));
        }
        let img = load_image(data)?;

        // Fill-resize then center-crop to exact dimensions
        let filled = img.resize_to_fill(params.width, params.height, FilterType::Lanczos3);
        let rgba = filled.to_rgba8();
        if rgba.as_raw().len() != params.rgba_len() {
            return Err(BackendError::ProcessingFailed(format!(
                "Resize produced {}x{}, wanted {}x{}",
                rgba.width(),
                rgba.height(),
                params.width,
                params.height
            )));
        }

        Ok(RgbaBuffer {
            width: rgba.width(),
            height: rgba.height(),
            pixels: rgba.into_raw(),
        })
    }
}
