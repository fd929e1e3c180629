//! Shared test utilities.
//!
//! Image builders produce real encoded bytes so tests can run the
//! `image`-crate backend end to end; record and host builders give the hook
//! something shaped like what a CMS hands it.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let png = encode_png(&solid_rgb(64, 48, [200, 40, 40]));
//! let req = upload_request(png);
//! let data = image_record("red.png");
//! let host = sample_host_config();
//! ```

use crate::algorithms::RawOptions;
use crate::host::{CollectionConfig, Field, HostConfig, Record, Request, UploadedFile};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use serde_json::{Value, json};
use std::io::Cursor;

// =========================================================================
// Image builders
// =========================================================================

pub fn solid_rgb(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
}

pub fn solid_rgba(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)))
}

/// Encode in `format`. Panics on encoder failure.
pub fn encode_as(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format)
        .unwrap_or_else(|e| panic!("failed to encode test image as {format:?}: {e}"));
    buf.into_inner()
}

pub fn encode_png(img: &DynamicImage) -> Vec<u8> {
    encode_as(img, ImageFormat::Png)
}

// =========================================================================
// Options, records, requests
// =========================================================================

/// Turn a `json!({...})` object into raw algorithm options. Panics on
/// anything but an object.
pub fn raw_options(value: Value) -> RawOptions {
    match value {
        Value::Object(map) => map,
        other => panic!("raw_options expects a JSON object, got {other}"),
    }
}

/// The record a host builds for an uploaded PNG.
pub fn image_record(filename: &str) -> Record {
    raw_options(json!({
        "filename": filename,
        "mimeType": "image/png",
        "filesize": 1024,
        "alt": "test upload",
    }))
}

/// A request carrying `bytes` as an in-memory PNG upload.
pub fn upload_request(bytes: Vec<u8>) -> Request {
    Request::with_file(UploadedFile::buffered("upload.png", "image/png", bytes))
}

// =========================================================================
// Host configuration
// =========================================================================

/// `users` (no uploads), `media` and `documents` (uploads).
pub fn sample_host_config() -> HostConfig {
    let alt = Field {
        name: Some("alt".into()),
        kind: "text".into(),
        admin: None,
        extra: raw_options(json!({ "required": true })),
    };
    HostConfig {
        collections: vec![
            CollectionConfig::new("users"),
            CollectionConfig::new("media").with_upload().with_field(alt),
            CollectionConfig::new("documents").with_upload(),
        ],
        extra: raw_options(json!({ "serverURL": "http://localhost:3000" })),
    }
}

/// Named fields of `slug`, in order. Panics if the collection is missing.
pub fn field_names<'a>(config: &'a HostConfig, slug: &str) -> Vec<&'a str> {
    config
        .collection(slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = config.collections.iter().map(|c| c.slug.as_str()).collect();
            panic!("collection '{slug}' not found. Available: {slugs:?}")
        })
        .fields()
        .iter()
        .filter_map(|f| f.name.as_deref())
        .collect()
}
