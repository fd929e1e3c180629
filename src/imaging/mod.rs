//! Image processing: pure Rust, zero system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader::into_dimensions` |
//! | **Sample** | `resize_to_fill` (Lanczos3) + `to_rgba8` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, RgbaBuffer};
pub use calculations::{MICRO_THUMBNAIL_EDGE, micro_thumbnail_dimensions};
pub use params::{MAX_SAMPLE_EDGE, SampleParams};
pub use rust_backend::RustBackend;
