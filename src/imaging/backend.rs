//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations every placeholder
//! algorithm needs: identify (native dimensions) and sample (a small raw RGBA
//! grid).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Algorithms only ever see `&dyn ImageBackend`, so tests substitute
//! the recording [`tests::MockBackend`].

use super::params::SampleParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The buffer is not an image we can read, or its header carries no size.
    #[error("Invalid image: {0}")]
    InvalidImage(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn longer_edge(self) -> u32 {
        self.width.max(self.height)
    }
}

/// Raw, interleaved RGBA8 samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Trait for image processing backends.
///
/// Both operations take the upload's bytes directly. Backends must not retain
/// the buffer past the call.
pub trait ImageBackend: Sync {
    /// Get native image dimensions.
    fn identify(&self, data: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode, cover-resize to exactly the requested grid and return RGBA8.
    fn sample(&self, data: &[u8], params: &SampleParams) -> Result<RgbaBuffer, BackendError>;
}
