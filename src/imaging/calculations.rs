//! Pure dimension math, unit testable without decoding anything.

use super::backend::Dimensions;

/// Longest edge of a micro-thumbnail sample. The thumbhash encoder rejects
/// anything larger.
pub const MICRO_THUMBNAIL_EDGE: u32 = 100;

/// Scale `original` uniformly so its longer edge becomes
/// [`MICRO_THUMBNAIL_EDGE`], rounding each side to the nearest pixel.
///
/// Sides never round down to zero: a 1×1000 sliver becomes 1×100.
pub fn micro_thumbnail_dimensions(original: Dimensions) -> Dimensions {
    let scale = MICRO_THUMBNAIL_EDGE as f64 / original.longer_edge() as f64;
    let scaled = |side: u32| ((side as f64 * scale).round() as u32).max(1);
    Dimensions {
        width: scaled(original.width),
        height: scaled(original.height),
    }
}
