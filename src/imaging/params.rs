//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the placeholder [`algorithms`](crate::algorithms) (which
//! decide how large a sample they need) and the [`backend`](super::backend)
//! (which does the actual pixel work). Keeping them separate lets tests swap in
//! a mock backend and inspect exactly which sample an algorithm asked for.

/// Largest sample edge an algorithm may request.
pub const MAX_SAMPLE_EDGE: u32 = 1024;

/// Parameters for a sampling operation: decode, cover-resize to exactly
/// `width × height`, force an alpha channel, return raw RGBA8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleParams {
    pub width: u32,
    pub height: u32,
}

impl SampleParams {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Byte length of the RGBA buffer this sample produces.
    pub fn rgba_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    /// Both edges in `1..=MAX_SAMPLE_EDGE`.
    pub fn is_valid(&self) -> bool {
        let edge = 1..=MAX_SAMPLE_EDGE;
        edge.contains(&self.width) && edge.contains(&self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_len_counts_four_channels() {
        assert_eq!(SampleParams::new(100, 25).rgba_len(), 10_000);
        assert_eq!(SampleParams::new(1, 1).rgba_len(), 4);
    }

    #[test]
    fn validity_bounds_both_edges() {
        assert!(SampleParams::new(1, MAX_SAMPLE_EDGE).is_valid());
        assert!(!SampleParams::new(0, 4).is_valid());
        assert!(!SampleParams::new(4, MAX_SAMPLE_EDGE + 1).is_valid());
    }
}
