//! Coefficient-grid placeholder ([BlurHash](https://blurha.sh/)).
//!
//! The upload is cover-resized to a small fixed grid (32×32 by default),
//! given an alpha channel, and the raw RGBA samples are compressed into
//! `componentX × componentY` DCT coefficients encoded as base83 text.

use super::options::{FieldReader, OptionField, OptionSchema, OptionValidationError, RawOptions};
use super::{AlgorithmName, PlaceholderAlgorithm, PlaceholderError};
use crate::imaging::{ImageBackend, MAX_SAMPLE_EDGE, SampleParams};

/// The encoder only supports 1–9 components per axis.
const COMPONENT_RANGE: std::ops::RangeInclusive<u32> = 1..=9;

pub struct Blurhash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlurhashOptions {
    /// Sample grid width in pixels.
    pub width: u32,
    /// Sample grid height in pixels.
    pub height: u32,
    /// Horizontal DCT components.
    pub component_x: u32,
    /// Vertical DCT components.
    pub component_y: u32,
}

impl Default for BlurhashOptions {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
            component_x: 3,
            component_y: 3,
        }
    }
}

impl OptionSchema for BlurhashOptions {
    const FIELDS: &'static [OptionField] = &[
        OptionField {
            name: "width",
            default: "32",
            description: "Sample grid width in pixels (1-1024)",
        },
        OptionField {
            name: "height",
            default: "32",
            description: "Sample grid height in pixels (1-1024)",
        },
        OptionField {
            name: "componentX",
            default: "3",
            description: "Horizontal components (1-9)",
        },
        OptionField {
            name: "componentY",
            default: "3",
            description: "Vertical components (1-9)",
        },
    ];

    fn parse(raw: &RawOptions) -> Result<Self, OptionValidationError> {
        let defaults = Self::default();
        let mut reader = FieldReader::new(raw);
        let options = Self {
            width: reader.u32_or("width", defaults.width, 1..=MAX_SAMPLE_EDGE),
            height: reader.u32_or("height", defaults.height, 1..=MAX_SAMPLE_EDGE),
            component_x: reader.u32_or("componentX", defaults.component_x, COMPONENT_RANGE),
            component_y: reader.u32_or("componentY", defaults.component_y, COMPONENT_RANGE),
        };
        reader.finish(options)
    }
}

impl PlaceholderAlgorithm for Blurhash {
    const NAME: AlgorithmName = AlgorithmName::Blurhash;
    type Options = BlurhashOptions;

    fn encode(
        backend: &dyn ImageBackend,
        data: &[u8],
        options: &BlurhashOptions,
    ) -> Result<String, PlaceholderError> {
        let sample = backend.sample(data, &SampleParams::new(options.width, options.height))?;
        log::trace!(
            "blurhash: {}x{} sample, {}x{} components",
            sample.width,
            sample.height,
            options.component_x,
            options.component_y
        );

        ::blurhash::encode(
            options.component_x,
            options.component_y,
            sample.width,
            sample.height,
            &sample.pixels,
        )
        .map_err(|e| PlaceholderError::Encoder(format!("blurhash: {e}")))
    }
}
