//! Aspect-preserving micro-thumbnail placeholder
//! ([ThumbHash](https://evanw.github.io/thumbhash/)).
//!
//! The upload's native size is read first; the image is then scaled so its
//! longer edge is 100px, sampled as RGBA and packed into ThumbHash's binary
//! form, returned as standard base64.

use super::options::{FieldReader, OptionField, OptionSchema, OptionValidationError, RawOptions};
use super::{AlgorithmName, PlaceholderAlgorithm, PlaceholderError};
use crate::imaging::{ImageBackend, SampleParams, micro_thumbnail_dimensions};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

pub struct Thumbhash;

/// ThumbHash takes no options; any key is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThumbhashOptions {}

impl OptionSchema for ThumbhashOptions {
    const FIELDS: &'static [OptionField] = &[];

    fn parse(raw: &RawOptions) -> Result<Self, OptionValidationError> {
        FieldReader::new(raw).finish(Self {})
    }
}

impl PlaceholderAlgorithm for Thumbhash {
    const NAME: AlgorithmName = AlgorithmName::Thumbhash;
    type Options = ThumbhashOptions;

    fn encode(
        backend: &dyn ImageBackend,
        data: &[u8],
        _options: &ThumbhashOptions,
    ) -> Result<String, PlaceholderError> {
        let native = backend.identify(data)?;
        let target = micro_thumbnail_dimensions(native);
        log::trace!(
            "thumbhash: {}x{} -> {}x{}",
            native.width,
            native.height,
            target.width,
            target.height
        );

        let sample = backend.sample(data, &SampleParams::new(target.width, target.height))?;
        let hash = ::thumbhash::rgba_to_thumb_hash(
            sample.width as usize,
            sample.height as usize,
            &sample.pixels,
        );
        Ok(BASE64.encode(hash))
    }
}
