//! # Upload Blurhash
//!
//! A CMS upload plugin that stores a compact image placeholder next to every
//! uploaded picture. Front ends render the placeholder (a blurred gradient or
//! tiny thumbnail) while the real image loads.
//!
//! # Architecture: Configure Once, Hook Every Save
//!
//! ```text
//! 1. Configure  PluginConfig + HostConfig  →  HostConfig'   (fields + hooks added)
//! 2. Save       record + uploaded bytes    →  record'       (blurhash field set)
//! ```
//!
//! Configuration is validated up front: an unknown algorithm, a bad option or
//! a malformed MIME glob fails plugin construction rather than the first
//! upload. After that, each save runs the hook, which either leaves the
//! record alone (wrong MIME type, no in-memory file) or adds exactly one
//! field.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`plugin`] | Configuration transform and the pre-save hook |
//! | [`algorithms`] | Algorithm registry, option schemas, BlurHash and ThumbHash encoders |
//! | [`imaging`] | Pure-Rust decode and resample behind the [`imaging::ImageBackend`] trait |
//! | [`mime`] | MIME-type glob compiled to an anchored regex |
//! | [`config`] | Plugin settings from TOML/JSON, validation, stock config |
//! | [`host`] | The host CMS types the plugin reads and extends |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Schema and Encoder Share One Type
//!
//! Each algorithm declares its options type once, as an associated type on
//! [`algorithms::PlaceholderAlgorithm`]. The registry parses raw options into
//! exactly that type before calling the encoder, so a schema that drifts from
//! its encoder is a compile error.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding and resampling go through the `image` crate. No libvips, no
//! ImageMagick: the plugin links into any host binary without system
//! packages.
//!
//! ## Synchronous Hook
//!
//! Placeholder sampling works on a 32×32 (BlurHash) or ≤100px (ThumbHash)
//! grid, so the hook runs inline on the saving thread. Hosts that want it off
//! their request path can wrap [`plugin::PlaceholderHook`] in their own
//! executor.

pub mod algorithms;
pub mod config;
pub mod host;
pub mod imaging;
pub mod mime;
pub mod output;
pub mod plugin;

pub use algorithms::{AlgorithmName, PlaceholderError, dispatch};
pub use config::PluginConfig;
pub use plugin::{BlurhashPlugin, PLACEHOLDER_FIELD};

#[cfg(test)]
pub(crate) mod test_helpers;
