//! Placeholder algorithms and the registry that dispatches to them.
//!
//! Every algorithm is a pure function `(image bytes, validated options) ->
//! placeholder string`, paired with an options schema. The [`Registry`] maps
//! an [`AlgorithmName`] to that pair, validates caller-supplied
//! [`RawOptions`] against the matched schema, and invokes the algorithm.
//!
//! | Algorithm | Options | Output |
//! |---|---|---|
//! | [`blurhash`](AlgorithmName::Blurhash) (default) | `width`, `height`, `componentX`, `componentY` | base83 BlurHash |
//! | [`thumbhash`](AlgorithmName::Thumbhash) | none | base64 ThumbHash |
//!
//! ## Schema/function consistency
//!
//! [`PlaceholderAlgorithm`] ties the schema type and the encoder's parameter
//! type together through one associated type, and [`AlgorithmEntry::of`] only
//! ever parses `A::Options` to hand it to `A::encode`. An algorithm whose
//! schema produced anything other than what its encoder accepts does not
//! compile.
//!
//! ## Dispatch order
//!
//! 1. Resolve the name, else [`PlaceholderError::UnknownAlgorithm`] (no
//!    validation attempted).
//! 2. Parse options, else [`PlaceholderError::InvalidOptions`] (the encoder
//!    is never called).
//! 3. Encode; failures come back unchanged.

pub mod blurhash;
pub mod options;
pub mod thumbhash;

pub use self::blurhash::{Blurhash, BlurhashOptions};
pub use self::thumbhash::{Thumbhash, ThumbhashOptions};
pub use options::{
    FieldIssue, OptionField, OptionSchema, OptionValidationError, RawOptions, unknown_keys,
};

use crate::imaging::{BackendError, ImageBackend, RustBackend};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaceholderError {
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),
    #[error("Invalid {algorithm} options: {source}")]
    InvalidOptions {
        algorithm: AlgorithmName,
        #[source]
        source: OptionValidationError,
    },
    #[error("Invalid image: {0}")]
    InvalidImage(String),
    #[error("Image processing failed: {0}")]
    Imaging(BackendError),
    #[error("Encoder failed: {0}")]
    Encoder(String),
}

impl From<BackendError> for PlaceholderError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::InvalidImage(msg) => Self::InvalidImage(msg),
            other => Self::Imaging(other),
        }
    }
}

/// Closed set of algorithm identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum AlgorithmName {
    #[default]
    Blurhash,
    Thumbhash,
}

/// Algorithm used when configuration names none.
pub const DEFAULT_ALGORITHM: AlgorithmName = AlgorithmName::Blurhash;

impl AlgorithmName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blurhash => "blurhash",
            Self::Thumbhash => "thumbhash",
        }
    }
}

impl fmt::Display for AlgorithmName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An image-to-placeholder encoding with its own options schema.
pub trait PlaceholderAlgorithm {
    const NAME: AlgorithmName;
    type Options: OptionSchema + fmt::Debug;

    fn encode(
        backend: &dyn ImageBackend,
        data: &[u8],
        options: &Self::Options,
    ) -> Result<String, PlaceholderError>;
}

type ValidateFn = fn(&RawOptions) -> Result<(), OptionValidationError>;
type RunFn = fn(&dyn ImageBackend, &[u8], &RawOptions) -> Result<String, PlaceholderError>;

/// One registry slot: a name, its schema, and its encoder.
#[derive(Clone, Copy)]
pub struct AlgorithmEntry {
    pub name: AlgorithmName,
    pub fields: &'static [OptionField],
    validate: ValidateFn,
    run: RunFn,
}

fn validate_with<A: PlaceholderAlgorithm>(raw: &RawOptions) -> Result<(), OptionValidationError> {
    A::Options::parse(raw).map(|_| ())
}

fn run_with<A: PlaceholderAlgorithm>(
    backend: &dyn ImageBackend,
    data: &[u8],
    raw: &RawOptions,
) -> Result<String, PlaceholderError> {
    let options = A::Options::parse(raw).map_err(|source| PlaceholderError::InvalidOptions {
        algorithm: A::NAME,
        source,
    })?;
    log::debug!("{}: encoding {} bytes with {:?}", A::NAME, data.len(), options);
    A::encode(backend, data, &options)
}

impl AlgorithmEntry {
    pub const fn of<A: PlaceholderAlgorithm>() -> Self {
        Self {
            name: A::NAME,
            fields: <A::Options as OptionSchema>::FIELDS,
            validate: validate_with::<A>,
            run: run_with::<A>,
        }
    }

    /// Validate options without encoding anything. Keys outside the schema
    /// are ignored with a warning.
    pub fn validate(&self, raw: &RawOptions) -> Result<(), PlaceholderError> {
        (self.validate)(raw).map_err(|source| PlaceholderError::InvalidOptions {
            algorithm: self.name,
            source,
        })?;
        let ignored = self.ignored_keys(raw);
        if !ignored.is_empty() {
            log::warn!("{}: ignoring unknown options {}", self.name, ignored.join(", "));
        }
        Ok(())
    }

    /// Keys of `raw` this algorithm's schema does not declare.
    pub fn ignored_keys<'r>(&self, raw: &'r RawOptions) -> Vec<&'r str> {
        unknown_keys(raw, |key| self.fields.iter().any(|f| f.name == key))
    }

    /// Validate options, then encode.
    pub fn run(
        &self,
        backend: &dyn ImageBackend,
        data: &[u8],
        raw: &RawOptions,
    ) -> Result<String, PlaceholderError> {
        (self.run)(backend, data, raw)
    }
}

impl fmt::Debug for AlgorithmEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmEntry")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

static BUILTIN: [AlgorithmEntry; 2] = [
    AlgorithmEntry::of::<Blurhash>(),
    AlgorithmEntry::of::<Thumbhash>(),
];

/// Immutable name → algorithm table. Cheap to copy, safe to share.
#[derive(Debug, Clone, Copy)]
pub struct Registry {
    entries: &'static [AlgorithmEntry],
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Registry {
    /// Every algorithm this crate ships.
    pub fn builtin() -> Self {
        Self::new(&BUILTIN)
    }

    /// A registry over a custom table. Names must be unique.
    pub const fn new(entries: &'static [AlgorithmEntry]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [AlgorithmEntry] {
        self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = AlgorithmName> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    /// Look up `name`, or the default algorithm when `None`.
    pub fn resolve(&self, name: Option<&str>) -> Result<&'static AlgorithmEntry, PlaceholderError> {
        let name = name.unwrap_or(DEFAULT_ALGORITHM.as_str());
        self.entries
            .iter()
            .find(|e| e.name.as_str() == name)
            .ok_or_else(|| PlaceholderError::UnknownAlgorithm(name.to_string()))
    }

    /// Resolve and validate without encoding. Used at configuration time so
    /// mistakes surface before the first upload.
    pub fn check(
        &self,
        name: Option<&str>,
        raw: &RawOptions,
    ) -> Result<AlgorithmName, PlaceholderError> {
        let entry = self.resolve(name)?;
        entry.validate(raw)?;
        Ok(entry.name)
    }

    /// Resolve `name`, validate `raw` against its schema, and encode `data`.
    pub fn dispatch(
        &self,
        backend: &dyn ImageBackend,
        name: Option<&str>,
        data: &[u8],
        raw: &RawOptions,
    ) -> Result<String, PlaceholderError> {
        self.resolve(name)?.run(backend, data, raw)
    }
}

/// Encode `data` with the built-in registry and the `image`-crate backend.
pub fn dispatch(name: Option<&str>, data: &[u8], raw: &RawOptions) -> Result<String, PlaceholderError> {
    Registry::builtin().dispatch(&RustBackend::new(), name, data, raw)
}
