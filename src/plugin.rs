//! Host integration: the pre-save hook and the configuration transform.
//!
//! [`BlurhashPlugin::apply`] takes the host's configuration and returns a new
//! one in which every targeted collection has
//!
//! - one more field: a hidden text field named [`PLACEHOLDER_FIELD`], and
//! - one more `beforeChange` hook, after any it already had.
//!
//! The hook ([`PlaceholderHook`]) runs a linear state machine per save:
//!
//! ```text
//! Filter   mimeType !~ pattern      → record unchanged
//! Extract  no in-memory file bytes  → record unchanged
//! Encode   dispatch(algorithm, bytes, options)
//!          ├── Ok(s)  → record + { blurhash: s }
//!          └── Err(e) → save aborted with e
//! ```
//!
//! Filter and Extract misses are normal: a PDF upload or a host that spooled
//! the file to disk simply gets no placeholder.

use crate::algorithms::{AlgorithmName, PlaceholderError, RawOptions, Registry};
use crate::config::{ConfigError, PluginConfig};
use crate::host::{
    BeforeChangeArgs, BeforeChangeHook, CollectionConfig, Field, HookError, HostConfig, Record,
    Request, UploadedFile,
};
use crate::imaging::{ImageBackend, RustBackend};
use crate::mime::MimePattern;
use serde_json::Value;
use std::sync::Arc;

/// Record field the placeholder is stored under.
pub const PLACEHOLDER_FIELD: &str = "blurhash";

/// Record field holding the upload's declared MIME type.
pub const MIME_TYPE_FIELD: &str = "mimeType";

/// The pre-save interceptor.
pub struct PlaceholderHook {
    mime_pattern: MimePattern,
    algorithm: AlgorithmName,
    options: RawOptions,
    registry: Registry,
    backend: Arc<dyn ImageBackend + Send>,
}

impl PlaceholderHook {
    /// Filter, extract, encode, merge.
    pub fn process(&self, data: Record, req: &Request) -> Result<Record, PlaceholderError> {
        let mime_type = data.get(MIME_TYPE_FIELD).and_then(Value::as_str);
        if !mime_type.is_some_and(|m| self.mime_pattern.matches(m)) {
            log::debug!(
                "skipping placeholder: mime type {mime_type:?} does not match {}",
                self.mime_pattern
            );
            return Ok(data);
        }

        let Some(bytes) = req.file.as_ref().and_then(UploadedFile::buffer) else {
            log::debug!("skipping placeholder: request carries no in-memory file");
            return Ok(data);
        };

        let placeholder = self.registry.dispatch(
            self.backend.as_ref(),
            Some(self.algorithm.as_str()),
            bytes,
            &self.options,
        )?;

        let mut data = data;
        data.insert(PLACEHOLDER_FIELD.to_string(), Value::String(placeholder));
        Ok(data)
    }
}

impl BeforeChangeHook for PlaceholderHook {
    fn before_change(&self, args: BeforeChangeArgs<'_>) -> Result<Record, HookError> {
        Ok(self.process(args.data, args.req)?)
    }
}

/// A configured plugin, ready to be applied to a host configuration.
pub struct BlurhashPlugin {
    collections: Option<Vec<String>>,
    hook: Arc<PlaceholderHook>,
}

impl BlurhashPlugin {
    /// Validate `config` and build the plugin on the `image`-crate backend.
    pub fn new(config: PluginConfig) -> Result<Self, ConfigError> {
        Self::with_backend(config, Arc::new(RustBackend::new()))
    }

    /// Validate `config` and build the plugin on a caller-supplied backend.
    pub fn with_backend(
        config: PluginConfig,
        backend: Arc<dyn ImageBackend + Send>,
    ) -> Result<Self, ConfigError> {
        let registry = Registry::builtin();
        let validated = config.validate(&registry)?;
        Ok(Self {
            collections: validated.collections,
            hook: Arc::new(PlaceholderHook {
                mime_pattern: validated.mime_pattern,
                algorithm: validated.algorithm,
                options: validated.options,
                registry,
                backend,
            }),
        })
    }

    pub fn algorithm(&self) -> AlgorithmName {
        self.hook.algorithm
    }

    /// The hook this plugin installs.
    pub fn hook(&self) -> Arc<dyn BeforeChangeHook> {
        self.hook.clone()
    }

    /// Whether `collection` gets a placeholder field and hook.
    pub fn targets(&self, collection: &CollectionConfig) -> bool {
        collection.accepts_uploads()
            && self
                .collections
                .as_ref()
                .is_none_or(|slugs| slugs.contains(&collection.slug))
    }

    /// Return a copy of `config` with every targeted collection extended.
    /// `config` itself is left as it was.
    pub fn apply(&self, config: &HostConfig) -> HostConfig {
        if let Some(slugs) = &self.collections {
            for slug in slugs {
                match config.collection(slug) {
                    None => log::warn!("placeholder plugin: no collection named {slug:?}"),
                    Some(c) if !c.accepts_uploads() => {
                        log::warn!("placeholder plugin: collection {slug:?} has no uploads")
                    }
                    Some(_) => {}
                }
            }
        }

        HostConfig {
            collections: config
                .collections
                .iter()
                .map(|collection| {
                    if self.targets(collection) {
                        self.extend(collection)
                    } else {
                        collection.clone()
                    }
                })
                .collect(),
            extra: config.extra.clone(),
        }
    }

    fn extend(&self, collection: &CollectionConfig) -> CollectionConfig {
        log::debug!(
            "adding {PLACEHOLDER_FIELD} ({}) to collection {:?}",
            self.hook.algorithm,
            collection.slug
        );
        collection
            .clone()
            .with_field(Field::hidden_text(PLACEHOLDER_FIELD))
            .with_hook(self.hook())
    }
}
