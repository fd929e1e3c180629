//! The slice of the host CMS this crate plugs into.
//!
//! Only what the placeholder hook reads or extends is modelled: collection
//! configuration (fields and pre-save hooks), the record being saved, and the
//! in-flight request carrying the uploaded file. Everything else a host keeps
//! on a collection or config rides along untouched in `extra`.
//!
//! ```text
//! HostConfig
//! └── collections: [CollectionConfig]
//!     ├── slug, upload
//!     ├── fields: [Field]                 ← plugin appends `blurhash`
//!     └── hooks.before_change: [hook]     ← plugin appends its hook
//! ```
//!
//! Reading a configuration and writing it back yields the same JSON: keys
//! absent on input stay absent, and `upload` keeps whatever shape the host
//! gave it (`true`, or an object of upload settings).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// A candidate record: field name → value.
pub type Record = serde_json::Map<String, Value>;

/// Error type hooks hand back to the host. Any hook's error fits.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Bytes of an upload as the host received them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilePayload {
    /// The whole upload, in memory.
    Buffer(Vec<u8>),
    /// The host spooled the upload to disk instead of buffering it.
    TempFile(PathBuf),
}

/// An uploaded file attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub mimetype: String,
    pub size: usize,
    pub data: FilePayload,
}

impl UploadedFile {
    /// An in-memory upload.
    pub fn buffered(name: impl Into<String>, mimetype: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mimetype: mimetype.into(),
            size: data.len(),
            data: FilePayload::Buffer(data),
        }
    }

    /// The in-memory bytes, if the host buffered them.
    pub fn buffer(&self) -> Option<&[u8]> {
        match &self.data {
            FilePayload::Buffer(bytes) => Some(bytes),
            FilePayload::TempFile(_) => None,
        }
    }
}

/// The in-flight request a save belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub file: Option<UploadedFile>,
}

impl Request {
    pub fn with_file(file: UploadedFile) -> Self {
        Self { file: Some(file) }
    }
}

/// What a pre-save hook receives.
pub struct BeforeChangeArgs<'a> {
    pub collection: &'a str,
    pub data: Record,
    pub req: &'a Request,
}

/// Pre-save interceptor: record in, record (or error) out.
///
/// An error aborts the save.
pub trait BeforeChangeHook: Send + Sync {
    fn before_change(&self, args: BeforeChangeArgs<'_>) -> Result<Record, HookError>;
}

/// Admin UI settings for a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldAdmin {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// A collection field definition.
///
/// Layout fields (`row`, `tabs`, `collapsible`) have no name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<FieldAdmin>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Field {
    pub fn hidden_text(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            kind: "text".to_string(),
            admin: Some(FieldAdmin {
                hidden: Some(true),
                extra: serde_json::Map::new(),
            }),
            extra: serde_json::Map::new(),
        }
    }
}

/// Hook lists for one collection. Only `beforeChange` matters here.
#[derive(Clone, Default)]
pub struct CollectionHooks {
    pub before_change: Vec<Arc<dyn BeforeChangeHook>>,
}

impl fmt::Debug for CollectionHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionHooks")
            .field("before_change", &self.before_change.len())
            .finish()
    }
}

/// One collection's configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionConfig {
    pub slug: String,
    /// `true` or an object of upload settings when documents carry files.
    /// See [`accepts_uploads`](Self::accepts_uploads).
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub upload: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<Field>>,
    #[serde(skip)]
    pub hooks: CollectionHooks,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl CollectionConfig {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            upload: Value::Null,
            fields: None,
            hooks: CollectionHooks::default(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_upload(mut self) -> Self {
        self.upload = Value::Bool(true);
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.get_or_insert_with(Vec::new).push(field);
        self
    }

    pub fn fields(&self) -> &[Field] {
        self.fields.as_deref().unwrap_or_default()
    }

    /// Whether `upload` is truthy: `false`, `null`, `0` and `""` are not,
    /// every object, array or other value is.
    pub fn accepts_uploads(&self) -> bool {
        match &self.upload {
            Value::Null => false,
            Value::Bool(enabled) => *enabled,
            Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    pub fn with_hook(mut self, hook: Arc<dyn BeforeChangeHook>) -> Self {
        self.hooks.before_change.push(hook);
        self
    }
}

/// The host's top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub collections: Vec<CollectionConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl HostConfig {
    pub fn collection(&self, slug: &str) -> Option<&CollectionConfig> {
        self.collections.iter().find(|c| c.slug == slug)
    }

    /// Run `slug`'s pre-save hooks in order, threading the record through.
    ///
    /// Unknown collections pass the record back untouched.
    pub fn run_before_change(
        &self,
        slug: &str,
        data: Record,
        req: &Request,
    ) -> Result<Record, HookError> {
        let Some(collection) = self.collection(slug) else {
            return Ok(data);
        };
        collection
            .hooks
            .before_change
            .iter()
            .try_fold(data, |data, hook| {
                hook.before_change(BeforeChangeArgs {
                    collection: slug,
                    data,
                    req,
                })
            })
    }
}
