//! Option schemas for placeholder algorithms.
//!
//! Algorithm options arrive untyped ([`RawOptions`], a JSON object map) from
//! plugin configuration. Each algorithm declares a typed options struct that
//! implements [`OptionSchema`]; parsing it validates every key it knows and
//! applies defaults. Keys the schema does not know are ignored, so one config
//! file can carry options for several algorithms and switch between them.
//!
//! Validation collects *all* offending fields before failing, so a config with
//! a bad `width` and an out-of-range `componentX` reports both at once.

use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;
use thiserror::Error;

/// Untyped option mapping as supplied by configuration.
pub type RawOptions = serde_json::Map<String, Value>;

/// One rejected option key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`: {}", self.field, self.message)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", describe(.issues))]
pub struct OptionValidationError {
    pub issues: Vec<FieldIssue>,
}

fn describe(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl OptionValidationError {
    /// Names of every offending field, in the order they were found.
    pub fn fields(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.field.as_str()).collect()
    }
}

/// Documentation for one accepted option key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionField {
    pub name: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// A typed, validated options value for one algorithm.
pub trait OptionSchema: Sized {
    /// Every key this schema accepts.
    const FIELDS: &'static [OptionField];

    /// Validate `raw` and build the options, defaults applied.
    fn parse(raw: &RawOptions) -> Result<Self, OptionValidationError>;
}

/// Reads typed fields out of a [`RawOptions`] map, accumulating issues.
///
/// Call [`finish`](Self::finish) last.
pub struct FieldReader<'a> {
    raw: &'a RawOptions,
    known: BTreeSet<&'static str>,
    issues: Vec<FieldIssue>,
}

impl<'a> FieldReader<'a> {
    pub fn new(raw: &'a RawOptions) -> Self {
        Self {
            raw,
            known: BTreeSet::new(),
            issues: Vec::new(),
        }
    }

    fn issue(&mut self, field: &str, message: String) {
        self.issues.push(FieldIssue {
            field: field.to_string(),
            message,
        });
    }

    /// Optional unsigned integer within `range`; `default` when absent.
    ///
    /// On a bad value the default is returned and an issue recorded, so the
    /// caller can keep reading and report everything at once.
    pub fn u32_or(&mut self, field: &'static str, default: u32, range: RangeInclusive<u32>) -> u32 {
        self.known.insert(field);
        let Some(value) = self.raw.get(field) else {
            return default;
        };

        let Some(n) = value.as_u64() else {
            self.issue(field, format!("expected an unsigned integer, got {value}"));
            return default;
        };

        match u32::try_from(n) {
            Ok(n) if range.contains(&n) => n,
            _ => {
                self.issue(
                    field,
                    format!(
                        "{n} is out of range ({}..={})",
                        range.start(),
                        range.end()
                    ),
                );
                default
            }
        }
    }

    /// Return `value` if nothing went wrong. Keys no read asked for are
    /// dropped.
    pub fn finish<T>(self, value: T) -> Result<T, OptionValidationError> {
        let ignored = unknown_keys(self.raw, |k| self.known.contains(k));
        if !ignored.is_empty() {
            log::trace!("ignoring options {ignored:?}");
        }

        if self.issues.is_empty() {
            Ok(value)
        } else {
            Err(OptionValidationError {
                issues: self.issues,
            })
        }
    }
}

/// Keys of `raw` that `known` rejects, in map order.
pub fn unknown_keys<'r>(raw: &'r RawOptions, known: impl Fn(&str) -> bool) -> Vec<&'r str> {
    raw.keys()
        .map(String::as_str)
        .filter(|k| !known(k))
        .collect()
}
