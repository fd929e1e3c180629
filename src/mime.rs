//! MIME-type glob matching.
//!
//! Patterns use the familiar shell/minimatch wildcards and are compiled once
//! to an anchored [`Regex`]:
//!
//! | Glob | Meaning |
//! |---|---|
//! | `*` | any run of characters except `/` |
//! | `**` | any run of characters, `/` included |
//! | `?` | one character except `/` |
//! | `[abc]`, `[a-z]`, `[!abc]` | character class (`!` or `^` negates) |
//! | `{png,jpeg}` | alternation, nestable |
//! | `\x` | literal `x` |
//!
//! Matching is case-sensitive, the same as the upload descriptors hosts
//! report (`image/png`, never `Image/PNG`).

use regex::Regex;
use std::fmt;
use thiserror::Error;

/// Pattern applied when configuration names none.
pub const DEFAULT_MIME_PATTERN: &str = "image/*";

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("MIME pattern is empty")]
    Empty,
    #[error("Unclosed `[` in MIME pattern {0:?}")]
    UnclosedClass(String),
    #[error("Unbalanced `{{`/`}}` in MIME pattern {0:?}")]
    UnbalancedBrace(String),
    #[error("Dangling `\\` at end of MIME pattern {0:?}")]
    DanglingEscape(String),
    #[error("MIME pattern compiled to an invalid regex: {0}")]
    Regex(#[from] regex::Error),
}

/// A compiled MIME-type glob.
#[derive(Debug, Clone)]
pub struct MimePattern {
    glob: String,
    regex: Regex,
}

impl MimePattern {
    pub fn new(glob: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(&glob_to_regex(glob)?)?;
        Ok(Self {
            glob: glob.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.glob
    }

    pub fn matches(&self, mime_type: &str) -> bool {
        self.regex.is_match(mime_type)
    }
}

impl fmt::Display for MimePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.glob)
    }
}

fn push_literal(out: &mut String, c: char) {
    let mut buf = [0u8; 4];
    out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}

/// Translate a glob into an anchored regex source string.
fn glob_to_regex(glob: &str) -> Result<String, PatternError> {
    if glob.is_empty() {
        return Err(PatternError::Empty);
    }

    let mut out = String::with_capacity(glob.len() * 2 + 2);
    out.push('^');
    let mut chars = glob.chars().peekable();
    let mut depth = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    out.push_str(".*");
                } else {
                    out.push_str("[^/]*");
                }
            }
            '?' => out.push_str("[^/]"),
            '[' => {
                out.push('[');
                if matches!(chars.peek(), Some('!' | '^')) {
                    chars.next();
                    out.push('^');
                }
                // A `]` right after the opening bracket is a literal.
                let mut first = true;
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        ']' if !first => {
                            closed = true;
                            break;
                        }
                        '-' if !first && chars.peek() != Some(&']') => out.push('-'),
                        c if c.is_ascii_punctuation() => {
                            out.push('\\');
                            out.push(c);
                        }
                        c => out.push(c),
                    }
                    first = false;
                }
                if !closed {
                    return Err(PatternError::UnclosedClass(glob.to_string()));
                }
                out.push(']');
            }
            '{' => {
                depth += 1;
                out.push_str("(?:");
            }
            ',' if depth > 0 => out.push('|'),
            '}' if depth > 0 => {
                depth -= 1;
                out.push(')');
            }
            '}' => return Err(PatternError::UnbalancedBrace(glob.to_string())),
            '\\' => match chars.next() {
                Some(escaped) => push_literal(&mut out, escaped),
                None => return Err(PatternError::DanglingEscape(glob.to_string())),
            },
            c => push_literal(&mut out, c),
        }
    }

    if depth > 0 {
        return Err(PatternError::UnbalancedBrace(glob.to_string()));
    }
    out.push('$');
    Ok(out)
}
