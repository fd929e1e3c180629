//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Encode
//!
//! ```text
//! blurhash
//! 001 sunset.jpg
//!     LEHV6nWB2yk8pyo0adR*.7kCMdnj
//! 002 notes.txt
//!     error: Invalid image: Failed to read dimensions: ...
//!
//! Encoded 1 file, 1 failed
//! ```
//!
//! ## Algorithms
//!
//! ```text
//! blurhash (default)
//!     width = 32          Sample grid width in pixels (1-1024)
//!     componentX = 3      Horizontal components (1-9)
//! thumbhash
//!     (no options)
//! ```
//!
//! ## Check
//!
//! ```text
//! Config: site/blurhash.toml
//!     algorithm: thumbhash
//!     mimeTypePattern: image/{png,jpeg}
//!     collections: media
//!     options: (defaults)
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::algorithms::{AlgorithmEntry, AlgorithmName, DEFAULT_ALGORITHM, PlaceholderError};
use crate::config::ValidatedConfig;
use std::path::{Path, PathBuf};

/// Result of encoding one file from the command line.
#[derive(Debug)]
pub struct EncodeOutcome {
    pub path: PathBuf,
    pub result: Result<String, PlaceholderError>,
}

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Encode
// ============================================================================

pub fn format_encode_results(algorithm: AlgorithmName, outcomes: &[EncodeOutcome]) -> Vec<String> {
    let mut lines = vec![algorithm.to_string()];
    let mut failed = 0;

    for (i, outcome) in outcomes.iter().enumerate() {
        lines.push(format!(
            "{} {}",
            format_index(i + 1),
            display_name(&outcome.path)
        ));
        match &outcome.result {
            Ok(placeholder) => lines.push(format!("{}{}", indent(1), placeholder)),
            Err(e) => {
                failed += 1;
                lines.push(format!("{}error: {}", indent(1), e));
            }
        }
    }

    lines.push(String::new());
    let encoded = outcomes.len() - failed;
    if failed == 0 {
        lines.push(format!("Encoded {}", plural(encoded, "file")));
    } else {
        lines.push(format!("Encoded {}, {} failed", plural(encoded, "file"), failed));
    }
    lines
}

pub fn print_encode_results(algorithm: AlgorithmName, outcomes: &[EncodeOutcome]) {
    for line in format_encode_results(algorithm, outcomes) {
        println!("{}", line);
    }
}

// ============================================================================
// Algorithms
// ============================================================================

pub fn format_algorithms(entries: &[AlgorithmEntry]) -> Vec<String> {
    let mut lines = Vec::new();
    for entry in entries {
        if entry.name == DEFAULT_ALGORITHM {
            lines.push(format!("{} (default)", entry.name));
        } else {
            lines.push(entry.name.to_string());
        }

        if entry.fields.is_empty() {
            lines.push(format!("{}(no options)", indent(1)));
            continue;
        }
        let width = entry
            .fields
            .iter()
            .map(|f| f.name.len() + f.default.len() + 3)
            .max()
            .unwrap_or(0);
        for field in entry.fields {
            let assignment = format!("{} = {}", field.name, field.default);
            lines.push(format!(
                "{}{:<width$}  {}",
                indent(1),
                assignment,
                field.description
            ));
        }
    }
    lines
}

pub fn print_algorithms(entries: &[AlgorithmEntry]) {
    for line in format_algorithms(entries) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// `source` is the config file that was read, or `None` for built-in defaults.
pub fn format_check(source: Option<&Path>, config: &ValidatedConfig) -> Vec<String> {
    let mut lines = vec![match source {
        Some(path) => format!("Config: {}", path.display()),
        None => "Config: (defaults)".to_string(),
    }];

    lines.push(format!("{}algorithm: {}", indent(1), config.algorithm));
    lines.push(format!("{}mimeTypePattern: {}", indent(1), config.mime_pattern));
    lines.push(format!(
        "{}collections: {}",
        indent(1),
        match &config.collections {
            Some(slugs) if slugs.is_empty() => "(none)".to_string(),
            Some(slugs) => slugs.join(", "),
            None => "all upload collections".to_string(),
        }
    ));

    if config.options.is_empty() {
        lines.push(format!("{}options: (defaults)", indent(1)));
    } else {
        let options: Vec<String> = config
            .options
            .iter()
            .map(|(k, v)| format!("{k} = {v}"))
            .collect();
        lines.push(format!("{}options: {}", indent(1), options.join(", ")));
    }
    lines
}

pub fn print_check(source: Option<&Path>, config: &ValidatedConfig) {
    for line in format_check(source, config) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::Registry;
    use crate::config::PluginConfig;

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn encode_results_list_each_file_then_summary() {
        let outcomes = vec![
            EncodeOutcome {
                path: PathBuf::from("photos/sunset.jpg"),
                result: Ok("LEHV6nWB2yk8pyo0adR*.7kCMdnj".into()),
            },
            EncodeOutcome {
                path: PathBuf::from("notes.txt"),
                result: Err(PlaceholderError::InvalidImage("bad header".into())),
            },
        ];

        let lines = format_encode_results(AlgorithmName::Blurhash, &outcomes);
        assert_eq!(
            lines,
            vec![
                "blurhash",
                "001 sunset.jpg",
                "    LEHV6nWB2yk8pyo0adR*.7kCMdnj",
                "002 notes.txt",
                "    error: Invalid image: bad header",
                "",
                "Encoded 1 file, 1 failed",
            ]
        );
    }

    #[test]
    fn encode_summary_without_failures() {
        let outcomes = vec![
            EncodeOutcome {
                path: PathBuf::from("a.png"),
                result: Ok("x".into()),
            },
            EncodeOutcome {
                path: PathBuf::from("b.png"),
                result: Ok("y".into()),
            },
        ];
        let lines = format_encode_results(AlgorithmName::Thumbhash, &outcomes);
        assert_eq!(lines.first().map(String::as_str), Some("thumbhash"));
        assert_eq!(lines.last().map(String::as_str), Some("Encoded 2 files"));
    }

    #[test]
    fn algorithms_marks_default_and_lists_options() {
        let lines = format_algorithms(Registry::builtin().entries());
        assert_eq!(lines[0], "blurhash (default)");
        assert!(lines[1].starts_with("    width = 32"));
        assert!(lines[1].ends_with("Sample grid width in pixels (1-1024)"));
        assert_eq!(lines[5], "thumbhash");
        assert_eq!(lines[6], "    (no options)");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn algorithms_option_descriptions_are_aligned() {
        let lines = format_algorithms(Registry::builtin().entries());
        // Descriptions hold single spaces only, so the last double space
        // sits right before each description.
        let columns: Vec<Option<usize>> = lines[1..5].iter().map(|l| l.rfind("  ")).collect();
        assert!(columns.windows(2).all(|w| w[0] == w[1]), "{lines:#?}");
    }

    #[test]
    fn check_shows_resolved_settings() {
        let config = PluginConfig::from_toml_str(
            r#"
collections = ["media"]
algorithm = "thumbhash"
mimeTypePattern = "image/{png,jpeg}"
"#,
        )
        .unwrap()
        .validate(&Registry::builtin())
        .unwrap();

        let lines = format_check(Some(Path::new("site/blurhash.toml")), &config);
        assert_eq!(
            lines,
            vec![
                "Config: site/blurhash.toml",
                "    algorithm: thumbhash",
                "    mimeTypePattern: image/{png,jpeg}",
                "    collections: media",
                "    options: (defaults)",
            ]
        );
    }

    #[test]
    fn check_defaults_and_options() {
        let config = PluginConfig::from_toml_str("componentX = 4\n")
            .unwrap()
            .validate(&Registry::builtin())
            .unwrap();
        let lines = format_check(None, &config);
        assert_eq!(lines[0], "Config: (defaults)");
        assert_eq!(lines[1], "    algorithm: blurhash");
        assert_eq!(lines[3], "    collections: all upload collections");
        assert_eq!(lines[4], "    options: componentX = 4");
    }
}
