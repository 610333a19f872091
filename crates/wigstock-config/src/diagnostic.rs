// SPDX-FileCopyrightText: 2026 Wigstock Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge.
//!
//! Every config field has a default, so extraction only fails on a key the
//! model does not know, a value of the wrong type or range, or a backend name
//! that is not supported. Each failure is pinned to its line when the value
//! came from TOML text and attributed to its provider (file, inline string or
//! `WIGSTOCK_*` variable) otherwise.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use std::fmt::Write as _;
use std::path::Path;

use figment::error::{Error as FigmentError, Kind};
use figment::{Metadata, Source};
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
/// Catches typos like `pasword` -> `password` and `mysq` -> `mysql`.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Name under which an in-memory TOML document is registered for span lookup.
pub const INLINE_SOURCE: &str = "<inline>";

/// A configuration error with rich diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key the config model does not have.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(wigstock::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys, origin.as_deref()))
    )]
    UnknownKey {
        /// Dotted path of the offending key, e.g. `storage.mysql.hots`.
        key: String,
        suggestion: Option<String>,
        /// Keys accepted in the enclosing section.
        valid_keys: String,
        /// Provider that supplied the key.
        origin: Option<String>,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong type, or out of range for its field.
    #[error("invalid value for `{key}`: found {found}")]
    #[diagnostic(
        code(wigstock::config::invalid_value),
        help("{}", with_origin(format!("expected {expected}"), origin.as_deref()))
    )]
    InvalidValue {
        key: String,
        found: String,
        expected: String,
        origin: Option<String>,
        #[label("invalid value")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A name outside a fixed set, such as an unsupported storage backend.
    #[error("unsupported value `{value}` for `{key}`")]
    #[diagnostic(
        code(wigstock::config::unknown_variant),
        help("{}", variant_help(suggestion.as_deref(), variants, origin.as_deref()))
    )]
    UnknownVariant {
        key: String,
        value: String,
        suggestion: Option<String>,
        /// Accepted names, comma separated.
        variants: String,
        origin: Option<String>,
        #[label("not one of the supported values")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A validation error for a config value.
    #[error("validation error: {message}")]
    #[diagnostic(code(wigstock::config::validation))]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// Anything else figment reports, such as TOML syntax errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(wigstock::config::other))]
    Other(String),
}

fn with_origin(mut help: String, origin: Option<&str>) -> String {
    if let Some(origin) = origin {
        let _ = write!(help, " (set by {origin})");
    }
    help
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str, origin: Option<&str>) -> String {
    let help = match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    };
    with_origin(help, origin)
}

fn variant_help(suggestion: Option<&str>, variants: &str, origin: Option<&str>) -> String {
    let help = match suggestion {
        Some(s) => format!("did you mean `{s}`? Supported: {variants}"),
        None => format!("supported: {variants}"),
    };
    with_origin(help, origin)
}

/// Convert a `figment::Error` (which may hold several) into diagnostics.
///
/// `toml_sources` pairs a file path (or [`INLINE_SOURCE`]) with its text and
/// is used to attach source spans.
pub fn figment_to_config_errors(
    err: FigmentError,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| to_config_error(&error, toml_sources))
        .collect()
}

fn to_config_error(error: &FigmentError, toml_sources: &[(String, String)]) -> ConfigError {
    let key = error.path.join(".");
    let located = locate(error, toml_sources);

    match &error.kind {
        Kind::UnknownField(field, expected) => ConfigError::UnknownKey {
            key,
            suggestion: suggest_key(field, expected),
            valid_keys: expected.join(", "),
            origin: located.origin,
            span: located.key,
            src: located.src,
        },
        Kind::InvalidType(found, expected) | Kind::InvalidValue(found, expected) => {
            ConfigError::InvalidValue {
                key,
                found: found.to_string(),
                expected: expected.clone(),
                origin: located.origin,
                span: located.value,
                src: located.src,
            }
        }
        Kind::UnknownVariant(value, variants) => ConfigError::UnknownVariant {
            key,
            value: value.clone(),
            suggestion: suggest_key(value, variants),
            variants: variants.join(", "),
            origin: located.origin,
            span: located.value,
            src: located.src,
        },
        _ => ConfigError::Other(error.to_string()),
    }
}

/// Where a failing entry came from, and its spans when the text is known.
#[derive(Default)]
struct Located {
    origin: Option<String>,
    key: Option<SourceSpan>,
    value: Option<SourceSpan>,
    src: Option<NamedSource<String>>,
}

fn locate(error: &FigmentError, toml_sources: &[(String, String)]) -> Located {
    let Some(metadata) = error.metadata.as_ref() else {
        return Located::default();
    };
    let origin = Some(match &metadata.source {
        Some(Source::File(path)) => path.display().to_string(),
        _ => metadata.name.to_string(),
    });

    // Figment puts the failing key itself last in the path.
    let entry = error.path.split_last().and_then(|(field, section)| {
        let (name, content) = source_text(metadata, toml_sources)?;
        find_entry(content, section, field).map(|entry| (name, content, entry))
    });

    match entry {
        Some((name, content, entry)) => Located {
            origin,
            key: Some(entry.key),
            value: entry.value,
            src: Some(NamedSource::new(name, content.to_string())),
        },
        None => Located {
            origin,
            ..Located::default()
        },
    }
}

/// Text of the TOML document the failing value was read from.
fn source_text<'a>(
    metadata: &Metadata,
    toml_sources: &'a [(String, String)],
) -> Option<(&'a str, &'a str)> {
    let is_match = |name: &str| match &metadata.source {
        Some(Source::File(path)) => Path::new(name) == path || path.ends_with(name),
        Some(_) => false,
        // `Toml::string` carries no source, only its provider name.
        None => name == INLINE_SOURCE && metadata.name.contains("source string"),
    };
    toml_sources
        .iter()
        .find(|(name, _)| is_match(name))
        .map(|(name, content)| (name.as_str(), content.as_str()))
}

/// Spans of one `key = value` line, or of a `[table]` header naming the key.
#[derive(Debug, PartialEq)]
pub struct Entry {
    pub key: SourceSpan,
    pub value: Option<SourceSpan>,
}

/// Locate `field` inside the `[section]` table of a TOML document.
///
/// Only plain `key = value` lines and `[a.b]` headers are recognized. An
/// empty `section` means top-level keys, which end at the first header.
pub fn find_entry(content: &str, section: &[String], field: &str) -> Option<Entry> {
    let header = format!("[{}]", section.join("."));
    let table = if section.is_empty() {
        format!("[{field}]")
    } else {
        format!("[{}.{field}]", section.join("."))
    };

    let mut in_section = section.is_empty();
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();

        if trimmed.starts_with('[') {
            if trimmed.starts_with(&table) {
                let name_len = table.len() - 2;
                return Some(Entry {
                    key: SourceSpan::new((offset + indent + 1).into(), name_len),
                    value: None,
                });
            }
            in_section = !section.is_empty() && trimmed.starts_with(&header);
        } else if in_section
            && let Some(after_key) = trimmed.strip_prefix(field)
            && let Some(after_eq) = after_key.trim_start().strip_prefix('=')
        {
            let key_start = offset + indent;
            let value_text = after_eq.trim_start();
            let value_start = line.len() - value_text.len();
            let value_len = value_text.trim_end().len();
            return Some(Entry {
                key: SourceSpan::new(key_start.into(), field.len()),
                value: (value_len > 0)
                    .then(|| SourceSpan::new((offset + value_start).into(), value_len)),
            });
        }
        offset += line.len();
    }

    None
}

/// Suggest a similar key name using Jaro-Winkler string similarity.
///
/// Returns the best match above the similarity threshold, or `None` if
/// no valid key is close enough to the unknown key.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    let mut best_score = SUGGESTION_THRESHOLD;
    let mut best_match = None;

    for &key in valid_keys {
        let score = strsim::jaro_winkler(unknown, key);
        if score > best_score {
            best_score = score;
            best_match = Some(key.to_string());
        }
    }

    best_match
}

/// Render a list of `ConfigError`s to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOP: &str = "[storage]\nbackend = \"mysql\"\n\n[storage.mysql]\nhots = \"db\"\nport = 70000\n";

    fn section(path: &[&str]) -> Vec<String> {
        path.iter().map(|s| s.to_string()).collect()
    }

    fn text(content: &str, span: SourceSpan) -> &str {
        &content[span.offset()..span.offset() + span.len()]
    }

    #[test]
    fn suggest_databse_for_database() {
        let valid = &["host", "port", "user", "password", "database", "connect_timeout_secs"];
        assert_eq!(suggest_key("databse", valid), Some("database".to_string()));
    }

    #[test]
    fn suggest_mysql_for_misspelled_backend() {
        assert_eq!(suggest_key("mysq", &["sqlite", "mysql"]), Some("mysql".to_string()));
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        let valid = &["backend", "sqlite", "mysql"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn entry_in_nested_section_spans_key_and_value() {
        let entry = find_entry(SHOP, &section(&["storage", "mysql"]), "port").unwrap();
        assert_eq!(text(SHOP, entry.key), "port");
        assert_eq!(text(SHOP, entry.value.unwrap()), "70000");
    }

    #[test]
    fn entry_lookup_stays_inside_its_section() {
        // `backend` lives in [storage], not [storage.mysql].
        assert_eq!(find_entry(SHOP, &section(&["storage", "mysql"]), "backend"), None);
        let entry = find_entry(SHOP, &section(&["storage"]), "backend").unwrap();
        assert_eq!(text(SHOP, entry.value.unwrap()), "\"mysql\"");
    }

    #[test]
    fn unknown_table_is_found_by_its_header() {
        let content = "[logging]\nlevel = \"info\"\n\n[telemetry]\nenabled = true\n";
        let entry = find_entry(content, &[], "telemetry").unwrap();
        assert_eq!(text(content, entry.key), "telemetry");
        assert_eq!(entry.value, None);
    }

    #[test]
    fn prefix_of_a_longer_key_does_not_match() {
        let content = "[storage.mysql]\nport_number = 1\n";
        assert_eq!(find_entry(content, &section(&["storage", "mysql"]), "port"), None);
    }

    #[test]
    fn missing_section_yields_nothing() {
        let content = "[logging]\nlevel = \"info\"\n";
        assert_eq!(find_entry(content, &section(&["storage"]), "backend"), None);
    }

    #[test]
    fn help_names_the_provider() {
        let help = unknown_key_help(Some("password"), "host, password", Some("`WIGSTOCK_` environment variable(s)"));
        assert!(help.starts_with("did you mean `password`?"));
        assert!(help.ends_with("(set by `WIGSTOCK_` environment variable(s))"));
    }
}
