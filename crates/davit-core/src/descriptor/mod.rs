//! Deployment descriptor markers.
//!
//! Each language adapter recognizes identifiers by a fixed pair of markers
//! supplied at construction: a language tag, matched as the prefix
//! `"<tag>:"`, and a source-file extension, matched as the suffix
//! `".<ext>"`. Ownership is a pure function of the identifier text; the
//! markers never change after construction.

use thiserror::Error;

/// Errors from constructing [`DescriptorMarkers`].
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("language tag must not be empty")]
    EmptyLanguage,

    #[error("language tag contains invalid character {0:?}")]
    InvalidLanguage(char),

    #[error("file extension must not be empty")]
    EmptyExtension,

    #[error("file extension contains invalid character {0:?}")]
    InvalidExtension(char),
}

/// The validated recognition markers for one source language.
///
/// Stores the rendered prefix (`"<tag>:"`) and suffix (`".<ext>"`) so the
/// per-identifier checks are plain string comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorMarkers {
    language: String,
    prefix: String,
    suffix: String,
}

impl DescriptorMarkers {
    /// Build markers for a language tag and file extension.
    ///
    /// The tag must be non-empty and free of `:` and whitespace; the
    /// extension must be non-empty and free of `.` and whitespace. Both are
    /// fixed for the lifetime of the markers.
    pub fn new(language: &str, extension: &str) -> Result<Self, DescriptorError> {
        if language.is_empty() {
            return Err(DescriptorError::EmptyLanguage);
        }
        if let Some(c) = language.chars().find(|c| *c == ':' || c.is_whitespace()) {
            return Err(DescriptorError::InvalidLanguage(c));
        }
        if extension.is_empty() {
            return Err(DescriptorError::EmptyExtension);
        }
        if let Some(c) = extension.chars().find(|c| *c == '.' || c.is_whitespace()) {
            return Err(DescriptorError::InvalidExtension(c));
        }

        Ok(Self {
            language: language.to_string(),
            prefix: format!("{language}:"),
            suffix: format!(".{extension}"),
        })
    }

    /// The language tag these markers were built from.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The rendered prefix, `"<tag>:"`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The rendered suffix, `".<ext>"`.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// The bare extension, without the leading dot.
    pub fn extension(&self) -> &str {
        &self.suffix[1..]
    }

    /// Ownership probe: true iff `main` starts with the prefix or ends with
    /// the suffix. Pure; the two checks are independent.
    pub fn owns(&self, main: &str) -> bool {
        main.starts_with(&self.prefix) || main.ends_with(&self.suffix)
    }

    /// True iff `main` carries the language-tag prefix.
    pub fn has_prefix(&self, main: &str) -> bool {
        main.starts_with(&self.prefix)
    }

    /// True iff `main` carries the source-file suffix.
    pub fn has_suffix(&self, main: &str) -> bool {
        main.ends_with(&self.suffix)
    }

    /// Remove exactly one leading occurrence of the prefix.
    ///
    /// Identifiers without the prefix are returned unchanged, so stripping
    /// twice is a no-op unless the prefix recurs in the identifier itself.
    pub fn strip_prefix<'a>(&self, main: &'a str) -> &'a str {
        main.strip_prefix(&self.prefix).unwrap_or(main)
    }
}
