//! Error taxonomy for manifest extraction
//!
//! Every failure a single file can hit while being parsed is one variant of
//! [`ParseError`]. Errors never cross the per-file boundary: the processor
//! turns them into an invalid [`ParseOutcome`](crate::processor::ParseOutcome).

use thiserror::Error;

/// Result alias used by the parsers and the processor
pub type Result<T> = std::result::Result<T, ParseError>;

/// Which part of a library record failed string validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibField {
    Name,
    Version,
}

impl LibField {
    pub fn as_str(&self) -> &'static str {
        match self {
            LibField::Name => "name",
            LibField::Version => "version",
        }
    }
}

impl std::fmt::Display for LibField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while extracting libraries from one manifest file
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Sanitized content is empty or whitespace only.
    #[error("file empty")]
    FileEmpty,

    /// A structured document (JSON, XML, YAML, TOML, lockfile) could not be parsed.
    #[error("content is not valid {format}{}", detail.as_ref().map(|d| format!(": {d}")).unwrap_or_default())]
    Deserialization {
        format: &'static str,
        detail: Option<String>,
    },

    /// The document parsed but yielded no libraries.
    #[error("unexpected format or dependencies not present")]
    UnexpectedFormatOrDependenciesNotPresent,

    /// A raw name was absent or not a string.
    #[error("unexpected dependency name type `{found}`")]
    UnexpectedDependencyNameType { found: &'static str },

    /// A raw version was not a string, number or absent.
    #[error("unexpected dependency version type `{found}`")]
    UnexpectedDependencyVersionType { found: &'static str },

    /// A name was empty after trimming.
    #[error("dependency name is blank")]
    BlankDependencyName,

    /// A name or version failed the length or character allow-list.
    #[error("{field} `{value}` {reason}")]
    StringValidation {
        field: LibField,
        value: String,
        reason: String,
    },

    /// A structured document had a shape the traversal did not expect.
    #[error("encountered unexpected node")]
    UnexpectedNode,
}

impl ParseError {
    /// Shorthand for a deserialization failure without upstream detail.
    pub fn deserialization(format: &'static str) -> Self {
        ParseError::Deserialization {
            format,
            detail: None,
        }
    }

    /// Stable error class name, used in log events and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::FileEmpty => "FileEmptyError",
            ParseError::Deserialization { .. } => "DeserializationException",
            ParseError::UnexpectedFormatOrDependenciesNotPresent => {
                "UnexpectedFormatOrDependenciesNotPresentError"
            }
            ParseError::UnexpectedDependencyNameType { .. } => "UnexpectedDependencyNameTypeError",
            ParseError::UnexpectedDependencyVersionType { .. } => {
                "UnexpectedDependencyVersionTypeError"
            }
            ParseError::BlankDependencyName => "BlankDependencyNameError",
            ParseError::StringValidation { .. } => "StringValidationError",
            ParseError::UnexpectedNode => "UnexpectedNodeError",
        }
    }
}
