//! Sanitization and validation of extracted library values
//!
//! Manifest content is untrusted repository text. Names and versions are held
//! to a strict allow-list before they leave the crate, which bounds both their
//! size and their character set.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{LibField, ParseError, Result};
use crate::utils::truncate_string;

/// Maximum length of a library name
pub const MAX_NAME_LENGTH: usize = 60;

/// Maximum length of a library version
pub const MAX_VERSION_LENGTH: usize = 30;

/// Longest slice of an offending value echoed back in an error message
const MAX_ECHOED_VALUE_CHARS: usize = 40;

static NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9_/\-.]*[A-Za-z0-9])?$").expect("valid name regex")
});

static VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9 .<>=+^*!|,]+$").expect("valid version regex"));

// Leading `v` before a digit, a `-`/`+` qualifier after a digit, or a trailing
// alphabetic suffix after a digit. Each alternative keeps the digit it anchors on.
static VERSION_QUALIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v(\d)|(\d)[-+][0-9A-Za-z._\-+]*|(\d)[A-Za-z][0-9A-Za-z.]*$")
        .expect("valid version qualifier regex")
});

/// Turn raw file bytes into text that is safe to scan and store.
///
/// Invalid UTF-8 sequences become U+FFFD and NUL bytes are dropped. Never fails.
pub fn sanitize_content(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    if text.contains('\0') {
        text.replace('\0', "")
    } else {
        text.into_owned()
    }
}

/// Strip a `v` prefix, pre-release/build qualifiers and alphabetic suffixes.
///
/// ```
/// use manifest_libs::validation::sanitize_version;
///
/// assert_eq!(sanitize_version("v1.2.3"), "1.2.3");
/// assert_eq!(sanitize_version("1.2.3-beta+build5"), "1.2.3");
/// assert_eq!(sanitize_version("1.2.3rc1"), "1.2.3");
/// ```
pub fn sanitize_version(raw: &str) -> String {
    VERSION_QUALIFIER_REGEX
        .replace_all(raw, "${1}${2}${3}")
        .into_owned()
}

/// Check a library name against the length limit and allow-list.
pub fn validate_name(name: &str) -> Result<()> {
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(invalid(
            LibField::Name,
            name,
            format!("exceeds {MAX_NAME_LENGTH} characters"),
        ));
    }

    if !NAME_REGEX.is_match(name) {
        return Err(invalid(
            LibField::Name,
            name,
            "contains invalid characters".to_string(),
        ));
    }

    Ok(())
}

/// Check a library version against the length limit and allow-list.
pub fn validate_version(version: &str) -> Result<()> {
    if version.chars().count() > MAX_VERSION_LENGTH {
        return Err(invalid(
            LibField::Version,
            version,
            format!("exceeds {MAX_VERSION_LENGTH} characters"),
        ));
    }

    if !VERSION_REGEX.is_match(version) {
        return Err(invalid(
            LibField::Version,
            version,
            "contains invalid characters".to_string(),
        ));
    }

    Ok(())
}

fn invalid(field: LibField, value: &str, reason: String) -> ParseError {
    ParseError::StringValidation {
        field,
        value: truncate_string(value, MAX_ECHOED_VALUE_CHARS),
        reason,
    }
}
