//! Parsers for Conan recipes and requirement files (conanfile.txt, conanfile.py)
//!
//! Both read Conan references of the form `name/version[@user/channel][#revision]`.
//! The version may be a range in brackets: `poco/[>1.0 <1.9]`.

use std::sync::LazyLock;

use regex::Regex;

use super::{Parser, RawLib, RawValue};
use crate::error::Result;
use crate::utils::{bracket_balance, quoted_strings, strip_inline_comment};

const REQUIRES_SECTION: &str = "[requires]";

/// `self.requires("zlib/1.2.13")`, `self.requires(f"fmt/{v}", force=True)`
static SELF_REQUIRES_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"self\.requires\(\s*[fF]?["']([^"']+)["']"#).expect("valid requires call regex")
});

/// `requires = "a/1.0", "b/2.0"` or `requires = (` / `requires = [`
static REQUIRES_ASSIGNMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^requires\s*=\s*(.*)$").expect("valid requires assignment regex")
});

/// Parser for conanfile.txt
#[derive(Debug, Default)]
pub struct ConanTxtParser;

impl ConanTxtParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for ConanTxtParser {
    fn parse(&self, content: &str) -> Result<Vec<RawLib>> {
        let mut libs = Vec::new();
        let mut in_requires = false;

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            // `[requires]  # build deps`; references keep their `#revision`
            if trimmed.starts_with('[') {
                in_requires = strip_inline_comment(trimmed, "#") == REQUIRES_SECTION;
                continue;
            }

            if in_requires && let Some(lib) = parse_reference(trimmed) {
                libs.push(lib);
            }
        }

        Ok(libs)
    }
}

/// Parser for conanfile.py recipes
#[derive(Debug, Default)]
pub struct ConanPyParser;

impl ConanPyParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for ConanPyParser {
    fn parse(&self, content: &str) -> Result<Vec<RawLib>> {
        let mut libs = Vec::new();
        // Open brackets of a `requires = ...` assignment spanning several lines
        let mut open_brackets = 0;
        let mut in_assignment = false;

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let code = strip_inline_comment(trimmed, "#");

            let values = if in_assignment {
                code
            } else if let Some(caps) = REQUIRES_ASSIGNMENT_REGEX.captures(code) {
                open_brackets = 0;
                caps.get(1).map_or("", |m| m.as_str())
            } else {
                for caps in SELF_REQUIRES_REGEX.captures_iter(code) {
                    libs.extend(parse_reference(&caps[1]));
                }
                continue;
            };

            for reference in quoted_strings(values) {
                libs.extend(parse_reference(reference));
            }

            open_brackets += bracket_balance(values);
            in_assignment = open_brackets > 0 || values.ends_with('\\');
        }

        Ok(libs)
    }
}

/// Split a Conan reference into name and version.
///
/// Interpolated parts (`{version}`, `%s`, `${name}`) cannot be known statically
/// and are nulled so that validation decides the fate of the record.
fn parse_reference(reference: &str) -> Option<RawLib> {
    let reference = reference.split(['@', '#']).next()?.trim();
    let (name, version) = reference.split_once('/')?;

    let name = name.trim();
    let version = version.trim();
    let version = version
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .unwrap_or(version)
        .trim();

    let name = if is_interpolated(name) {
        RawValue::Absent
    } else {
        RawValue::from(name)
    };
    let version = if version.is_empty() || is_interpolated(version) {
        RawValue::Absent
    } else {
        RawValue::from(version)
    };

    Some(RawLib::new(name, version))
}

fn is_interpolated(value: &str) -> bool {
    value.contains('{') || value.contains('$') || value.contains("%s")
}
