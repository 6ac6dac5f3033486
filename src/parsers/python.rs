//! Parsers for Python dependency files (requirements.txt, pyproject.toml, poetry.lock)

use std::sync::LazyLock;

use regex::Regex;

use super::{Parser, RawLib, RawValue};
use crate::error::{ParseError, Result};
use crate::utils::{strip_inline_comment, unquote};

/// Characters that start a PEP 440 version specifier
const SPECIFIER_CHARS: [char; 5] = ['!', '=', '<', '>', '~'];

/// `[tool.poetry.dependencies]`, `[tool.poetry.dev-dependencies]`,
/// `[tool.poetry.group.<name>.dependencies]`
static POETRY_SECTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[tool\.poetry(?:\.group\.[A-Za-z0-9_\-]+)?\.(?:dev-)?dependencies\]$")
        .expect("valid poetry section regex")
});

static INLINE_VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|[{,\s])version\s*=\s*["']([^"']*)["']"#)
        .expect("valid inline version regex")
});

/// Parser for pip requirements files (requirements.txt, requirements-dev.txt, ...)
#[derive(Debug, Default)]
pub struct PipParser;

impl PipParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for PipParser {
    fn parse(&self, content: &str) -> Result<Vec<RawLib>> {
        let libs = content
            .lines()
            .map(str::trim)
            // Skip empty lines, comments, and options (-r, -e, --index-url, ...)
            .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
            .filter_map(parse_requirement)
            .collect();

        Ok(libs)
    }
}

/// Parse one requirement specifier such as `requests[socks]>=2.0,<3.0 ; python_version > "3.8"`.
///
/// The version keeps its operators: `>=2.0,<3.0`.
pub(crate) fn parse_requirement(line: &str) -> Option<RawLib> {
    let line = line.split('#').next().unwrap_or_default();
    // URL requirements (`pkg @ https://...`) and environment markers
    let line = line.split(['@', ';']).next().unwrap_or_default();
    let line = strip_extras(line);
    // `pkg==1.0 \` continues onto `--hash=...` option lines
    let line = line.trim().trim_end_matches('\\').trim_end();

    if line.is_empty() {
        return None;
    }

    let (name, version) = match line.find(SPECIFIER_CHARS) {
        Some(pos) => (line[..pos].trim(), line[pos..].trim()),
        None => (line, ""),
    };

    if name.is_empty() {
        return None;
    }

    let version = (!version.is_empty()).then_some(version);
    Some(RawLib::new(name, version))
}

/// `name[extra1,extra2]>=1.0` -> `name>=1.0`
fn strip_extras(line: &str) -> String {
    match (line.find('['), line.find(']')) {
        (Some(open), Some(close)) if open < close => {
            format!("{}{}", &line[..open], &line[close + 1..])
        }
        _ => line.to_string(),
    }
}

/// Parser for Poetry's pyproject.toml dependency tables
#[derive(Debug, Default)]
pub struct PoetryParser;

impl PoetryParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for PoetryParser {
    fn parse(&self, content: &str) -> Result<Vec<RawLib>> {
        let mut libs = Vec::new();
        let mut in_dependencies = false;

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if trimmed.starts_with('[') {
                let header = strip_inline_comment(trimmed, "#");
                in_dependencies = POETRY_SECTION_REGEX.is_match(header);
                continue;
            }

            if in_dependencies && let Some(lib) = parse_poetry_line(strip_inline_comment(trimmed, "#"))
            {
                libs.push(lib);
            }
        }

        Ok(libs)
    }
}

/// `name = "^1.0"` or `name = { version = "^1.0", extras = [...] }`
fn parse_poetry_line(line: &str) -> Option<RawLib> {
    let (key, value) = line.split_once('=')?;
    let name = unquote(key);
    let value = value.trim();

    // The interpreter constraint is not a library
    if name == "python" {
        return None;
    }

    if value.starts_with('{') {
        let version = INLINE_VERSION_REGEX
            .captures(value)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());
        return Some(RawLib::new(name, version));
    }

    if value.starts_with('"') || value.starts_with('\'') {
        return Some(RawLib::new(name, unquote(value)));
    }

    None
}

/// Parser for poetry.lock files
#[derive(Debug, Default)]
pub struct PoetryLockParser;

impl PoetryLockParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for PoetryLockParser {
    fn parse(&self, content: &str) -> Result<Vec<RawLib>> {
        let document: toml::Table =
            toml::from_str(content).map_err(|e| ParseError::Deserialization {
                format: "TOML",
                detail: Some(e.to_string().trim().to_string()),
            })?;

        let packages = match document.get("package") {
            None => return Ok(Vec::new()),
            Some(toml::Value::Array(packages)) => packages,
            Some(_) => return Err(ParseError::UnexpectedNode),
        };

        packages
            .iter()
            .map(|package| {
                let package = package.as_table().ok_or(ParseError::UnexpectedNode)?;
                let field = |key: &str| package.get(key).map_or(RawValue::Absent, RawValue::from);
                Ok(RawLib::new(field("name"), field("version")))
            })
            .collect()
    }
}
