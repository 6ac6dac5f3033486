//! Parser for Gradle build scripts (build.gradle, build.gradle.kts)
//!
//! Works in two passes over the script:
//! 1. collect one-line variable assignments (`ext { }`, `ext.x =`, `def x =` for
//!    Groovy; `val x =` for Kotlin) whose value is a plain string or number
//! 2. read `implementation` / `testImplementation` lines inside `dependencies { }`
//!
//! `$name` and `${name}` references resolve against the collected variables.
//! Only a reference that makes up a whole coordinate part is substituted.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::{Parser, RawLib, RawValue};
use crate::error::Result;
use crate::utils::{quoted_strings, strip_inline_comment, unquote};

/// Build script language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradleDialect {
    #[default]
    Groovy,
    Kotlin,
}

static EXT_BLOCK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ext\s*\{").expect("valid ext block regex"));

static GROOVY_ASSIGNMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:ext\.|def\s+)([A-Za-z_]\w*)\s*=\s*(.+)$").expect("valid groovy assignment regex")
});

static BLOCK_ASSIGNMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_]\w*)\s*=\s*(.+)$").expect("valid block assignment regex")
});

static KOTLIN_ASSIGNMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:private|internal|const)\s+)*val\s+([A-Za-z_]\w*)\s*(?::\s*\w+\s*)?=\s*(.+)$")
        .expect("valid kotlin assignment regex")
});

static DEPENDENCIES_BLOCK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^dependencies\s*\{").expect("valid dependencies block regex"));

/// `implementation 'a:b:1'`, `"testImplementation"("a:b:1")`
static CONFIGURATION_PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^["']?(?:implementation|testImplementation)["']?(?:\s*\(|\s+)"#)
        .expect("valid configuration prefix regex")
});

/// `group: 'g', name: 'n', version: 'v'` (Groovy map) or `group = "g", ...` (Kotlin named args)
static LONG_FORM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"group\s*[:=]\s*["'](?P<group>[^"']*)["']\s*,\s*name\s*[:=]\s*["'](?P<name>[^"']*)["'](?:\s*,\s*version\s*[:=]\s*(?:["'](?P<version>[^"']*)["']|(?P<version_ref>[A-Za-z_][\w.]*)))?"#,
    )
    .expect("valid long form regex")
});

static REFERENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$(?:\{([A-Za-z_][\w.]*)\}|([A-Za-z_]\w*))$").expect("valid reference regex")
});

static NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9][0-9.]*$").expect("valid number regex"));

/// Parser for Gradle build scripts in either dialect
#[derive(Debug, Default)]
pub struct GradleParser {
    dialect: GradleDialect,
}

impl GradleParser {
    pub fn new(dialect: GradleDialect) -> Self {
        Self { dialect }
    }

    fn collect_variables(&self, content: &str) -> HashMap<String, String> {
        let mut variables = HashMap::new();
        let mut ext_depth = 0;

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("//") {
                continue;
            }
            let code = strip_inline_comment(trimmed, "//");

            let assignment = match self.dialect {
                GradleDialect::Kotlin => KOTLIN_ASSIGNMENT_REGEX.captures(code),
                GradleDialect::Groovy if ext_depth > 0 => {
                    ext_depth += brace_balance(code);
                    BLOCK_ASSIGNMENT_REGEX.captures(code)
                }
                GradleDialect::Groovy if EXT_BLOCK_REGEX.is_match(code) => {
                    ext_depth = brace_balance(code);
                    continue;
                }
                GradleDialect::Groovy => GROOVY_ASSIGNMENT_REGEX.captures(code),
            };

            if let Some(caps) = assignment
                && let Some(value) = literal_value(&caps[2])
            {
                variables.insert(caps[1].to_string(), value);
            }
        }

        variables
    }
}

impl Parser for GradleParser {
    fn parse(&self, content: &str) -> Result<Vec<RawLib>> {
        let variables = self.collect_variables(content);
        let mut libs = Vec::new();
        let mut depth = 0;

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("//") {
                continue;
            }
            let code = strip_inline_comment(trimmed, "//");

            if depth == 0 {
                if DEPENDENCIES_BLOCK_REGEX.is_match(code) {
                    depth = brace_balance(code).max(0);
                    // `dependencies { implementation 'a:b:1.0' }`
                    if let Some((_, body)) = code.split_once('{') {
                        let body = match depth {
                            0 => body.rsplit_once('}').map_or(body, |(inner, _)| inner),
                            _ => body,
                        };
                        libs.extend(
                            body.split(';')
                                .filter_map(|statement| parse_dependency_line(statement.trim(), &variables)),
                        );
                    }
                }
                continue;
            }

            depth += brace_balance(code);
            if depth <= 0 {
                depth = 0;
                continue;
            }

            if let Some(lib) = parse_dependency_line(code, &variables) {
                libs.push(lib);
            }
        }

        Ok(libs)
    }
}

fn parse_dependency_line(line: &str, variables: &HashMap<String, String>) -> Option<RawLib> {
    let prefix = CONFIGURATION_PREFIX_REGEX.find(line)?;
    let rest = &line[prefix.end()..];

    // project(':core'), files('a.jar'), platform(...), kotlin("test")
    if rest.contains('(') {
        return None;
    }

    if let Some(caps) = LONG_FORM_REGEX.captures(rest) {
        let name = resolve(&caps["name"], variables)?;
        let version = match (caps.name("version"), caps.name("version_ref")) {
            (Some(version), _) => resolve(version.as_str(), variables),
            (None, Some(reference)) => lookup(reference.as_str(), variables),
            (None, None) => None,
        };
        return Some(RawLib::new(name, version));
    }

    let coordinates = *quoted_strings(rest).first()?;
    let mut parts = coordinates.split(':');
    let _group = parts.next()?;
    let name = resolve(parts.next()?, variables)?;
    let version = parts
        .next()
        .map(|v| v.split('@').next().unwrap_or(v))
        .and_then(|v| resolve(v, variables));

    Some(RawLib::new(name, RawValue::from(version)))
}

/// Resolve a coordinate part. Plain text passes through; a lone `$var` or
/// `${var}` is looked up; anything else holding a `$` is unresolvable.
fn resolve(part: &str, variables: &HashMap<String, String>) -> Option<String> {
    let part = part.trim();
    if part.is_empty() {
        return None;
    }
    if !part.contains('$') {
        return Some(part.to_string());
    }

    let caps = REFERENCE_REGEX.captures(part)?;
    let key = caps.get(1).or_else(|| caps.get(2))?.as_str();
    lookup(key, variables)
}

/// `springVersion`, `rootProject.ext.springVersion`
fn lookup(key: &str, variables: &HashMap<String, String>) -> Option<String> {
    variables
        .get(key)
        .or_else(|| key.rsplit('.').next().and_then(|last| variables.get(last)))
        .cloned()
}

/// The value of a `name = value` assignment if it is a plain string or number.
fn literal_value(raw: &str) -> Option<String> {
    let raw = raw.trim().trim_end_matches(';').trim_end();
    let quoted = raw.len() >= 2 && (raw.starts_with('"') || raw.starts_with('\''));

    if quoted {
        let value = unquote(raw);
        // Same quote on both ends, no nested interpolation
        if value.len() + 2 == raw.len() && !value.contains('$') {
            return Some(value.to_string());
        }
        return None;
    }

    NUMBER_REGEX.is_match(raw).then(|| raw.to_string())
}

/// Net `{` minus `}` outside quoted strings
fn brace_balance(line: &str) -> i32 {
    let mut balance = 0;
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '{' => balance += 1,
                '}' => balance -= 1,
                _ => {}
            },
        }
    }

    balance
}
