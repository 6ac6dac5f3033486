//! Parser for Bundler lockfiles (Gemfile.lock)
//!
//! Supports:
//! - `GEM`, `GIT`, `PATH` and `PLUGIN SOURCE` sections with `specs:` lists
//! - platform-specific specs (`nokogiri (1.13.1-x86_64-linux)`)
//! - detection of unresolved merge conflicts

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::{Parser, RawLib};
use crate::error::{ParseError, Result};

const LOCKFILE_NAME: &str = "Gemfile.lock";

const SOURCE_SECTIONS: [&str; 4] = ["GEM", "GIT", "PATH", "PLUGIN SOURCE"];

const CONFLICT_MARKERS: [&str; 3] = ["<<<<<<<", "=======", ">>>>>>>"];

/// `    name (version[-platform])` directly under `specs:`
static SPEC_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {4}([^ ()]+)(?: \(([^-)]*)(?:-([^)]*))?\))?!?$").expect("valid spec regex")
});

/// A gem resolved in the lockfile
#[derive(Debug, Clone, PartialEq, Eq)]
struct LockedSpec {
    name: String,
    version: Option<String>,
}

/// Failure reading a lockfile. Messages name the lockfile the way Bundler does.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LockfileError(String);

impl fmt::Display for LockfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<LockfileError> for ParseError {
    fn from(err: LockfileError) -> Self {
        // The content may come from another repository; don't point at a local file
        let detail = err.to_string().replace(LOCKFILE_NAME, "lockfile");
        ParseError::Deserialization {
            format: "lockfile",
            detail: Some(detail),
        }
    }
}

fn read_lockfile(content: &str) -> std::result::Result<Vec<LockedSpec>, LockfileError> {
    let mut specs = Vec::new();
    let mut in_source = false;
    let mut in_specs = false;

    for (line_idx, line) in content.lines().enumerate() {
        if CONFLICT_MARKERS.iter().any(|marker| line.starts_with(marker)) {
            return Err(LockfileError(format!(
                "{LOCKFILE_NAME} contains merge conflicts (line {})",
                line_idx + 1
            )));
        }

        if line.trim().is_empty() {
            continue;
        }

        // Top-level section header
        if !line.starts_with(' ') {
            in_source = SOURCE_SECTIONS.contains(&line.trim_end());
            in_specs = false;
            continue;
        }

        if !in_source {
            continue;
        }

        if line.trim_end() == "  specs:" {
            in_specs = true;
            continue;
        }

        // Dependencies of a spec are indented six spaces
        if !in_specs || line.starts_with("      ") {
            continue;
        }

        if !line.starts_with("    ") {
            // `  remote:` and friends after the spec list
            in_specs = false;
            continue;
        }

        let caps = SPEC_REGEX.captures(line.trim_end()).ok_or_else(|| {
            LockfileError(format!(
                "{LOCKFILE_NAME} has an unparseable spec on line {}: `{}`",
                line_idx + 1,
                line.trim()
            ))
        })?;

        specs.push(LockedSpec {
            name: caps[1].to_string(),
            version: caps.get(2).map(|m| m.as_str().to_string()),
        });
    }

    Ok(specs)
}

/// Parser for Ruby Gemfile.lock files
#[derive(Debug, Default)]
pub struct GemfileLockParser;

impl GemfileLockParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for GemfileLockParser {
    fn parse(&self, content: &str) -> Result<Vec<RawLib>> {
        let specs = read_lockfile(content)?;

        Ok(specs
            .into_iter()
            .map(|spec| RawLib::new(spec.name, spec.version))
            .collect())
    }
}
