//! Parsers for PHP Composer files (composer.json, composer.lock)

use super::{Parser, RawLib, RawValue, json_array, json_object, parse_json};
use crate::error::{ParseError, Result};

const REQUIRE_SECTIONS: [&str; 2] = ["require", "require-dev"];

/// Parser for PHP composer.json dependency files
#[derive(Debug, Default)]
pub struct ComposerParser;

impl ComposerParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for ComposerParser {
    fn parse(&self, content: &str) -> Result<Vec<RawLib>> {
        let root = parse_json(content)?;
        let mut libs = Vec::new();

        for section in REQUIRE_SECTIONS {
            if let Some(requirements) = json_object(&root, section)? {
                libs.extend(
                    requirements
                        .iter()
                        .map(|(name, version)| RawLib::new(name.as_str(), RawValue::from(version))),
                );
            }
        }

        Ok(libs)
    }
}

/// Parser for PHP composer.lock files
#[derive(Debug, Default)]
pub struct ComposerLockParser;

impl ComposerLockParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for ComposerLockParser {
    fn parse(&self, content: &str) -> Result<Vec<RawLib>> {
        let root = parse_json(content)?;
        let Some(packages) = json_array(&root, "packages")? else {
            return Ok(Vec::new());
        };

        packages
            .iter()
            .map(|package| {
                let package = package.as_object().ok_or(ParseError::UnexpectedNode)?;
                let field = |key: &str| package.get(key).map_or(RawValue::Absent, RawValue::from);
                Ok(RawLib::new(field("name"), field("version")))
            })
            .collect()
    }
}
