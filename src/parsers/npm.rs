//! Parsers for package.json and package-lock.json files

use super::{Parser, RawLib, RawValue, json_object, parse_json};
use crate::error::{ParseError, Result};

/// Sections of package.json that declare libraries
const DEPENDENCY_SECTIONS: [&str; 2] = ["dependencies", "devDependencies"];

/// Lockfile entries resolved anywhere else are not public packages
const PUBLIC_REGISTRY_PREFIX: &str = "https://registry.npmjs.org/";

const NODE_MODULES_PREFIX: &str = "node_modules/";

/// Parser for npm package.json dependency files
#[derive(Debug, Default)]
pub struct NpmParser;

impl NpmParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for NpmParser {
    fn parse(&self, content: &str) -> Result<Vec<RawLib>> {
        let root = parse_json(content)?;
        let mut libs = Vec::new();

        for section in DEPENDENCY_SECTIONS {
            let Some(dependencies) = json_object(&root, section)? else {
                continue;
            };

            for (name, version) in dependencies {
                // Local path dependencies ("file:../lib", "link:./pkg") are not registry packages
                if version.as_str().is_some_and(|v| v.contains('/')) {
                    continue;
                }
                libs.push(RawLib::new(name.as_str(), RawValue::from(version)));
            }
        }

        Ok(libs)
    }
}

/// Parser for npm package-lock.json files (lockfile v2 and later)
#[derive(Debug, Default)]
pub struct NpmLockParser;

impl NpmLockParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for NpmLockParser {
    fn parse(&self, content: &str) -> Result<Vec<RawLib>> {
        let root = parse_json(content)?;
        let Some(packages) = json_object(&root, "packages")? else {
            return Ok(Vec::new());
        };

        let mut libs = Vec::new();
        for (path, package) in packages {
            // The root project itself
            if path.is_empty() {
                continue;
            }

            let package = package.as_object().ok_or(ParseError::UnexpectedNode)?;
            let is_public = package
                .get("resolved")
                .and_then(|r| r.as_str())
                .is_some_and(|r| r.starts_with(PUBLIC_REGISTRY_PREFIX));
            if !is_public {
                continue;
            }

            let version = package
                .get("version")
                .map_or(RawValue::Absent, RawValue::from);
            libs.push(RawLib::new(package_name(path), version));
        }

        Ok(libs)
    }
}

/// `node_modules/a/node_modules/@scope/b` -> `scope/b`
fn package_name(path: &str) -> String {
    let name = match path.rfind(NODE_MODULES_PREFIX) {
        Some(pos) => &path[pos + NODE_MODULES_PREFIX.len()..],
        None => path,
    };
    name.replace('@', "")
}
