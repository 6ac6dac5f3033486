//! Parser for vcpkg manifests (vcpkg.json)

use serde_json::Value;

use super::{Parser, RawLib, RawValue, json_array, parse_json};
use crate::error::{ParseError, Result};

const DEPENDENCY_SECTIONS: [&str; 2] = ["dependencies", "test-dependencies"];

/// Parser for vcpkg.json manifest files
#[derive(Debug, Default)]
pub struct VcpkgParser;

impl VcpkgParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for VcpkgParser {
    fn parse(&self, content: &str) -> Result<Vec<RawLib>> {
        let root = parse_json(content)?;
        let mut libs = Vec::new();

        for section in DEPENDENCY_SECTIONS {
            if let Some(entries) = json_array(&root, section)? {
                for entry in entries {
                    libs.push(parse_entry(entry)?);
                }
            }
        }

        Ok(libs)
    }
}

/// An entry is either `"name@version#revision"` or
/// `{"name": ..., "version>=": ...}`.
fn parse_entry(entry: &Value) -> Result<RawLib> {
    match entry {
        Value::String(spec) => Ok(match spec.split_once('@') {
            Some((name, version)) => RawLib::new(name, strip_revision(version)),
            None => RawLib::new(spec.as_str(), RawValue::Absent),
        }),
        Value::Object(fields) => {
            let name = fields.get("name").map_or(RawValue::Absent, RawValue::from);
            let version = match fields.get("version>=") {
                Some(Value::String(v)) => RawValue::from(strip_revision(v)),
                Some(other) => RawValue::from(other),
                None => RawValue::Absent,
            };
            Ok(RawLib::new(name, version))
        }
        _ => Err(ParseError::UnexpectedNode),
    }
}

/// `1.2.13#3` -> `1.2.13`
fn strip_revision(version: &str) -> &str {
    version.split('#').next().unwrap_or(version)
}
